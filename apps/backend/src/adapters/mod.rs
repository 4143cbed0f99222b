//! Adapters for the storage collaborators.

pub mod players_memory;
pub mod rounds_memory;

pub use players_memory::InMemoryPlayerStore;
pub use rounds_memory::InMemoryRoundRegistry;
