//! Round lifecycle services built on the storage contracts in `crate::repos`.

pub mod draw;
pub mod locks;
pub mod resolver;
pub mod rounds;
pub mod scheduler;

pub use draw::{FixedDraw, NumberDraw, RandomDraw, SeededDraw};
pub use locks::{KeyedGuard, KeyedLocks, RoundLocks};
pub use resolver::WinnerResolver;
pub use rounds::RoundCoordinator;
pub use scheduler::{RoundScheduler, TickReport};
