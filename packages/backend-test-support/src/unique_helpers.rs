//! Unique fixture names backed by ULIDs.
//!
//! Player stores reject duplicate usernames, so tests that register players in
//! shared stores use these to stay isolated from each other.

use ulid::Ulid;

/// `{prefix}-{ulid}`.
///
/// ```
/// use numdraw_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("round");
/// let b = unique_str("round");
/// assert_ne!(a, b);
/// assert!(a.starts_with("round-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A username that is unique per call, keeping `prefix` readable in logs.
///
/// ```
/// use numdraw_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("alice");
/// assert!(name.starts_with("alice_"));
/// assert_ne!(name, unique_username("alice"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}

/// `count` distinct usernames sharing a prefix.
pub fn unique_usernames(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| unique_username(&format!("{prefix}{i}")))
        .collect()
}
