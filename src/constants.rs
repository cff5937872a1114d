//! Fixed policy constants.
//!
//! These are deliberate policy choices, not tunables: the slug keyspace
//! (62^7) and the retry budget are sized together, and changing one without
//! the other silently changes the collision behavior of the service.

/// Length of generated slugs.
pub const SLUG_LENGTH: usize = 7;

/// How many insert attempts `create_link` makes before giving up.
/// Exhaustion signals an operational problem (keyspace too full), never
/// a condition to swallow.
pub const MAX_SLUG_RETRIES: usize = 5;

/// Maximum accepted URL length, measured after normalization.
pub const MAX_URL_LENGTH: usize = 2048;

/// Longest slug accepted on the lookup path.
pub const MAX_SLUG_INPUT_LENGTH: usize = 32;

/// Cache key namespace for link snapshots.
pub const LINK_CACHE_PREFIX: &str = "link:";
