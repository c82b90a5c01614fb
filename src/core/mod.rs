//! Core utilities shared across the application
//!
//! - `cache`: TTL cache over memory and disk
//! - `http`: shared HTTP client and JSON fetch helpers

pub mod cache;
pub mod http;

use chrono::Utc;

pub use cache::{cache_dir, try_read_to_string, write_string, CacheKey, SourceCacheKey, TtlCache};

/// Seconds since the Unix epoch; 0 if the clock is before it.
pub fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
