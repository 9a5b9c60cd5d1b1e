//! Expiration policy helpers. No filesystem access.

use std::time::SystemTime;

use chrono::{DateTime, Duration, Utc};

use crate::error::{CacheError, CacheResult};

/// Expiration to persist: the item's own, or `now + default_ttl_secs`.
///
/// Truncated to whole seconds, the precision of both the header line and
/// the mtime stamp.
pub(crate) fn resolve_expiry_impl(
    explicit: Option<DateTime<Utc>>,
    default_ttl_secs: i64,
    now: DateTime<Utc>,
) -> CacheResult<DateTime<Utc>> {
    let at = match explicit {
        Some(at) => at,
        None => Duration::try_seconds(default_ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| CacheError::Config {
                message: format!("default TTL out of range: {}", default_ttl_secs),
            })?,
    };

    DateTime::from_timestamp(at.timestamp(), 0).ok_or_else(|| CacheError::Config {
        message: format!("expiration out of range: {}", at),
    })
}

/// Fast-path freshness from file metadata alone.
pub(crate) fn mtime_is_fresh_impl(modified: SystemTime, now: DateTime<Utc>) -> bool {
    DateTime::<Utc>::from(modified) > now
}
