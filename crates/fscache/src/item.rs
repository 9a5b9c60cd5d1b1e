//! The unit of storage handed to and returned from the store.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

/// A cache entry as seen by callers.
///
/// Built fresh on every lookup: either loaded from disk (`is_hit() == true`)
/// or empty for a miss. The file it is saved into is its only durable form.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem<V> {
    key: String,
    value: Option<V>,
    is_hit: bool,
    expires_at: Option<DateTime<Utc>>,
    tags: BTreeSet<String>,
}

impl<V> CacheItem<V> {
    /// Create an empty item (a miss) for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            is_hit: false,
            expires_at: None,
            tags: BTreeSet::new(),
        }
    }

    pub(crate) fn hit(key: String, value: Option<V>, expires_at: DateTime<Utc>) -> Self {
        Self {
            key,
            value,
            is_hit: true,
            expires_at: Some(expires_at),
            tags: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this item was loaded from a valid, unexpired entry.
    ///
    /// Populating a miss does not flip this flag.
    pub fn is_hit(&self) -> bool {
        self.is_hit
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<V> {
        self.value
    }

    pub fn set(&mut self, value: V) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Absolute expiration instant, if one has been assigned.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn expires_at(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.expires_at = Some(at);
        self
    }

    /// Expire `ttl` from now.
    pub fn expires_after(&mut self, ttl: Duration) -> &mut Self {
        self.expires_at = Some(Utc::now() + ttl);
        self
    }

    /// Attach tags to the in-memory item.
    ///
    /// Tags are not written to disk; a loaded item always has none.
    pub fn tag<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub(crate) fn value_ref(&self) -> &Option<V> {
        &self.value
    }
}
