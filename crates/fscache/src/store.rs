//! Filesystem-backed cache store.
//!
//! Each entry is one file; concurrent writers never expose a partial file
//! because every write lands through a rename.
//!
//! # Layout
//!
//! ```text
//! {directory}/{namespace}/
//!   {h0}/{h1}/{h2..h31}       # entry, h = md5("{namespace}:{key}")
//!   {md5(target)}{12 hex}     # in-flight temp files
//! ```
//!
//! An entry file's mtime equals its expiration instant, so freshness can be
//! checked (and expired entries pruned) from metadata alone.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::codec::{CborCodec, ValueCodec};
use crate::config::StoreConfig;
use crate::error::CacheResult;
use crate::item::CacheItem;

mod evict;
mod format;
mod io;
mod keys;
mod policy;
mod put;
mod read;

/// Cache store rooted at `{directory}/{namespace}`.
#[derive(Debug, Clone)]
pub struct FilesystemStore<C = CborCodec> {
    config: StoreConfig,
    namespace_dir: PathBuf,
    codec: C,
}

impl FilesystemStore<CborCodec> {
    /// Open a store with the default binary codec.
    pub fn open(config: StoreConfig) -> CacheResult<Self> {
        Self::with_codec(config, CborCodec)
    }

    /// Open a store configured from `FSCACHE_*` environment variables.
    pub fn from_env() -> CacheResult<Self> {
        Self::open(StoreConfig::from_env())
    }

    /// Open a store under `directory` with the default namespace and TTL.
    pub fn with_dir(directory: impl Into<PathBuf>) -> CacheResult<Self> {
        Self::open(StoreConfig::default().with_directory(directory))
    }
}

impl<C: ValueCodec> FilesystemStore<C> {
    /// Open a store with a custom value codec.
    ///
    /// The namespace directory is created eagerly; if that fails the store
    /// is still returned and the first `save` reports the error.
    pub fn with_codec(config: StoreConfig, codec: C) -> CacheResult<Self> {
        config.validate()?;

        let namespace_dir = config.namespace_dir();
        if let Err(e) = std::fs::create_dir_all(&namespace_dir) {
            warn!(path = %namespace_dir.display(), error = %e, "failed to create cache directory");
        }

        Ok(Self {
            config,
            namespace_dir,
            codec,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn namespace_dir(&self) -> &Path {
        &self.namespace_dir
    }

    /// Where `key` lives on disk. Creates nothing.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        keys::entry_path_impl(&self.namespace_dir, &self.config.namespace, key)
    }

    /// Entry path with its shard directories created.
    fn path(&self, key: &str) -> PathBuf {
        let path = self.entry_path(key);
        io::ensure_parent_impl(&path);
        path
    }

    /// Whether a fresh entry exists for `key`.
    ///
    /// An entry whose mtime is in the future counts as present without its
    /// contents being read. Otherwise the entry is fully loaded, and removed
    /// if it turns out to be expired.
    pub fn has_item(&self, key: &str) -> bool {
        read::has_item_impl(self, key)
    }

    /// Look up `key`. Absent, expired and corrupt entries all come back as a miss.
    ///
    /// An entry stored as a different type than `V` is also a miss, but the
    /// file is kept for callers that read it with the right type.
    pub fn get_item<V: DeserializeOwned>(&self, key: &str) -> CacheItem<V> {
        read::get_item_impl(self, key)
    }

    /// Look up `key`, filling and saving a miss with `populate`.
    ///
    /// The returned item keeps `is_hit() == false` after population.
    /// A failed save is logged and the populated item is still returned.
    pub fn get_item_with<V, F>(&self, key: &str, populate: F) -> CacheItem<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(&mut CacheItem<V>),
    {
        read::get_item_with_impl(self, key, populate)
    }

    /// Persist `item`, assigning `now + default_ttl` if it has no expiration.
    pub fn save<V: Serialize>(&self, item: &mut CacheItem<V>) -> CacheResult<()> {
        put::save_impl(self, item)
    }

    /// Remove the entry for `key`. Returns whether a file was removed.
    pub fn delete(&self, key: &str) -> bool {
        evict::delete_impl(self, key)
    }

    /// Remove every file and directory under the namespace directory.
    ///
    /// Always returns `true`; nodes that cannot be removed are left behind.
    pub fn flush(&self) -> bool {
        evict::flush_impl(self)
    }

    /// Remove entries whose mtime is not in the future. Returns how many went.
    pub fn prune_expired(&self) -> usize {
        evict::prune_expired_impl(self)
    }
}
