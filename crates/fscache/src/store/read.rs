//! Read path: load, `has_item`, `get_item`.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use chrono::Utc;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, warn};

use crate::codec::ValueCodec;
use crate::item::CacheItem;

use super::FilesystemStore;
use super::format::{unpack_impl, Unpacked};
use super::{io, policy};

/// Load and validate the entry at `path`.
///
/// Expired entries are always removed; corrupt ones only when the store
/// is configured to. An entry holding a different type than `V` is left
/// alone. Either way the caller sees `None`.
pub(crate) fn load_impl<V, C>(store: &FilesystemStore<C>, path: &Path) -> Option<CacheItem<V>>
where
    V: DeserializeOwned,
    C: ValueCodec,
{
    if !path.is_file() {
        return None;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to open cache file");
            return None;
        }
    };

    match unpack_impl(BufReader::new(file), &store.codec, Utc::now()) {
        Unpacked::Hit(item) => {
            debug!(key = item.key(), "cache hit");
            Some(item)
        }
        Unpacked::Expired => {
            debug!(path = %path.display(), "cache entry expired");
            let _ = io::remove_file_impl(path);
            None
        }
        Unpacked::Corrupt(e) => {
            warn!(path = %path.display(), error = %e, "cache entry corrupt");
            if store.config.remove_corrupt {
                let _ = io::remove_file_impl(path);
            }
            None
        }
        Unpacked::Mismatch(e) => {
            debug!(path = %path.display(), error = %e, "cache entry holds another type");
            None
        }
    }
}

pub(crate) fn has_item_impl<C: ValueCodec>(store: &FilesystemStore<C>, key: &str) -> bool {
    let path = store.path(key);

    let meta = match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return false,
    };

    // A future mtime is trusted without reading the file.
    if let Ok(modified) = meta.modified() {
        if policy::mtime_is_fresh_impl(modified, Utc::now()) {
            return true;
        }
    }

    load_impl::<IgnoredAny, C>(store, &path).is_some()
}

pub(crate) fn get_item_impl<V, C>(store: &FilesystemStore<C>, key: &str) -> CacheItem<V>
where
    V: DeserializeOwned,
    C: ValueCodec,
{
    let path = store.path(key);
    load_impl(store, &path).unwrap_or_else(|| CacheItem::new(key))
}

pub(crate) fn get_item_with_impl<V, C, F>(
    store: &FilesystemStore<C>,
    key: &str,
    populate: F,
) -> CacheItem<V>
where
    V: Serialize + DeserializeOwned,
    C: ValueCodec,
    F: FnOnce(&mut CacheItem<V>),
{
    let path = store.path(key);
    if let Some(item) = load_impl(store, &path) {
        return item;
    }

    let mut item = CacheItem::new(key);
    populate(&mut item);

    if let Err(e) = store.save(&mut item) {
        warn!(key, error = %e, "failed to save populated cache item");
    }

    item
}
