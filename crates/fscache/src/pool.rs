//! Cache pool abstraction.

use serde::{de::DeserializeOwned, Serialize};

use crate::codec::ValueCodec;
use crate::error::CacheResult;
use crate::item::CacheItem;
use crate::store::FilesystemStore;

/// Key/value cache with per-item expiration.
///
/// Lookups never fail: storage problems show up as a miss.
pub trait CachePool {
    fn has_item(&self, key: &str) -> bool;

    fn get_item<V: DeserializeOwned>(&self, key: &str) -> CacheItem<V>;

    /// Look up `key`; on a miss let `populate` fill the item, then save it.
    fn get_item_with<V, F>(&self, key: &str, populate: F) -> CacheItem<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(&mut CacheItem<V>);

    fn save<V: Serialize>(&self, item: &mut CacheItem<V>) -> CacheResult<()>;

    fn delete(&self, key: &str) -> bool;

    fn flush(&self) -> bool;
}

impl<C: ValueCodec> CachePool for FilesystemStore<C> {
    fn has_item(&self, key: &str) -> bool {
        FilesystemStore::has_item(self, key)
    }

    fn get_item<V: DeserializeOwned>(&self, key: &str) -> CacheItem<V> {
        FilesystemStore::get_item(self, key)
    }

    fn get_item_with<V, F>(&self, key: &str, populate: F) -> CacheItem<V>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(&mut CacheItem<V>),
    {
        FilesystemStore::get_item_with(self, key, populate)
    }

    fn save<V: Serialize>(&self, item: &mut CacheItem<V>) -> CacheResult<()> {
        FilesystemStore::save(self, item)
    }

    fn delete(&self, key: &str) -> bool {
        FilesystemStore::delete(self, key)
    }

    fn flush(&self) -> bool {
        FilesystemStore::flush(self)
    }
}
