//! Write path: `save`.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::codec::ValueCodec;
use crate::error::CacheResult;
use crate::item::CacheItem;

use super::FilesystemStore;
use super::{format, io, policy};

pub(crate) fn save_impl<V, C>(store: &FilesystemStore<C>, item: &mut CacheItem<V>) -> CacheResult<()>
where
    V: Serialize,
    C: ValueCodec,
{
    let expires_at = policy::resolve_expiry_impl(
        item.expiration(),
        store.config.default_ttl_secs,
        Utc::now(),
    )?;
    // header line, mtime and the caller's item all carry the same instant
    item.expires_at(expires_at);

    let path = store.path(item.key());
    let content = format::pack_impl(item, expires_at, &store.codec)?;

    io::write_atomic_impl(&store.namespace_dir, &path, &content, Some(expires_at))?;

    debug!(key = item.key(), expires_at = %expires_at, "cached item");
    Ok(())
}
