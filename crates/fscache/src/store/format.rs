//! Item file encoding.
//!
//! ```text
//! <expires_at seconds>\n
//! <key>\n
//! <value payload, rest of file>
//! ```

use std::io::{BufRead, Read};

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;

use crate::codec::ValueCodec;
use crate::error::{CacheError, CacheResult};
use crate::item::CacheItem;

/// Outcome of reading an item file.
#[derive(Debug)]
pub(crate) enum Unpacked<V> {
    Hit(CacheItem<V>),
    /// Expiration line missing, non-numeric, non-positive, or not in the future.
    Expired,
    /// Header was fine but the rest could not be read or decoded.
    Corrupt(CacheError),
    /// Payload is valid in the codec but not as the requested type.
    Mismatch(CacheError),
}

pub(crate) fn pack_impl<V, C>(
    item: &CacheItem<V>,
    expires_at: DateTime<Utc>,
    codec: &C,
) -> CacheResult<Vec<u8>>
where
    V: Serialize,
    C: ValueCodec,
{
    let payload = codec.encode(item.value_ref())?;

    let mut buf = format!("{}\n{}\n", expires_at.timestamp(), item.key()).into_bytes();
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn unpack_impl<V, C, R>(mut reader: R, codec: &C, now: DateTime<Utc>) -> Unpacked<V>
where
    V: DeserializeOwned,
    C: ValueCodec,
    R: BufRead,
{
    let expires_at = match read_line(&mut reader)
        .ok()
        .and_then(|line| line.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0 && *secs > now.timestamp())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    {
        Some(at) => at,
        None => return Unpacked::Expired,
    };

    let key = match read_line(&mut reader) {
        Ok(line) => line.trim_end_matches(['\r', '\n']).to_string(),
        Err(e) => return Unpacked::Corrupt(e),
    };

    let mut payload = Vec::new();
    if let Err(e) = reader.read_to_end(&mut payload) {
        return Unpacked::Corrupt(CacheError::Decode {
            message: format!("failed to read value payload: {}", e),
        });
    }

    match codec.decode::<Option<V>>(&payload) {
        Ok(value) => Unpacked::Hit(CacheItem::hit(key, value, expires_at)),
        Err(e) if codec.decode::<IgnoredAny>(&payload).is_ok() => Unpacked::Mismatch(e),
        Err(e) => Unpacked::Corrupt(e),
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> CacheResult<String> {
    let mut line = Vec::new();
    reader
        .read_until(b'\n', &mut line)
        .map_err(|e| CacheError::Decode {
            message: format!("failed to read header line: {}", e),
        })?;
    String::from_utf8(line).map_err(|e| CacheError::Decode {
        message: format!("header line is not UTF-8: {}", e),
    })
}
