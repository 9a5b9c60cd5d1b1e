//! Value payload serialization.
//!
//! The item file stores the value bytes after the two header lines with no
//! trailing delimiter, so a codec must be able to decode from "the rest of
//! the stream". Decode failures are what the store treats as corruption.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CacheError, CacheResult};

/// Encodes and decodes cached values.
pub trait ValueCodec {
    fn encode<V: Serialize>(&self, value: &V) -> CacheResult<Vec<u8>>;

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<V>;
}

/// Compact binary encoding (CBOR). The store default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl ValueCodec for CborCodec {
    fn encode<V: Serialize>(&self, value: &V) -> CacheResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|e| CacheError::Encode {
            message: format!("failed to encode CBOR value: {}", e),
        })?;
        Ok(buf)
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<V> {
        ciborium::from_reader(bytes).map_err(|e| CacheError::Decode {
            message: format!("failed to decode CBOR value: {}", e),
        })
    }
}

/// JSON encoding, for caches that should stay human-inspectable.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn encode<V: Serialize>(&self, value: &V) -> CacheResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CacheError::Encode {
            message: format!("failed to encode JSON value: {}", e),
        })
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> CacheResult<V> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Decode {
            message: format!("failed to decode JSON value: {}", e),
        })
    }
}
