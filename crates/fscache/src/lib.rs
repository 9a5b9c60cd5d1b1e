//! Filesystem-backed cache store.
//!
//! Values are stored under string keys, one file per entry, with a
//! per-item expiration. There is no daemon and no lock file: writes go
//! through a temp file and an atomic rename, so any number of threads or
//! processes can share a cache directory without readers ever seeing a
//! partially written entry.
//!
//! - Two-level sharded layout keyed by `md5("{namespace}:{key}")`
//! - Expiration stored in the file header and mirrored in the file mtime
//! - Expired and corrupt entries read as a miss and are cleaned up on access
//! - Pluggable value codec (CBOR by default, JSON available)
//!
//! # Quick Start
//!
//! ```no_run
//! use fscache::{CacheItem, FilesystemStore, StoreConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = FilesystemStore::open(StoreConfig::default().with_namespace("sessions"))?;
//!
//! let item: CacheItem<u64> = store.get_item_with("user:42:visits", |item| {
//!     item.set(1).expires_after(chrono::Duration::hours(1));
//! });
//! assert!(!item.is_hit());
//!
//! assert!(store.has_item("user:42:visits"));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `FSCACHE_DIR` | Root directory (default: platform cache dir + `/fscache`) |
//! | `FSCACHE_NAMESPACE` | Namespace segment (default: `@`) |
//! | `FSCACHE_DEFAULT_TTL` | TTL in seconds for items saved without one (default: one year) |
//! | `FSCACHE_KEEP_CORRUPT` | Leave undecodable entries on disk instead of deleting them |

pub mod codec;
pub mod config;
pub mod error;
pub mod item;
pub mod pool;
pub mod store;

// Re-export main types
pub use codec::{CborCodec, JsonCodec, ValueCodec};
pub use config::{StoreConfig, DEFAULT_NAMESPACE, DEFAULT_TTL_SECS, MAX_TTL_SECS};
pub use error::{CacheError, CacheResult};
pub use item::CacheItem;
pub use pool::CachePool;
pub use store::FilesystemStore;
