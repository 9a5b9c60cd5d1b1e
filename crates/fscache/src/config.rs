//! Store configuration.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Default namespace segment.
pub const DEFAULT_NAMESPACE: &str = "@";

/// Default time-to-live in seconds (one Gregorian year).
pub const DEFAULT_TTL_SECS: i64 = 31_556_952;

/// Largest accepted default TTL (1000 years).
pub const MAX_TTL_SECS: i64 = 1000 * DEFAULT_TTL_SECS;

/// Configuration for a [`FilesystemStore`](crate::FilesystemStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory shared by all namespaces.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Namespace segment under `directory`; also mixed into every key hash.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Lifespan given to items saved without an explicit expiration.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: i64,

    /// Delete entries whose payload is not valid in the store's codec.
    ///
    /// An entry that decodes fine but not as the type a caller asked for
    /// is a miss for that caller and is never deleted.
    #[serde(default = "default_remove_corrupt")]
    pub remove_corrupt: bool,
}

/// `<platform cache dir>/fscache`, or `<temp dir>/fscache` when the platform has none.
pub fn default_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("fscache")
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_ttl_secs() -> i64 {
    DEFAULT_TTL_SECS
}

fn default_remove_corrupt() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            namespace: default_namespace(),
            default_ttl_secs: default_ttl_secs(),
            remove_corrupt: default_remove_corrupt(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `FSCACHE_DIR` | Root directory |
    /// | `FSCACHE_NAMESPACE` | Namespace segment (default `@`) |
    /// | `FSCACHE_DEFAULT_TTL` | Default TTL in seconds |
    /// | `FSCACHE_KEEP_CORRUPT` | Leave undecodable entries on disk |
    pub fn from_env() -> Self {
        Self {
            directory: std::env::var_os("FSCACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_directory),
            namespace: std::env::var("FSCACHE_NAMESPACE").unwrap_or_else(|_| default_namespace()),
            default_ttl_secs: std::env::var("FSCACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_ttl_secs),
            remove_corrupt: !std::env::var("FSCACHE_KEEP_CORRUPT")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Set the root directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the default TTL in seconds.
    pub fn with_default_ttl_secs(mut self, secs: i64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    /// Choose whether corrupt entries are deleted on load.
    pub fn with_remove_corrupt(mut self, remove: bool) -> Self {
        self.remove_corrupt = remove;
        self
    }

    /// `<directory>/<namespace>`.
    pub fn namespace_dir(&self) -> PathBuf {
        self.directory.join(&self.namespace)
    }

    /// Reject namespaces that would escape or collapse the directory layout.
    pub fn validate(&self) -> CacheResult<()> {
        if self.namespace.is_empty() {
            return Err(CacheError::Config {
                message: "namespace must not be empty".to_string(),
            });
        }

        let mut components = Path::new(&self.namespace).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || self.namespace.contains(['/', '\\']) {
            return Err(CacheError::Config {
                message: format!(
                    "namespace must be a single path segment: {:?}",
                    self.namespace
                ),
            });
        }

        if self.default_ttl_secs <= 0 || self.default_ttl_secs > MAX_TTL_SECS {
            return Err(CacheError::Config {
                message: format!(
                    "default TTL must be in 1..={} seconds, got {}",
                    MAX_TTL_SECS, self.default_ttl_secs
                ),
            });
        }

        Ok(())
    }
}
