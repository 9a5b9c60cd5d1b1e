//! Error types for the cache store.

use std::path::{Path, PathBuf};

/// Cache store errors.
///
/// Only a few operations surface these to callers (`save`, store
/// construction). Everything else folds failures into a miss or a
/// `false` return.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("io error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Value could not be serialized.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// Stored bytes could not be turned back into a value.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl CacheError {
    pub(crate) fn io(message: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }

    /// Path involved in the failure, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Whether the underlying cause was a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source: Some(e), .. } if e.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
