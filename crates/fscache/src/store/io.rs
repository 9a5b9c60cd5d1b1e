//! Filesystem primitives: shard directories, atomic write, best-effort unlink.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{CacheError, CacheResult};

/// Create the shard directories above `path`.
///
/// Failure is only logged; the write that follows reports the real error.
pub(crate) fn ensure_parent_impl(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            debug!(path = %parent.display(), error = %e, "failed to create shard directory");
        }
    }
}

/// Temp file in `namespace_dir`, unique per writer even for the same target.
pub(crate) fn temp_path_impl(namespace_dir: &Path, target: &Path) -> PathBuf {
    let target_hash = md5::compute(target.as_os_str().as_encoded_bytes());
    let nonce: [u8; 6] = rand::random();
    namespace_dir.join(format!("{:x}{}", target_hash, hex::encode(nonce)))
}

/// Write `content` to a temp file, stamp its mtime, then rename over `target`.
///
/// Readers of `target` see either the previous file or the new one in full.
pub(crate) fn write_atomic_impl(
    namespace_dir: &Path,
    target: &Path,
    content: &[u8],
    expires_at: Option<DateTime<Utc>>,
) -> CacheResult<()> {
    let temp_path = temp_path_impl(namespace_dir, target);

    let mut file = File::create(&temp_path)
        .map_err(|e| CacheError::io("failed to create temp file", &temp_path, e))?;

    if let Err(e) = file.write_all(content) {
        discard_temp(&temp_path);
        return Err(CacheError::io("failed to write temp file", &temp_path, e));
    }

    if let Some(at) = expires_at {
        // mtime mirrors the expiration line so `has_item` can skip reading
        if let Err(e) = file.set_modified(SystemTime::from(at)) {
            warn!(path = %temp_path.display(), error = %e, "failed to set expiration mtime");
        }
    }
    drop(file);

    if let Err(e) = fs::rename(&temp_path, target) {
        discard_temp(&temp_path);
        return Err(CacheError::io("failed to rename temp file", target, e));
    }

    Ok(())
}

fn discard_temp(temp_path: &Path) {
    let _ = fs::remove_file(temp_path);
}

/// Remove a file, reporting whether something was actually removed.
pub(crate) fn remove_file_impl(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove cache file");
            false
        }
    }
}
