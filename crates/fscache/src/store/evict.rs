//! Removal: `delete`, `flush`, expired-entry pruning, and the tree walk behind them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::codec::ValueCodec;

use super::FilesystemStore;
use super::{io, policy};

/// Depth of entry files below the namespace directory (`a/b/rest`).
const ENTRY_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) path: PathBuf,
    pub(crate) is_dir: bool,
    pub(crate) depth: usize,
}

/// Every node under `root`, children before their directory.
///
/// Unreadable directories are still yielded, just without children.
/// Symlinks are reported as files and never followed.
pub(crate) fn scan_impl(root: &Path) -> Vec<Node> {
    let mut nodes = Vec::new();
    scan_into(root, 1, &mut nodes);
    nodes
}

fn scan_into(dir: &Path, depth: usize, nodes: &mut Vec<Node>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "failed to read directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            scan_into(&path, depth + 1, nodes);
        }
        nodes.push(Node {
            path,
            is_dir,
            depth,
        });
    }
}

pub(crate) fn delete_impl<C: ValueCodec>(store: &FilesystemStore<C>, key: &str) -> bool {
    let removed = io::remove_file_impl(&store.path(key));
    if removed {
        debug!(key, "evicted from cache");
    }
    removed
}

/// Remove everything under the namespace directory, one node at a time.
///
/// A node that cannot be removed is skipped; the walk continues.
pub(crate) fn flush_impl<C: ValueCodec>(store: &FilesystemStore<C>) -> bool {
    let mut failed = 0usize;

    for node in scan_impl(&store.namespace_dir) {
        let result = if node.is_dir {
            fs::remove_dir(&node.path)
        } else {
            fs::remove_file(&node.path)
        };
        if let Err(e) = result {
            failed += 1;
            debug!(path = %node.path.display(), error = %e, "failed to remove node during flush");
        }
    }

    debug!(failed, "flushed cache namespace");
    true
}

/// Remove entry files whose mtime says they have expired. Contents are not read.
pub(crate) fn prune_expired_impl<C: ValueCodec>(store: &FilesystemStore<C>) -> usize {
    let now = Utc::now();
    let mut removed = 0usize;

    for node in scan_impl(&store.namespace_dir) {
        if node.is_dir || node.depth != ENTRY_DEPTH {
            continue;
        }

        let expired = fs::metadata(&node.path)
            .and_then(|m| m.modified())
            .map(|modified| !policy::mtime_is_fresh_impl(modified, now))
            .unwrap_or(false);

        if expired && io::remove_file_impl(&node.path) {
            removed += 1;
        }
    }

    debug!(removed, "pruned expired cache entries");
    removed
}
