//! Key to path derivation.
//!
//! `<namespace_dir>/<h[0]>/<h[1]>/<h[2..]>` where `h` is the hex MD5 of
//! `"<namespace>:<key>"`. Two keys with colliding hashes share a file.

use std::path::{Path, PathBuf};

pub(crate) fn key_hash_impl(namespace: &str, key: &str) -> String {
    format!("{:x}", md5::compute(format!("{}:{}", namespace, key)))
}

pub(crate) fn entry_path_impl(namespace_dir: &Path, namespace: &str, key: &str) -> PathBuf {
    let hash = key_hash_impl(namespace, key);
    namespace_dir
        .join(&hash[0..1])
        .join(&hash[1..2])
        .join(&hash[2..])
}
