//! End-to-end behavior of `FilesystemStore` against a real directory tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Duration, Utc};
use fscache::{CacheError, CacheItem, FilesystemStore, StoreConfig};
use tempfile::TempDir;

struct Fixture {
    _temp_dir: TempDir,
    store: FilesystemStore,
    corrupted: PathBuf,
    missed: PathBuf,
    expired: PathBuf,
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn touch(path: &Path, secs: i64) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::from(at(secs)))
        .unwrap();
}

fn mtime_secs(path: &Path) -> i64 {
    DateTime::<Utc>::from(fs::metadata(path).unwrap().modified().unwrap()).timestamp()
}

/// Write a raw entry file whose content is just its expiration line.
fn plant(path: &Path, secs: i64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, secs.to_string()).unwrap();
    touch(path, secs);
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}

fn setup_with(config: impl FnOnce(StoreConfig) -> StoreConfig) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("cache");
    let ns_dir = cache_dir.join("@");

    let fixture = Fixture {
        corrupted: ns_dir.join("6/c/858b6f61f35ecba679598f5359c0e5"),
        missed: ns_dir.join("7/f/36619b54c0c861e82452c168549d30"),
        expired: ns_dir.join("5/d/dd2d04662de4a76800a586b89d1405"),
        store: FilesystemStore::open(config(StoreConfig::default().with_directory(&cache_dir)))
            .unwrap(),
        _temp_dir: temp_dir,
    };

    plant(&fixture.corrupted, now_secs() + 10);
    plant(&fixture.expired, now_secs() - 10);
    fixture
}

fn setup() -> Fixture {
    setup_with(|config| config)
}

#[test]
fn test_create_folder() {
    let fx = setup();
    assert!(fx.store.namespace_dir().is_dir());
    assert!(fx.store.namespace_dir().ends_with("cache/@"));
}

#[test]
fn test_paths_are_deterministic() {
    let fx = setup();
    assert_eq!(fx.store.entry_path("foo"), fx.corrupted);
    assert_eq!(fx.store.entry_path("bar"), fx.missed);
    assert_eq!(fx.store.entry_path("baz"), fx.expired);
}

#[test]
fn test_flush() {
    let fx = setup();
    assert!(!is_empty_dir(fx.store.namespace_dir()));

    assert!(fx.store.flush());
    assert!(fx.store.namespace_dir().is_dir());
    assert!(is_empty_dir(fx.store.namespace_dir()));

    // Idempotent
    assert!(fx.store.flush());
    assert!(is_empty_dir(fx.store.namespace_dir()));
}

#[test]
fn test_flush_then_reuse() {
    let fx = setup();
    assert!(fx.store.flush());

    let mut item = CacheItem::new("bar");
    item.set(7u32);
    fx.store.save(&mut item).unwrap();

    assert_eq!(fx.store.get_item::<u32>("bar").get(), Some(&7));
}

#[test]
fn test_delete() {
    let fx = setup();
    assert!(fx.store.delete("foo"));
    assert!(!fx.corrupted.exists());

    assert!(!fx.store.delete("bar"));
}

#[test]
fn test_save() {
    let fx = setup();
    let mut item: CacheItem<u32> = CacheItem::new("bar");

    fx.store.save(&mut item).unwrap();
    assert!(fx.missed.is_file());
    assert_eq!(
        mtime_secs(&fx.missed),
        item.expiration().unwrap().timestamp()
    );

    let hit = fx.store.get_item::<u32>("bar");
    assert!(hit.is_hit());
    assert!(hit.get().is_none());
}

#[test]
fn test_handle_missed() {
    let fx = setup();
    let expires_at = at(now_secs() + 1000);

    let missed = fx.store.get_item_with("bar", |item: &mut CacheItem<u32>| {
        item.set(123).expires_at(expires_at);
    });

    assert!(!missed.is_hit());
    assert_eq!(missed.get(), Some(&123));
    assert!(fx.missed.is_file());
    assert_eq!(mtime_secs(&fx.missed), expires_at.timestamp());

    let hit = fx.store.get_item::<u32>("bar");

    assert!(hit.is_hit());
    assert_eq!(hit.key(), "bar");
    assert_eq!(hit.get(), Some(&123));
    assert_eq!(hit.expiration(), Some(expires_at));
    assert!(hit.tags().is_empty());
}

#[test]
fn test_populate_not_called_on_hit() {
    let fx = setup();
    let mut item = CacheItem::new("bar");
    item.set(1u32);
    fx.store.save(&mut item).unwrap();

    let hit = fx.store.get_item_with("bar", |_: &mut CacheItem<u32>| {
        panic!("populate must not run on a hit");
    });
    assert!(hit.is_hit());
}

#[test]
fn test_plain_miss_writes_nothing() {
    let fx = setup();

    assert!(!fx.store.has_item("bar"));
    let missed = fx.store.get_item::<u32>("bar");

    assert!(!missed.is_hit());
    assert!(missed.get().is_none());
    assert!(missed.expiration().is_none());
    assert!(!fx.missed.exists());
}

#[test]
fn test_handle_expired() {
    let fx = setup();
    let missed = fx.store.get_item::<u32>("baz");

    assert!(!missed.is_hit());
    assert!(!fx.expired.exists());
}

#[test]
fn test_has_item() {
    let fx = setup();
    assert!(fx.store.has_item("foo"));
    // Fast path trusted the mtime; the corrupt file was never read.
    assert!(fx.corrupted.exists());

    assert!(!fx.store.has_item("baz"));
    assert!(!fx.expired.exists());
}

#[test]
fn test_has_item_falls_back_to_content() {
    let fx = setup();
    let mut item = CacheItem::new("bar");
    item.set("v".to_string()).expires_at(at(now_secs() + 1000));
    fx.store.save(&mut item).unwrap();

    // Stale mtime, fresh content: content wins.
    touch(&fx.missed, now_secs() - 100);
    assert!(fx.store.has_item("bar"));
    assert!(fx.missed.exists());
}

#[test]
fn test_has_item_stale_mtime_corrupt_content() {
    let fx = setup();
    touch(&fx.corrupted, now_secs() - 100);

    assert!(!fx.store.has_item("foo"));
    assert!(!fx.corrupted.exists());
}

#[test]
fn test_get_corrupted_removes_file() {
    let fx = setup();
    let item = fx.store.get_item::<u32>("foo");

    assert!(!item.is_hit());
    assert!(!fx.corrupted.exists());
}

#[test]
fn test_get_corrupted_kept_when_configured() {
    let fx = setup_with(|config| config.with_remove_corrupt(false));
    let item = fx.store.get_item::<u32>("foo");

    assert!(!item.is_hit());
    assert!(fx.corrupted.exists());
}

#[test]
fn test_get_with_wrong_type_is_a_miss() {
    let fx = setup();
    let mut item = CacheItem::new("bar");
    item.set("not a number".to_string());
    fx.store.save(&mut item).unwrap();

    let miss = fx.store.get_item::<u32>("bar");
    assert!(!miss.is_hit());

    // The entry belongs to whoever stored it as a string; it must survive.
    assert!(fx.missed.exists());
    let hit = fx.store.get_item::<String>("bar");
    assert!(hit.is_hit());
    assert_eq!(hit.get().map(String::as_str), Some("not a number"));
}

#[test]
fn test_relative_expiry_round_trips_exactly() {
    let fx = setup();
    let mut item = CacheItem::new("bar");
    item.set(1u32).expires_after(Duration::seconds(1000));
    fx.store.save(&mut item).unwrap();

    let saved = item.expiration().unwrap();
    assert_eq!(saved.timestamp_subsec_nanos(), 0);
    assert_eq!(mtime_secs(&fx.missed), saved.timestamp());
    assert_eq!(
        DateTime::<Utc>::from(fs::metadata(&fx.missed).unwrap().modified().unwrap()),
        saved
    );

    let hit = fx.store.get_item::<u32>("bar");
    assert!(hit.is_hit());
    assert_eq!(hit.expiration(), Some(saved));
}

#[test]
fn test_sub_second_expiry_agrees_between_has_and_get() {
    let fx = setup();
    let whole = now_secs() + 5;
    let expires_at = DateTime::from_timestamp(whole, 999_000_000).unwrap();
    let mut item = CacheItem::new("bar");
    item.set(1u32).expires_at(expires_at);
    fx.store.save(&mut item).unwrap();

    assert_eq!(item.expiration(), Some(at(whole)));
    assert_eq!(mtime_secs(&fx.missed), whole);
    assert!(fx.store.has_item("bar"));
    assert_eq!(fx.store.get_item::<u32>("bar").expiration(), Some(at(whole)));
}

#[test]
fn test_out_of_range_ttl_rejected_at_open() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::default()
        .with_directory(temp_dir.path())
        .with_default_ttl_secs(i64::MAX);

    assert!(matches!(
        FilesystemStore::open(config),
        Err(CacheError::Config { .. })
    ));
}

#[test]
fn test_overwrite_replaces_value() {
    let fx = setup();
    for value in [1u32, 2, 3] {
        let mut item = CacheItem::new("bar");
        item.set(value);
        fx.store.save(&mut item).unwrap();
    }

    assert_eq!(fx.store.get_item::<u32>("bar").into_value(), Some(3));
    let files: Vec<_> = fs::read_dir(fx.store.namespace_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .collect();
    assert!(files.is_empty(), "temp files remain: {:?}", files);
}

#[test]
fn test_prune_expired_uses_mtime() {
    let fx = setup();
    assert_eq!(fx.store.prune_expired(), 1);
    assert!(!fx.expired.exists());
    assert!(fx.corrupted.exists());
}
