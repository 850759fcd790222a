use faro_tui::core::cache::DirectoryCache;
use faro_tui::core::fm::SortMode;

use std::fs::{self, File};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

fn names(record: &faro_tui::core::cache::DirRecord) -> Vec<String> {
    record
        .entries()
        .iter()
        .map(|e| e.name_str().into_owned())
        .collect()
}

#[test]
fn test_unmodified_directory_is_a_cache_hit() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("one.txt"))?;

    let mut cache = DirectoryCache::new(100);
    let first = cache.get(dir.path(), false, SortMode::Name)?;
    let second = cache.get(dir.path(), false, SortMode::Name)?;

    assert!(
        Arc::ptr_eq(&first, &second),
        "expected the identical record object on a hit"
    );
    Ok(())
}

#[test]
fn test_mtime_change_forces_rescan() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("one.txt"))?;

    let mut cache = DirectoryCache::new(100);
    let first = cache.get(dir.path(), false, SortMode::Name)?;
    assert_eq!(first.len(), 1);

    // Make sure the directory mtime moves past the recorded one.
    thread::sleep(Duration::from_millis(20));
    File::create(dir.path().join("two.txt"))?;

    let second = cache.get(dir.path(), false, SortMode::Name)?;
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(names(&second), vec!["one.txt", "two.txt"]);
    Ok(())
}

#[test]
fn test_deletion_reflected_after_rescan() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("b"))?;
    File::create(dir.path().join("x.txt"))?;

    let mut cache = DirectoryCache::new(100);
    let record = cache.get(dir.path(), false, SortMode::Name)?;
    // Directories before files under name sort.
    assert_eq!(names(&record), vec!["b", "x.txt"]);

    thread::sleep(Duration::from_millis(20));
    fs::remove_file(dir.path().join("x.txt"))?;

    let record = cache.get(dir.path(), false, SortMode::Name)?;
    assert_eq!(names(&record), vec!["b"]);
    Ok(())
}

#[test]
fn test_name_sort_groups_dirs_case_insensitively() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("Zebra"))?;
    fs::create_dir(dir.path().join("apple"))?;
    File::create(dir.path().join("Banana.txt"))?;
    File::create(dir.path().join("aardvark.txt"))?;

    let mut cache = DirectoryCache::new(100);
    let record = cache.get(dir.path(), false, SortMode::Name)?;

    assert_eq!(
        names(&record),
        vec!["apple", "Zebra", "aardvark.txt", "Banana.txt"]
    );
    Ok(())
}

#[test]
fn test_hidden_entries_filtered_until_requested() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join(".secret"))?;
    File::create(dir.path().join("visible.txt"))?;

    let mut cache = DirectoryCache::new(100);
    let record = cache.get(dir.path(), false, SortMode::Name)?;
    assert_eq!(names(&record), vec!["visible.txt"]);

    // A preference change is a miss even while the mtime is unchanged.
    let record = cache.get(dir.path(), true, SortMode::Name)?;
    assert_eq!(names(&record), vec![".secret", "visible.txt"]);

    let record = cache.get(dir.path(), false, SortMode::Name)?;
    assert_eq!(names(&record), vec!["visible.txt"]);
    Ok(())
}

#[test]
fn test_size_sort_ascending() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("big.bin"), vec![0u8; 300])?;
    fs::write(dir.path().join("small.bin"), vec![0u8; 10])?;

    let mut cache = DirectoryCache::new(100);
    let record = cache.get(dir.path(), false, SortMode::Size)?;
    assert_eq!(names(&record), vec!["small.bin", "big.bin"]);
    Ok(())
}

#[test]
fn test_missing_directory_reports_not_found() {
    let mut cache = DirectoryCache::new(100);
    let err = cache
        .get(std::path::Path::new("/faro/does/not/exist"), false, SortMode::Name)
        .expect_err("expected an error for a missing directory");
    assert!(err.to_string().contains("Not found"), "got: {err}");
}
