//! Tests for LineStore
//!
//! These tests verify:
//! - Opening creates the backing file without truncating it
//! - find returns the first matching line and its index
//! - find reports the line count when nothing matches
//! - write replaces in range and appends out of range
//! - erase removes in range and is a no-op out of range
//! - Corrupt lines abort the scan

use std::fs;
use std::path::PathBuf;

use flatkv::config::SyncStrategy;
use flatkv::lines::{LineStore, Lookup};
use flatkv::record::DecodeError;
use flatkv::FlatError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, PathBuf, LineStore) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data");
    let store = LineStore::open(&path, SyncStrategy::OsBuffered).unwrap();
    (temp_dir, path, store)
}

fn setup_store_with(content: &str) -> (TempDir, PathBuf, LineStore) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data");
    fs::write(&path, content).unwrap();
    let store = LineStore::open(&path, SyncStrategy::OsBuffered).unwrap();
    (temp_dir, path, store)
}

fn read(path: &PathBuf) -> String {
    fs::read_to_string(path).unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_file() {
    let (_temp, path, mut store) = setup_store();

    assert!(path.exists());
    assert_eq!(read(&path), "");
    assert_eq!(store.line_count().unwrap(), 0);
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn test_open_keeps_existing_content() {
    let (_temp, path, mut store) = setup_store_with("5 alice30\n3 bob25");

    assert_eq!(read(&path), "5 alice30\n3 bob25");
    assert_eq!(store.line_count().unwrap(), 2);
}

// =============================================================================
// Find Tests
// =============================================================================

#[test]
fn test_find_in_empty_file() {
    let (_temp, _path, mut store) = setup_store();

    assert_eq!(
        store.find(b"alice").unwrap(),
        Lookup::Missing { line_count: 0 }
    );
}

#[test]
fn test_find_reports_index() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30\n3 bob25\n5 carol41");

    assert_eq!(
        store.find(b"bob").unwrap(),
        Lookup::Found {
            value: b"25".to_vec(),
            index: 1
        }
    );
    assert_eq!(
        store.find(b"carol").unwrap(),
        Lookup::Found {
            value: b"41".to_vec(),
            index: 2
        }
    );
}

#[test]
fn test_find_missing_reports_line_count() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30\n3 bob25");

    assert_eq!(
        store.find(b"dave").unwrap(),
        Lookup::Missing { line_count: 2 }
    );
}

#[test]
fn test_find_returns_first_match() {
    let (_temp, _path, mut store) = setup_store_with("1 kfirst\n1 ksecond");

    assert_eq!(
        store.find(b"k").unwrap(),
        Lookup::Found {
            value: b"first".to_vec(),
            index: 0
        }
    );
}

#[test]
fn test_find_does_not_match_key_prefix() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30");

    assert_eq!(
        store.find(b"ali").unwrap(),
        Lookup::Missing { line_count: 1 }
    );
}

#[test]
fn test_find_tolerates_trailing_line_break() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30\n");

    assert_eq!(
        store.find(b"nobody").unwrap(),
        Lookup::Missing { line_count: 1 }
    );
}

#[test]
fn test_find_is_repeatable() {
    let (_temp, _path, mut store) = setup_store_with("3 bob25");

    for _ in 0..3 {
        assert!(matches!(store.find(b"bob").unwrap(), Lookup::Found { index: 0, .. }));
    }
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_append_to_empty_file() {
    let (_temp, path, mut store) = setup_store();

    store.write(0, b"alice", b"30").unwrap();

    assert_eq!(read(&path), "5 alice30");
}

#[test]
fn test_write_append_past_end() {
    let (_temp, path, mut store) = setup_store_with("5 alice30");

    store.write(1, b"bob", b"25").unwrap();
    store.write(99, b"carol", b"41").unwrap();

    assert_eq!(read(&path), "5 alice30\n3 bob25\n5 carol41");
}

#[test]
fn test_write_replace_in_place() {
    let (_temp, path, mut store) = setup_store_with("5 alice30\n3 bob25\n5 carol41");

    store.write(1, b"bob", b"26").unwrap();

    assert_eq!(read(&path), "5 alice30\n3 bob26\n5 carol41");
}

#[test]
fn test_write_shorter_record_truncates_old_bytes() {
    let (_temp, path, mut store) = setup_store_with("5 alice30000000000");

    store.write(0, b"alice", b"1").unwrap();

    assert_eq!(read(&path), "5 alice1");
}

#[test]
fn test_write_drops_trailing_line_break() {
    let (_temp, path, mut store) = setup_store_with("5 alice30\n");

    store.write(1, b"bob", b"25").unwrap();

    assert_eq!(read(&path), "5 alice30\n3 bob25");
}

// =============================================================================
// Erase Tests
// =============================================================================

#[test]
fn test_erase_middle_line() {
    let (_temp, path, mut store) = setup_store_with("1 a1\n1 b2\n1 c3");

    store.erase(1).unwrap();

    assert_eq!(read(&path), "1 a1\n1 c3");
}

#[test]
fn test_erase_last_remaining_line() {
    let (_temp, path, mut store) = setup_store_with("3 bob25");

    store.erase(0).unwrap();

    assert_eq!(read(&path), "");
    assert_eq!(store.line_count().unwrap(), 0);
}

#[test]
fn test_erase_out_of_range_is_noop() {
    let (_temp, path, mut store) = setup_store_with("1 a1\n1 b2\n");

    store.erase(2).unwrap();
    store.erase(usize::MAX).unwrap();

    // Untouched, including the trailing line break
    assert_eq!(read(&path), "1 a1\n1 b2\n");
}

#[test]
fn test_erase_on_empty_file() {
    let (_temp, path, mut store) = setup_store();

    store.erase(0).unwrap();

    assert_eq!(read(&path), "");
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_find_aborts_on_bad_length() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30\nxx bob25\n3 bob25");

    match store.find(b"bob") {
        Err(FlatError::Decode { line, source }) => {
            assert_eq!(line, 1);
            assert_eq!(source, DecodeError::InvalidLength("xx".to_string()));
        }
        other => panic!("Expected decode error, got {:?}", other),
    }
}

#[test]
fn test_find_aborts_on_overlong_key() {
    let (_temp, _path, mut store) = setup_store_with("40 short");

    assert!(matches!(
        store.find(b"anything"),
        Err(FlatError::Decode {
            line: 0,
            source: DecodeError::KeyOutOfBounds { .. }
        })
    ));
}

#[test]
fn test_find_stops_before_corrupt_line_when_key_found() {
    let (_temp, _path, mut store) = setup_store_with("5 alice30\ngarbage");

    assert!(matches!(
        store.find(b"alice").unwrap(),
        Lookup::Found { index: 0, .. }
    ));
}

// =============================================================================
// Sync Strategy Tests
// =============================================================================

#[test]
fn test_every_write_sync() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data");
    let mut store = LineStore::open(&path, SyncStrategy::EveryWrite).unwrap();

    store.write(0, b"alice", b"30").unwrap();
    store.sync().unwrap();

    assert_eq!(read(&path), "5 alice30");
}
