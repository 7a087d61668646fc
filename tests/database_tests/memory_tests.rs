//! Tests for MemoryDatabase
//!
//! The in-memory database has the same existence-reporting contract as the
//! file-backed engine.

use flatkv::{Database, MemoryDatabase};

#[test]
fn test_memory_put_reports_existence() {
    let mut db = MemoryDatabase::new();

    assert!(!db.put(b"k", b"v1").unwrap());
    assert!(db.put(b"k", b"v2").unwrap());
    assert_eq!(db.get(b"k").unwrap(), Some(b"v2".to_vec()));
    assert_eq!(db.len(), 1);
}

#[test]
fn test_memory_get_missing() {
    let mut db = MemoryDatabase::new();

    assert_eq!(db.get(b"missing").unwrap(), None);
    assert!(db.is_empty());
}

#[test]
fn test_memory_delete() {
    let mut db = MemoryDatabase::new();
    db.put(b"k", b"v").unwrap();

    assert!(db.delete(b"k").unwrap());
    assert!(!db.delete(b"k").unwrap());
    assert_eq!(db.get(b"k").unwrap(), None);
}

#[test]
fn test_memory_empty_key_and_value() {
    let mut db = MemoryDatabase::new();

    db.put(b"", b"x").unwrap();
    db.put(b"k", b"").unwrap();

    assert_eq!(db.get(b"").unwrap(), Some(b"x".to_vec()));
    assert_eq!(db.get(b"k").unwrap(), Some(Vec::new()));
}

#[test]
fn test_memory_through_trait_object() {
    let mut db: Box<dyn Database> = Box::new(MemoryDatabase::new());

    assert!(!db.put(b"a", b"1").unwrap());
    assert_eq!(db.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert!(db.delete(b"a").unwrap());
}
