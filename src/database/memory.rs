//! In-memory database
//!
//! HashMap-backed implementation of [`Database`].

use std::collections::HashMap;

use crate::error::Result;

use super::Database;

/// Database held entirely in memory; nothing is persisted
#[derive(Debug, Default, Clone)]
pub struct MemoryDatabase {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryDatabase {
    /// Create a new empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Database for MemoryDatabase {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        Ok(self.data.insert(key.to_vec(), value.to_vec()).is_some())
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }
}
