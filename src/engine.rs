//! Engine Module
//!
//! The key-value engine composing the record codec and the line store.
//!
//! ## Responsibilities
//! - Open (or create) the backing file once at startup
//! - Map put/get/delete onto find + write/erase
//! - Report whether a key existed before each mutation

use std::path::Path;

use crate::config::Config;
use crate::database::Database;
use crate::error::Result;
use crate::lines::{LineStore, Lookup};

/// The file-backed storage engine
///
/// ## Concurrency Model
///
/// The engine owns the backing file handle and every operation takes
/// `&mut self`. A `find` and the `write`/`erase` that uses its line index
/// are not isolated from other callers, so concurrent users must go through
/// one serialization point (the server wraps the engine in a `Mutex`).
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Line-addressed backing file
    store: LineStore,
}

impl Engine {
    /// Open or create an engine with the given config
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut store = LineStore::open(&config.data_file, config.sync_strategy)?;
        let line_count = store.line_count()?;

        tracing::info!(
            path = %config.data_file.display(),
            records = line_count,
            "Opened backing file"
        );

        Ok(Self { config, store })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified backing file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_file(path).build())
    }

    /// Put a key-value pair, returning whether the key already existed
    ///
    /// An existing record is rewritten at its line; a new one is appended.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        let (index, existed) = match self.store.find(key)? {
            Lookup::Found { index, .. } => (index, true),
            Lookup::Missing { line_count } => (line_count, false),
        };

        self.store.write(index, key, value)?;

        tracing::debug!(key_len = key.len(), value_len = value.len(), existed, "put");
        Ok(existed)
    }

    /// Get a value by key
    pub fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = match self.store.find(key)? {
            Lookup::Found { value, .. } => Some(value),
            Lookup::Missing { .. } => None,
        };

        tracing::debug!(key_len = key.len(), found = value.is_some(), "get");
        Ok(value)
    }

    /// Delete a key, returning whether it existed
    ///
    /// An absent key leaves the file untouched.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        let existed = match self.store.find(key)? {
            Lookup::Found { index, .. } => {
                self.store.erase(index)?;
                true
            }
            Lookup::Missing { .. } => false,
        };

        tracing::debug!(key_len = key.len(), existed, "delete");
        Ok(existed)
    }

    /// Sync the backing file to disk
    pub fn close(mut self) -> Result<()> {
        self.store.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the backing file path
    pub fn data_file(&self) -> &Path {
        self.store.path()
    }

    /// Get the number of records in the backing file
    pub fn record_count(&mut self) -> Result<usize> {
        self.store.line_count()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Database for Engine {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool> {
        Engine::put(self, key, value)
    }

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Engine::get(self, key)
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool> {
        Engine::delete(self, key)
    }
}
