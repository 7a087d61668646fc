//! Database Module
//!
//! The put/get/delete interface the request dispatcher calls into.
//!
//! ## Implementations
//! - `Engine`: the file-backed store
//! - `MemoryDatabase`: HashMap-backed, used as a reference model in tests
//!   and for running the server without a backing file

mod memory;

pub use memory::MemoryDatabase;

use crate::error::Result;

/// Key-value operations with existence reporting
///
/// A missing key is reported through the return value, never as an error;
/// `Err` always means the store itself failed.
pub trait Database {
    /// Insert or overwrite `key`, returning whether it existed before
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<bool>;

    /// Look up `key`
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Remove `key`, returning whether it existed
    fn delete(&mut self, key: &[u8]) -> Result<bool>;
}
