//! Error types for FlatKV
//!
//! Provides a unified error type for all operations.
//!
//! A missing key is not an error anywhere in this crate: lookups report
//! absence through `Option`/`bool` results, so `FlatError` only carries
//! conditions that must reach the caller as failures.

use thiserror::Error;

use crate::record::DecodeError;

/// Result type alias using FlatError
pub type Result<T> = std::result::Result<T, FlatError>;

/// Unified error type for FlatKV operations
#[derive(Debug, Error)]
pub enum FlatError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// A stored line could not be decoded; the scan was aborted
    #[error("Corrupt record at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
