//! # FlatKV
//!
//! A key-value store persisted in one line-oriented flat file:
//! - One record per line, `<key length> <key><value>`
//! - Linear scan to locate a key
//! - Whole-file rewrite on every mutation
//! - TCP request server with a single serialization point
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Worker Thread Pool)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Request Dispatch                            │
//! │          (Parameter checks, Mutex<Database>)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Key-Value Engine                             │
//! │               (put / get / delete)                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Line Store  │─────────▶│Record Codec │
//!   │(scan/rewrite)│         │(len-prefix) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod lines;
pub mod engine;
pub mod database;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::Engine;
pub use database::{Database, MemoryDatabase};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FlatKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
