//! Line Store Module
//!
//! Owns the backing file and addresses it as an ordered sequence of lines.
//!
//! ## Responsibilities
//! - Scan the file from the start for the first line holding a key
//! - Replace or append one line
//! - Remove one line
//!
//! ## Mutation Model
//! Every mutation loads the whole file, edits the line sequence in memory,
//! truncates the file and writes the sequence back from offset 0. There is
//! no append fast path and no atomicity across the truncate and the write.
//!
//! Line indexes are transient: they are only valid until the next mutation,
//! so callers re-run [`LineStore::find`] right before [`LineStore::write`] or
//! [`LineStore::erase`].

mod store;

pub use store::{LineStore, Lookup};
