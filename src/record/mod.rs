//! Record Codec Module
//!
//! Encodes one key-value record as one line of text.
//!
//! ## Line Format
//! ```text
//! ┌──────────────────┬───────┬─────────────┬───────────────┐
//! │ KeyLen (decimal) │ SPACE │ Key (KeyLen)│ Value (rest)  │
//! └──────────────────┴───────┴─────────────┴───────────────┘
//! ```
//!
//! The value follows the key with no delimiter. The decimal key length is
//! the only thing that marks the boundary, so keys and values may contain
//! spaces or text that looks like another record. A line-break byte in a key
//! or value is not escaped and will split the record.

mod codec;

pub use codec::{decode, encode, encode_into, DecodeError, Record, RecordRef};

/// Byte separating the length prefix from the key
pub const SEPARATOR: u8 = b' ';

/// Byte terminating a line in the backing file
pub const LINE_BREAK: u8 = b'\n';
