//! Record encoding and decoding

use thiserror::Error;

use super::SEPARATOR;

/// Why a stored line could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no separator after key length")]
    MissingSeparator,

    #[error("invalid key length {0:?}")]
    InvalidLength(String),

    #[error("key length {declared} exceeds the {available} bytes left on the line")]
    KeyOutOfBounds { declared: usize, available: usize },
}

/// A decoded record borrowing from its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordRef<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

/// An owned key-value record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Encode this record as a line (without the line break)
    pub fn encode(&self) -> Vec<u8> {
        encode(&self.key, &self.value)
    }

    /// Decode a line into an owned record
    pub fn decode(line: &[u8]) -> Result<Self, DecodeError> {
        decode(line).map(RecordRef::into_record)
    }
}

impl RecordRef<'_> {
    pub fn into_record(self) -> Record {
        Record::new(self.key, self.value)
    }
}

/// Encode a record as `<len(key)> <key><value>`
pub fn encode(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut line = Vec::with_capacity(20 + key.len() + value.len());
    encode_into(&mut line, key, value);
    line
}

/// Append the encoding of a record to `buf`
pub fn encode_into(buf: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    buf.extend_from_slice(key.len().to_string().as_bytes());
    buf.push(SEPARATOR);
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);
}

/// Decode a line produced by [`encode`]
///
/// Everything before the first space must be a non-negative decimal
/// integer `n`; the next `n` bytes are the key and the remainder of the
/// line is the value.
pub fn decode(line: &[u8]) -> Result<RecordRef<'_>, DecodeError> {
    let separator = line
        .iter()
        .position(|&b| b == SEPARATOR)
        .ok_or(DecodeError::MissingSeparator)?;

    let prefix = &line[..separator];
    let key_len = parse_length(prefix)?;

    let rest = &line[separator + 1..];
    if key_len > rest.len() {
        return Err(DecodeError::KeyOutOfBounds {
            declared: key_len,
            available: rest.len(),
        });
    }

    let (key, value) = rest.split_at(key_len);
    Ok(RecordRef { key, value })
}

/// Parse an ASCII-digit length prefix (no sign, no padding)
fn parse_length(prefix: &[u8]) -> Result<usize, DecodeError> {
    let invalid = || DecodeError::InvalidLength(String::from_utf8_lossy(prefix).into_owned());

    if prefix.is_empty() || !prefix.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    // All bytes are ASCII digits, so the slice is valid UTF-8
    std::str::from_utf8(prefix)
        .ok()
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or_else(invalid)
}
