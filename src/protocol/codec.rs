//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌───────────┬──────────┬─────────────────────────────┐
//! │Method (1) │ Len (4)  │         Payload             │
//! └───────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Request Payload
//! - param_count (2 bytes)
//! - per param: name_len (4 bytes) + name + value_len (4 bytes) + value
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use crate::error::{FlatError, Result};

use super::{Method, Request, Response, Status};

/// Header size: 1 byte method/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: method (1) + payload_len (4) + payload
///
/// Fails if the request has more than `u16::MAX` parameters or its payload
/// would exceed `MAX_PAYLOAD_SIZE`, since the peer could not decode it.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    let count = u16::try_from(request.params.len()).map_err(|_| {
        FlatError::Protocol(format!(
            "Too many parameters: {} (max {})",
            request.params.len(),
            u16::MAX
        ))
    })?;

    let mut payload = Vec::new();
    payload.extend_from_slice(&count.to_be_bytes());
    for (name, value) in &request.params {
        payload.extend_from_slice(&field_len(name.len())?.to_be_bytes());
        payload.extend_from_slice(name.as_bytes());
        payload.extend_from_slice(&field_len(value.len())?.to_be_bytes());
        payload.extend_from_slice(value);
    }

    frame(request.method as u8, &payload)
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let (method_byte, mut payload) = unframe(bytes, "request")?;

    let method = Method::from_byte(method_byte).ok_or_else(|| {
        FlatError::Protocol(format!("Unknown request method: 0x{:02x}", method_byte))
    })?;

    let count_bytes = take(&mut payload, 2, "parameter count")?;
    let count = u16::from_be_bytes([count_bytes[0], count_bytes[1]]) as usize;

    let mut params = Vec::with_capacity(count);
    for _ in 0..count {
        let name_len = take_u32(&mut payload, "parameter name length")? as usize;
        let name = take(&mut payload, name_len, "parameter name")?;
        let name = String::from_utf8(name.to_vec()).map_err(|_| {
            FlatError::Protocol("Parameter name is not valid UTF-8".to_string())
        })?;

        let value_len = take_u32(&mut payload, "parameter value length")? as usize;
        let value = take(&mut payload, value_len, "parameter value")?;

        params.push((name, value.to_vec()));
    }

    if !payload.is_empty() {
        return Err(FlatError::Protocol(format!(
            "Request has {} trailing bytes",
            payload.len()
        )));
    }

    Ok(Request { method, params })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
///
/// Fails if the payload exceeds `MAX_PAYLOAD_SIZE`.
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
///
/// An empty payload decodes as `None`.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = unframe(bytes, "response")?;

    let status = Status::from_byte(status_byte).ok_or_else(|| {
        FlatError::Protocol(format!("Unknown response status: 0x{:02x}", status_byte))
    })?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let message = read_frame(reader)?;
    decode_request(&message)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    writer.write_all(&encode_request(request)?)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader)?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response)?)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Framing helpers
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|len| *len <= MAX_PAYLOAD_SIZE)
        .ok_or_else(|| {
            FlatError::Protocol(format!(
                "Payload too large: {} bytes (max {})",
                payload.len(),
                MAX_PAYLOAD_SIZE
            ))
        })?;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(tag);
    message.extend_from_slice(&len.to_be_bytes());
    message.extend_from_slice(payload);
    Ok(message)
}

/// Length prefix for a parameter name or value
fn field_len(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| FlatError::Protocol(format!("Parameter too large: {} bytes", len)))
}

/// Split a frame into its tag byte and payload
fn unframe<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(FlatError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = payload_len(&bytes[..HEADER_SIZE])?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(FlatError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

/// Read one header plus payload from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = payload_len(&header)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Parse and bound-check the payload length from a header
fn payload_len(header: &[u8]) -> Result<usize> {
    let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    if len > MAX_PAYLOAD_SIZE {
        return Err(FlatError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

fn take<'a>(buf: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8]> {
    if buf.len() < n {
        return Err(FlatError::Protocol(format!(
            "Truncated {}: expected {} bytes, got {}",
            what,
            n,
            buf.len()
        )));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    let bytes = take(buf, 4, what)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
