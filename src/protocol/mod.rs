//! Protocol Module
//!
//! Request model, parameter validation, dispatch, and wire framing for
//! client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌───────────┬──────────┬─────────────────────────────┐
//! │Method (1) │ Len (4)  │         Payload             │
//! └───────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! Payload: `param_count (2)` then per parameter
//! `name_len (4) + name + value_len (4) + value`. A parameter name may
//! repeat; the dispatcher rejects requests with zero or several values for
//! a required name.
//!
//! ### Methods
//! - 0x01: GET    - requires `key`
//! - 0x02: PUT    - requires `key` and `value`
//! - 0x03: DELETE - requires `key`
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: BAD_REQUEST
//! - 0x03: ERROR

mod command;
mod response;
mod codec;
mod dispatch;

pub use command::{Command, Method, ParamError, Request, KEY_PARAM, VALUE_PARAM};
pub use response::{Response, Status};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use dispatch::dispatch;
