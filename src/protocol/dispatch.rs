//! Request dispatch
//!
//! Validates a request, runs it against a [`Database`] and maps the outcome
//! to a response status.

use crate::database::Database;
use crate::error::FlatError;

use super::{Command, Request, Response, MAX_PAYLOAD_SIZE};

/// Run one request against `db`
///
/// | outcome                    | status        | payload           |
/// |----------------------------|---------------|-------------------|
/// | PUT / DELETE succeeded     | `Ok`          | `OK`              |
/// | GET found the key          | `Ok`          | the raw value     |
/// | GET / DELETE missing key   | `NotFound`    | error message     |
/// | missing/repeated parameter | `BadRequest`  | error message     |
/// | storage failure            | `Error`       | error description |
/// | value too large to frame   | `Error`       | error description |
pub fn dispatch<D: Database + ?Sized>(db: &mut D, request: &Request) -> Response {
    let command = match Command::from_request(request) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!(method = ?request.method, "Rejected request: {}", e);
            return Response::bad_request(e);
        }
    };

    match run(db, command) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(method = ?request.method, "Storage failure: {}", e);
            Response::error(&e.to_string())
        }
    }
}

fn run<D: Database + ?Sized>(db: &mut D, command: Command) -> Result<Response, FlatError> {
    match command {
        Command::Put { key, value } => {
            tracing::info!(
                "Inserting key: {}, value: {}",
                String::from_utf8_lossy(&key),
                String::from_utf8_lossy(&value)
            );
            db.put(&key, &value)?;
            Ok(ok_text())
        }
        Command::Delete { key } => {
            tracing::info!("Deleting key: {}", String::from_utf8_lossy(&key));
            if db.delete(&key)? {
                Ok(ok_text())
            } else {
                Ok(Response::not_found())
            }
        }
        Command::Get { key } => {
            tracing::info!("Getting value at key: {}", String::from_utf8_lossy(&key));
            Ok(match db.get(&key)? {
                Some(value) if value.len() > MAX_PAYLOAD_SIZE as usize => {
                    tracing::error!(
                        value_len = value.len(),
                        "Value exceeds the {} byte response limit",
                        MAX_PAYLOAD_SIZE
                    );
                    Response::error(&format!(
                        "error: Value is {} bytes, larger than the {} byte response limit",
                        value.len(),
                        MAX_PAYLOAD_SIZE
                    ))
                }
                Some(value) => Response::ok(Some(value)),
                None => Response::not_found(),
            })
        }
    }
}

fn ok_text() -> Response {
    Response::ok(Some(b"OK".to_vec()))
}
