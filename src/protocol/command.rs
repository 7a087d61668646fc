//! Request and command definitions
//!
//! A `Request` is what arrives from a client: a method plus a
//! multi-valued parameter list. A `Command` is a request whose parameters
//! have been checked.

use thiserror::Error;

/// Name of the key parameter
pub const KEY_PARAM: &str = "key";

/// Name of the value parameter
pub const VALUE_PARAM: &str = "value";

/// Request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Method {
    Get = 0x01,
    Put = 0x02,
    Delete = 0x03,
}

impl Method {
    /// Parse a wire method byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Method::Get),
            0x02 => Some(Method::Put),
            0x03 => Some(Method::Delete),
            _ => None,
        }
    }
}

/// A raw client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,

    /// Parameters in arrival order; names may repeat
    pub params: Vec<(String, Vec<u8>)>,
}

impl Request {
    /// Create a request with no parameters
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: Vec::new(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Well-formed GET request
    pub fn get(key: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::Get).param(KEY_PARAM, key)
    }

    /// Well-formed PUT request
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::Put)
            .param(KEY_PARAM, key)
            .param(VALUE_PARAM, value)
    }

    /// Well-formed DELETE request
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::Delete).param(KEY_PARAM, key)
    }

    /// All values supplied for `name`
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.params
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }
}

/// A request parameter is missing or repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("error: No key provided")]
    MissingKey,

    #[error("error: No value provided")]
    MissingValue,

    #[error("error: Multiple keys provided")]
    MultipleKeys,

    #[error("error: Multiple values provided")]
    MultipleValues,
}

/// A validated command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl Command {
    /// Validate a request's parameters
    ///
    /// Every method needs exactly one `key`; PUT also needs exactly one
    /// `value`. Absence is checked for all parameters before repetition.
    pub fn from_request(request: &Request) -> Result<Self, ParamError> {
        let keys: Vec<&[u8]> = request.values(KEY_PARAM).collect();

        match request.method {
            Method::Get | Method::Delete => {
                let key = single(&keys, ParamError::MissingKey, ParamError::MultipleKeys)?;
                Ok(if request.method == Method::Get {
                    Command::Get { key }
                } else {
                    Command::Delete { key }
                })
            }
            Method::Put => {
                let values: Vec<&[u8]> = request.values(VALUE_PARAM).collect();
                if keys.is_empty() {
                    return Err(ParamError::MissingKey);
                }
                if values.is_empty() {
                    return Err(ParamError::MissingValue);
                }
                let key = single(&keys, ParamError::MissingKey, ParamError::MultipleKeys)?;
                let value = single(&values, ParamError::MissingValue, ParamError::MultipleValues)?;
                Ok(Command::Put { key, value })
            }
        }
    }
}

/// Exactly one value, or the matching error
fn single(values: &[&[u8]], missing: ParamError, multiple: ParamError) -> Result<Vec<u8>, ParamError> {
    match values {
        [] => Err(missing),
        [only] => Ok(only.to_vec()),
        _ => Err(multiple),
    }
}
