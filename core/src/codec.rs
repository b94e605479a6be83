//! Body serialization for requests and responses.
//!
//! The executor only talks to `Encoder` and `Decoder`; JSON via `serde_json`
//! is the provided implementation.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BoxError;

/// Turns a typed request body into bytes.
pub trait Encoder: Send + Sync {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BoxError>;

    /// Media type sent as `Content-Type` alongside an encoded body.
    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Turns response bytes into a typed value.
pub trait Decoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BoxError>;
}

/// JSON encoder. Compact output unless `pretty` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pub pretty: bool,
}

impl JsonEncoder {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
