//! Error types for the request executor.
//!
//! # Design
//! Each variant names the pipeline stage that failed, so callers can tell a
//! rejected URL (nothing was sent) from a transport failure, a non-2xx
//! status, or a body that would not decode. Underlying causes are kept as
//! `source` so they show up in error chains.

use thiserror::Error;

use crate::transport::TransportError;

/// Boxed cause carried by codec and transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `RequestExecutor`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL did not parse as an absolute URL. No request was sent.
    #[error("Invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The transport did not return a usable HTTP response.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// The server answered with a status outside 200..=299.
    #[error("Request failed with status code {0}")]
    UnexpectedStatus(u16),

    /// A successful response carried an empty body where a value was expected.
    #[error("No data received")]
    NoData,

    /// The request body could not be serialized.
    #[error("Encoding failed: {0}")]
    Encoding(#[source] BoxError),

    /// The response body could not be deserialized into the requested type.
    #[error("Decoding failed: {0}")]
    Decoding(#[source] BoxError),

    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
}

impl FetchError {
    /// The HTTP status, for `UnexpectedStatus`.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }

    /// `true` when the call failed before anything was handed to the transport.
    pub fn is_preflight(&self) -> bool {
        matches!(self, FetchError::InvalidUrl { .. } | FetchError::Encoding(_))
    }
}
