//! Typed JSON-over-HTTP requests behind one call.
//!
//! # Overview
//! `RequestExecutor::execute` validates a URL, builds the request, encodes an
//! optional body as JSON, sends it through a `Transport`, checks for a 2xx
//! status and decodes the response body into the caller's type. Every failure
//! comes back as a `FetchError` naming the stage that failed.
//!
//! # Design
//! - The executor is stateless apart from shared handles to its transport,
//!   encoder and decoder, so concurrent calls never interfere.
//! - `Transport`, `Encoder` and `Decoder` are traits; tests substitute a
//!   recording transport instead of touching the network.
//! - `UreqTransport` with the JSON codecs is the default wiring.
//!
//! ```no_run
//! # async fn demo() -> Result<(), jsonfetch_core::FetchError> {
//! use jsonfetch_core::RequestExecutor;
//!
//! #[derive(serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let executor = RequestExecutor::default();
//! let user: User = executor.get("https://api.example.com/users/1").await?;
//! # let _ = (user.id, user.name);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;

pub use codec::{Decoder, Encoder, JsonDecoder, JsonEncoder};
pub use error::{BoxError, FetchError};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ParseMethodError};
pub use transport::{Transport, TransportError, UreqTransport};
