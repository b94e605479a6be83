//! Typed HTTP exchanges over pluggable collaborators.
//!
//! # Design
//! `RequestExecutor` holds only shared handles to its transport, encoder and
//! decoder and carries no per-call state, so one executor can serve any
//! number of concurrent calls. Every call runs the same linear pipeline:
//! validate the URL, build the request, encode the body, send, check the
//! status, decode. The first failing stage ends the call; nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::codec::{Decoder, Encoder, JsonDecoder, JsonEncoder};
use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportError, UreqTransport};

const CONTENT_TYPE: &str = "Content-Type";

/// Runs JSON-over-HTTP calls and decodes the result.
#[derive(Debug)]
pub struct RequestExecutor<T = UreqTransport, E = JsonEncoder, D = JsonDecoder> {
    transport: Arc<T>,
    encoder: Arc<E>,
    decoder: Arc<D>,
}

impl<T, E, D> Clone for RequestExecutor<T, E, D> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::with_transport(UreqTransport::new())
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// An executor using `transport` with JSON bodies.
    pub fn with_transport(transport: T) -> Self {
        Self::new(transport, JsonEncoder::default(), JsonDecoder)
    }
}

impl<T, E, D> RequestExecutor<T, E, D>
where
    T: Transport,
    E: Encoder,
    D: Decoder,
{
    pub fn new(transport: T, encoder: E, decoder: D) -> Self {
        Self {
            transport: Arc::new(transport),
            encoder: Arc::new(encoder),
            decoder: Arc::new(decoder),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one request and decode the response body as `R`.
    ///
    /// When `body` is present it is encoded and sent with
    /// `Content-Type: application/json`, overriding any `Content-Type` in
    /// `headers`.
    pub async fn execute<R, B>(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&B>,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.dispatch(url, method, body, headers).await?;

        if response.body.is_empty() {
            debug!(%method, url, status = response.status, "empty response body");
            return Err(FetchError::NoData);
        }

        self.decoder.decode(&response.body).map_err(|e| {
            debug!(%method, url, error = %e, "response body did not decode");
            FetchError::Decoding(e)
        })
    }

    /// Like `execute`, but discards the response body.
    ///
    /// For endpoints that answer with an empty 2xx such as `204 No Content`.
    pub async fn execute_empty<B>(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&B>,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<(), FetchError>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(url, method, body, headers).await.map(|_| ())
    }

    pub async fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R, FetchError> {
        self.execute::<R, ()>(url, HttpMethod::Get, None, None).await
    }

    pub async fn get_with_headers<R: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<R, FetchError> {
        self.execute::<R, ()>(url, HttpMethod::Get, None, Some(headers)).await
    }

    pub async fn post<R, B>(&self, url: &str, body: &B) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(url, HttpMethod::Post, Some(body), None).await
    }

    pub async fn put<R, B>(&self, url: &str, body: &B) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(url, HttpMethod::Put, Some(body), None).await
    }

    pub async fn patch<R, B>(&self, url: &str, body: &B) -> Result<R, FetchError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(url, HttpMethod::Patch, Some(body), None).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, url: &str) -> Result<R, FetchError> {
        self.execute::<R, ()>(url, HttpMethod::Delete, None, None).await
    }

    /// DELETE for endpoints that answer without a body.
    pub async fn delete_empty(&self, url: &str) -> Result<(), FetchError> {
        self.execute_empty::<()>(url, HttpMethod::Delete, None, None).await
    }

    /// Assemble the request for one call without sending it.
    pub fn build_request<B>(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&B>,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<HttpRequest, FetchError>
    where
        B: Serialize + ?Sized,
    {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut request = HttpRequest::new(method, parsed);

        if let Some(headers) = headers {
            for (name, value) in headers {
                request.set_header(name.as_str(), value.as_str());
            }
        }

        if let Some(body) = body {
            let bytes = self.encoder.encode(body).map_err(FetchError::Encoding)?;
            request.body = Some(bytes);
            request.set_header(CONTENT_TYPE, self.encoder.content_type());
        }

        Ok(request)
    }

    /// Steps shared by every entry point: build, send, validate.
    async fn dispatch<B>(
        &self,
        url: &str,
        method: HttpMethod,
        body: Option<&B>,
        headers: Option<&HashMap<String, String>>,
    ) -> Result<HttpResponse, FetchError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(url, method, body, headers)?;

        debug!(%method, url, "dispatching request");
        let response = self.transport.send(request).await.map_err(|e| match e {
            TransportError::Protocol(msg) => FetchError::InvalidResponse(msg),
            other => {
                debug!(%method, url, error = %other, "transport failed");
                FetchError::Transport(other)
            }
        })?;

        if !response.is_success() {
            debug!(%method, url, status = response.status, "unexpected status");
            return Err(FetchError::UnexpectedStatus(response.status));
        }
        Ok(response)
    }
}
