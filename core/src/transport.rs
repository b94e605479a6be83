//! The network boundary.
//!
//! # Design
//! `Transport` is the only place where I/O happens. It takes a finished
//! `HttpRequest` and returns the status, headers and raw body as an
//! `HttpResponse`, whatever the status code. Status interpretation stays in
//! the executor.
//!
//! `UreqTransport` is the default implementation. ureq is a blocking client,
//! so each call runs on tokio's blocking pool and the caller only awaits the
//! join handle.

use std::future::Future;

use thiserror::Error;
use ureq::{Agent, RequestBuilder};

use crate::error::BoxError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failures below the HTTP layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// DNS, TLS, connection or I/O failure, including timeouts.
    #[error("{0}")]
    Network(#[source] BoxError),

    /// The peer did not produce a recognizable HTTP response.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The call was aborted before a response arrived.
    #[error("request cancelled")]
    Cancelled,
}

/// Performs one HTTP round-trip.
///
/// Implementations must be safe to share between concurrent calls; the
/// executor never serializes access to its transport.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// Transport backed by a `ureq::Agent`.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::from_agent(
            Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }

    pub fn with_user_agent(user_agent: &str) -> Self {
        Self::from_agent(
            Agent::config_builder()
                .http_status_as_error(false)
                .user_agent(user_agent)
                .build()
                .new_agent(),
        )
    }

    /// Wrap a caller-configured agent.
    ///
    /// The agent should have `http_status_as_error` disabled; otherwise
    /// non-2xx responses arrive as `TransportError::Network` instead of
    /// `FetchError::UnexpectedStatus`.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        match tokio::task::spawn_blocking(move || execute_blocking(&agent, request)).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(TransportError::Cancelled),
            Err(e) => Err(TransportError::Network(Box::new(e))),
        }
    }
}

fn execute_blocking(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let url = request.url.as_str();
    let headers = &request.headers;

    let result = match (request.method, request.body.as_deref()) {
        (HttpMethod::Get, None) => apply_headers(agent.get(url), headers).call(),
        (HttpMethod::Get, Some(body)) => apply_headers(agent.get(url), headers)
            .force_send_body()
            .send(body),
        (HttpMethod::Delete, None) => apply_headers(agent.delete(url), headers).call(),
        (HttpMethod::Delete, Some(body)) => apply_headers(agent.delete(url), headers)
            .force_send_body()
            .send(body),
        (HttpMethod::Post, None) => apply_headers(agent.post(url), headers).send_empty(),
        (HttpMethod::Post, Some(body)) => apply_headers(agent.post(url), headers).send(body),
        (HttpMethod::Put, None) => apply_headers(agent.put(url), headers).send_empty(),
        (HttpMethod::Put, Some(body)) => apply_headers(agent.put(url), headers).send(body),
        (HttpMethod::Patch, None) => apply_headers(agent.patch(url), headers).send_empty(),
        (HttpMethod::Patch, Some(body)) => apply_headers(agent.patch(url), headers).send(body),
    };

    let mut response = result.map_err(map_ureq_error)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    // ureq caps `read_to_vec` at 10 MiB unless told otherwise.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(map_ureq_error)?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn apply_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Protocol(e) => TransportError::Protocol(e.to_string()),
        other => TransportError::Network(Box::new(other)),
    }
}
