//! Transport doubles shared by the integration test binaries.

#![allow(dead_code)]

use std::sync::Mutex;

use jsonfetch_core::{HttpRequest, HttpResponse, Transport, TransportError};

/// Answers every call with the same status and body and records what it was sent.
pub struct CannedTransport {
    status: u16,
    body: Vec<u8>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl CannedTransport {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for CannedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        Ok(HttpResponse::new(self.status, self.body.clone()))
    }
}

/// Answers with a JSON object derived from the last path segment of the URL,
/// after yielding so that concurrent calls interleave.
#[derive(Default)]
pub struct PathEchoTransport;

impl Transport for PathEchoTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tokio::task::yield_now().await;
        let id = request
            .url
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u64>().ok())
            .ok_or_else(|| TransportError::Protocol(format!("no id in {}", request.url)))?;
        let body = format!(r#"{{"id":{id},"name":"user-{id}"}}"#);
        Ok(HttpResponse::new(200, body))
    }
}
