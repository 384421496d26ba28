//! HTTP transport types and the wire-level executor.
//!
//! # Design
//! Requests and responses are plain data. The pipeline in `client` builds an
//! `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and status
//! interpretation happens back in the pipeline. Non-2xx statuses come back
//! as data, never as transport errors; `TransportError` is reserved for
//! failures where no HTTP response was received at all.
//!
//! `UreqTransport` is the real executor. Unit tests substitute a recording
//! fake to observe exactly what would hit the wire.

use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One outgoing HTTP request, fully resolved: absolute URL, final headers,
/// serialized body. Consumed once by a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The raw response to an `HttpRequest`, before status classification.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Raised only when no HTTP response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The configured timeout elapsed before a response was received.
    TimedOut,
    /// DNS failure, refused connection, broken pipe and friends.
    Connection(String),
}

/// Executes one HTTP round-trip. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a ureq agent.
///
/// Status-code-as-error is disabled so 4xx/5xx responses are returned as
/// data for the pipeline to classify. The timeout bounds the whole call.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(&request.url), &request.headers).call()
            }
            (HttpMethod::Delete, None) => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(&request.url), &request.headers)
                    .force_send_body()
                    .send(body.as_bytes())
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.url), &request.headers)
                    .send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&request.url), &request.headers).send_empty()
            }
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&request.url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => {
                with_headers(self.agent.put(&request.url), &request.headers).send_empty()
            }
            (HttpMethod::Patch, Some(body)) => {
                with_headers(self.agent.patch(&request.url), &request.headers)
                    .send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => {
                with_headers(self.agent.patch(&request.url), &request.headers).send_empty()
            }
        };

        let mut response = result.map_err(classify_transport_error)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify_transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::TimedOut,
        ureq::Error::Io(ref io)
            if io.kind() == std::io::ErrorKind::TimedOut
                || io.kind() == std::io::ErrorKind::WouldBlock =>
        {
            TransportError::TimedOut
        }
        other => TransportError::Connection(other.to_string()),
    }
}
