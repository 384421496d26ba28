//! The request pipeline: one HTTP call, auth attachment, failure
//! classification.
//!
//! # Design
//! `ApiClient` owns a transport and a session-store handle, nothing else.
//! Endpoint modules build a `Request` descriptor and hand it to `execute`;
//! the pipeline resolves the URL, re-reads the session store for the
//! current token (every call, no header caching), dispatches exactly once
//! and classifies the outcome. The pipeline never writes to the session
//! store — only the auth and user modules do that, explicitly.
//!
//! There are no retries and no request ordering. Concurrent calls are
//! independent; each one sees whatever token is current when it dispatches.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
use crate::session::SessionStore;

/// One API call, described before dispatch: method, path relative to the
/// base URL, optional query parameters and an optional JSON body.
#[derive(Debug, Clone)]
pub(crate) struct Request {
    method: HttpMethod,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<String>,
}

impl Request {
    pub(crate) fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Append the parameter only when a value is present. Absent filter
    /// criteria are simply not sent.
    pub(crate) fn query_opt(self, name: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    /// Attach a JSON body. Serialization failure means the request is never
    /// dispatched.
    pub(crate) fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| {
            ApiError::new(
                crate::error::ErrorKind::Unknown,
                format!("Failed to encode request body: {e}"),
            )
        })?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Client for the task-manager API.
///
/// Holds the base URL, a `Transport` and an explicit `SessionStore` handle.
/// All endpoint operations (auth, user, task, category) are methods on this
/// type, implemented in their resource modules.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Client backed by the production ureq transport, bounded by the
    /// configured timeout.
    pub fn new(config: ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        let transport = Box::new(UreqTransport::new(config.request_timeout()));
        Self::with_transport(config, session, transport)
    }

    /// Client with a caller-supplied transport. Used by tests to observe
    /// dispatched requests without a network.
    pub fn with_transport(
        config: ClientConfig,
        session: Arc<dyn SessionStore>,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            transport,
            session,
        }
    }

    /// The session store this client authenticates from.
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Dispatch and decode a JSON response body.
    pub(crate) fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let response = self.dispatch(&request)?;
        serde_json::from_str(&response.body).map_err(ApiError::decode)
    }

    /// Dispatch an operation whose response body is empty or irrelevant.
    pub(crate) fn execute_unit(&self, request: Request) -> Result<(), ApiError> {
        self.dispatch(&request).map(|_| ())
    }

    fn dispatch(&self, request: &Request) -> Result<HttpResponse, ApiError> {
        let url = self.resolve_url(request)?;

        let mut headers = Vec::new();
        if request.body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        // Re-read the store on every call so a token swap mid-session takes
        // effect immediately. A failed read degrades to an unauthenticated
        // request; store errors only surface from direct save/clear/read.
        match self.session.read() {
            Ok(Some(token)) => {
                headers.push(("authorization".to_string(), format!("Bearer {token}")));
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!("session read failed, dispatching unauthenticated: {err}");
            }
        }

        log::debug!("{} {}", request.method.as_str(), request.path);

        let wire_request = HttpRequest {
            method: request.method,
            url,
            headers,
            body: request.body.clone(),
        };

        let response = self.transport.execute(&wire_request).map_err(|err| match err {
            TransportError::TimedOut => ApiError::timeout(),
            TransportError::Connection(detail) => {
                log::debug!("transport failure on {}: {detail}", request.path);
                ApiError::network()
            }
        })?;

        if !(200..300).contains(&response.status) {
            let err = ApiError::from_status(response.status);
            log::debug!(
                "{} {} -> {} ({:?})",
                request.method.as_str(),
                request.path,
                response.status,
                err.kind
            );
            return Err(err);
        }

        Ok(response)
    }

    fn resolve_url(&self, request: &Request) -> Result<String, ApiError> {
        let mut url = url::Url::parse(&format!("{}{}", self.base_url, request.path))
            .map_err(|e| {
                ApiError::new(
                    crate::error::ErrorKind::Unknown,
                    format!("Invalid request URL: {e}"),
                )
            })?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url.into())
    }
}
