//! Shared test doubles: a scripted transport that records every request it
//! is asked to dispatch.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::session::MemorySessionStore;

/// Records dispatched requests and replays a scripted sequence of outcomes.
/// Panics on an unscripted request so tests asserting "zero network calls"
/// fail loudly.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.script.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub(crate) fn fail(&self, err: TransportError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for Arc<FakeTransport> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted request: {} {}", request.method.as_str(), request.url))
    }
}

/// A client wired to a fresh in-memory session store and a fake transport.
pub(crate) fn client_with_fake() -> (ApiClient, Arc<MemorySessionStore>, Arc<FakeTransport>) {
    let session = Arc::new(MemorySessionStore::new());
    let transport = FakeTransport::new();
    let client = ApiClient::with_transport(
        ClientConfig::new("http://localhost:3000"),
        session.clone(),
        Box::new(transport.clone()),
    );
    (client, session, transport)
}
