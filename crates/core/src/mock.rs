//! In-memory transport for tests: records every request and replays
//! queued responses in order.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use pollen_common::error::{PollenError, PollenResult};
use pollen_common::traits::{HttpRequest, HttpResponse, HttpTransport};

#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<PollenResult<HttpResponse>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.respond_raw(status, body.to_string())
    }

    /// Queue a response with an arbitrary body.
    pub fn respond_raw(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(PollenError::Network(message.to_string())))
    }

    pub fn push(self, response: PollenResult<HttpResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> PollenResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PollenError::Network("no mocked response queued".into())))
    }
}
