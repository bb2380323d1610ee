//! In-memory transport for tests and dry runs.
//!
//! Records every request and answers from a queue of canned responses. When
//! the queue is empty it answers `200 {"status":true}`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use apipedia_core::{ApiRequest, ApipediaError, RawResponse, Transport};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, ApipediaError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(RawResponse::new(status, body)));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(self, error: ApipediaError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, outcome: Result<RawResponse, ApipediaError>) {
        lock(&self.responses).push_back(outcome);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

fn lock<V>(m: &Mutex<V>) -> MutexGuard<'_, V> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApipediaError> {
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, r#"{"status":true}"#)))
    }
}
