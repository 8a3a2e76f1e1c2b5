//! Mock analyzer for testing.

use crate::analyzer::traits::Analyzer;
use crate::core::{ClientError, ClientResult};

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// What the mock answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// A `200 OK` with this body.
    Body(Vec<u8>),

    /// A non-OK status line, e.g. `503 Service Unavailable`.
    Status(String),

    /// A transport failure with this message.
    ConnectionFailure(String),
}

/// An analyzer that returns a configured response without network access.
#[derive(Debug)]
pub struct MockAnalyzer {
    response: RwLock<MockResponse>,
    requests: RwLock<Vec<String>>,
    call_count: AtomicU64,
}

impl MockAnalyzer {
    /// Creates a mock that answers with the given body.
    pub fn with_body(body: impl Into<Vec<u8>>) -> Self {
        Self::with_response(MockResponse::Body(body.into()))
    }

    /// Creates a mock with an arbitrary response.
    pub fn with_response(response: MockResponse) -> Self {
        Self {
            response: RwLock::new(response),
            requests: RwLock::new(Vec::new()),
            call_count: AtomicU64::new(0),
        }
    }

    /// Replaces the configured response.
    pub fn set_response(&self, response: MockResponse) {
        if let Ok(mut current) = self.response.write() {
            *current = response;
        }
    }

    /// Returns how many times `analyze` was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Returns the files requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .read()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, scan_file: &str) -> ClientResult<Vec<u8>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.write() {
            requests.push(scan_file.to_string());
        }

        let response = self
            .response
            .read()
            .map_err(|_| ClientError::connection_failed("mock state poisoned"))?
            .clone();

        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status) => Err(ClientError::HttpStatus { status }),
            MockResponse::ConnectionFailure(message) => {
                Err(ClientError::connection_failed(message))
            }
        }
    }
}
