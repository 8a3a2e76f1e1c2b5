//! HTTP analyzer backend.
//!
//! Issues `GET http://<host>:<port>/analyze?file=<path>` against the hybrid
//! analyzer and returns the body of a `200 OK` response. There is exactly one
//! attempt per call, bounded by the configured timeout.

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::traits::Analyzer;
use crate::core::{ClientError, ClientResult};

use async_trait::async_trait;

/// Analyzer reached over plain HTTP.
#[derive(Debug)]
pub struct HttpAnalyzer {
    config: AnalyzerConfig,
    client: reqwest::Client,
}

impl HttpAnalyzer {
    /// Creates an analyzer client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    ///
    /// A zero timeout leaves requests unbounded.
    pub fn new(config: AnalyzerConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            ClientError::configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    fn name(&self) -> &str {
        "hybrid-analyzer"
    }

    async fn analyze(&self, scan_file: &str) -> ClientResult<Vec<u8>> {
        let endpoint = self.config.endpoint();
        tracing::debug!(
            endpoint = %endpoint,
            scan_file = %scan_file,
            "Requesting analysis"
        );

        let response = self
            .client
            .get(&endpoint)
            .query(&[("file", scan_file)])
            .send()
            .await
            .map_err(|e| ClientError::connection_failed(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = %status, "Analyzer returned non-OK status");
            return Err(ClientError::HttpStatus {
                status: status.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::read_failed(e.to_string()))?;

        tracing::debug!(bytes = body.len(), "Analysis response received");
        Ok(body.to_vec())
    }
}
