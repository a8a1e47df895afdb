//! Submission sink backed by the storage HTTP service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::{Ack, SubmissionError, SubmissionRecord, SubmissionResult, SubmissionSink};

/// Default storage service address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each record as JSON to `{base_url}{kind.path()}`.
///
/// Only HTTP 200 counts as success; any other status is
/// [`SubmissionError::Rejected`]. Timeouts and connection failures are
/// retried `max_retries` times with a fixed delay between attempts.
#[derive(Debug, Clone)]
pub struct HttpSubmissionSink {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpSubmissionSink {
    /// Build a sink with no retries.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SubmissionResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Transport {
                endpoint: base_url.clone(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            retry_delay: Duration::ZERO,
        })
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_once(&self, endpoint: &str, record: &SubmissionRecord) -> SubmissionResult<Ack> {
        let response = self
            .client
            .post(endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| classify(endpoint, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(SubmissionError::Rejected {
                endpoint: endpoint.to_string(),
                status,
            });
        }

        // A 200 with an unreadable body is still a success.
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });

        Ok(Ack { status, message })
    }
}

fn classify(endpoint: &str, error: reqwest::Error) -> SubmissionError {
    if error.is_timeout() {
        SubmissionError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        SubmissionError::Transport {
            endpoint: endpoint.to_string(),
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionResult<Ack> {
        let endpoint = format!("{}{}", self.base_url, record.kind().path());

        let mut attempt = 0;
        loop {
            match self.post_once(&endpoint, record).await {
                Ok(ack) => {
                    debug!("Stored {} record at {} (attempt {})", record.kind(), endpoint, attempt + 1);
                    return Ok(ack);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("{}; retrying ({}/{})", e, attempt, self.max_retries);
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
