//! Sink factory for dependency injection.
//!
//! Builds the configured [`SubmissionSink`] once at startup; the result is
//! shared by every request.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use super::http::HttpSubmissionSink;
use super::local::LocalSubmissionSink;
use super::{SubmissionResult, SubmissionSink};
use crate::config::SubmissionSettings;

/// Sink implementation selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkKind {
    /// Storage HTTP service
    #[default]
    Http,
    /// In-memory list
    Local,
}

impl FromStr for SinkKind {
    type Err = String;

    /// Parse sink kind from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("http", "remote", "local", "memory")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown submission sink kind: {}", s)),
        }
    }
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Http => "http",
            SinkKind::Local => "local",
        }
    }
}

/// Factory for submission sinks.
///
/// # Example
/// ```ignore
/// use destinypath::config::SubmissionSettings;
/// use destinypath::submission::{SinkKind, SubmissionSinkFactory};
///
/// let settings = SubmissionSettings::default();
/// let sink = SubmissionSinkFactory::create(SinkKind::Http, &settings)?;
/// ```
pub struct SubmissionSinkFactory;

impl SubmissionSinkFactory {
    /// Create a sink of the given kind.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn SubmissionSink>)` - Shared sink instance
    /// * `Err(SubmissionError)` - If the HTTP client cannot be built
    pub fn create(
        kind: SinkKind,
        settings: &SubmissionSettings,
    ) -> SubmissionResult<Arc<dyn SubmissionSink>> {
        match kind {
            SinkKind::Http => {
                let sink = Self::create_http(settings)?;
                Ok(Arc::new(sink) as Arc<dyn SubmissionSink>)
            }
            SinkKind::Local => Ok(Self::create_local()),
        }
    }

    /// Create an HTTP sink from settings.
    pub fn create_http(settings: &SubmissionSettings) -> SubmissionResult<HttpSubmissionSink> {
        let sink = HttpSubmissionSink::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?
        .with_retries(
            settings.max_retries,
            Duration::from_millis(settings.retry_delay_ms),
        );
        Ok(sink)
    }

    /// Create an in-memory sink.
    pub fn create_local() -> Arc<dyn SubmissionSink> {
        Arc::new(LocalSubmissionSink::new())
    }
}
