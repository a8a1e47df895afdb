//! Persistence of form submissions.
//!
//! Every single, couple and feedback form is forwarded to a storage service as
//! one JSON document. Persistence is best effort: a failed submission is
//! reported to the caller, who must still display the computed result.
//!
//! # Sinks
//!
//! - [`HttpSubmissionSink`]: POSTs to `{base_url}/api/{single,couple,feedback}`
//!   and treats exactly HTTP 200 as success.
//! - [`LocalSubmissionSink`]: keeps records in memory, for development and tests.
//!
//! Use [`SubmissionSinkFactory`] to pick one from configuration.

pub mod factory;
pub mod http;
pub mod local;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{BirthRecord, Locale};

pub use factory::{SinkKind, SubmissionSinkFactory};
pub use http::HttpSubmissionSink;
pub use local::LocalSubmissionSink;

/// Result type for submissions.
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Why a submission did not reach storage.
///
/// Callers surface every variant as the same generic notice; the variants
/// exist so logs and tests can tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Submission to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Submission to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Submission to {endpoint} rejected with status {status}")]
    Rejected { endpoint: String, status: u16 },
}

impl SubmissionError {
    /// Timeouts and transport failures may succeed on a later attempt;
    /// a rejection will not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionError::Timeout { .. } | SubmissionError::Transport { .. }
        )
    }
}

/// Acknowledgement returned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Which form a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Single,
    Couple,
    Feedback,
}

impl RecordKind {
    /// Storage path, relative to the sink's base URL.
    pub fn path(&self) -> &'static str {
        match self {
            RecordKind::Single => "/api/single",
            RecordKind::Couple => "/api/couple",
            RecordKind::Feedback => "/api/feedback",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Single => "single",
            RecordKind::Couple => "couple",
            RecordKind::Feedback => "feedback",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two partners and their score, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleRecord {
    pub user1: BirthRecord,
    pub user2: BirthRecord,
    pub compatibility: u8,
}

/// Free-form feedback and the UI language it was written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub feedback: String,
    pub lang: Locale,
}

/// One document to persist. Serializes to the bare record body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SubmissionRecord {
    Single(BirthRecord),
    Couple(CoupleRecord),
    Feedback(FeedbackRecord),
}

impl SubmissionRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            SubmissionRecord::Single(_) => RecordKind::Single,
            SubmissionRecord::Couple(_) => RecordKind::Couple,
            SubmissionRecord::Feedback(_) => RecordKind::Feedback,
        }
    }
}

impl From<BirthRecord> for SubmissionRecord {
    fn from(record: BirthRecord) -> Self {
        SubmissionRecord::Single(record)
    }
}

impl From<CoupleRecord> for SubmissionRecord {
    fn from(record: CoupleRecord) -> Self {
        SubmissionRecord::Couple(record)
    }
}

impl From<FeedbackRecord> for SubmissionRecord {
    fn from(record: FeedbackRecord) -> Self {
        SubmissionRecord::Feedback(record)
    }
}

/// Destination for submitted records.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one sink is shared by all requests.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Persist one record.
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionResult<Ack>;

    /// Short identifier shown by the health endpoint.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, TimeZoneId};
    use chrono::{NaiveDate, NaiveTime};

    fn person(name: &str, gender: Gender) -> BirthRecord {
        BirthRecord::new(
            name,
            NaiveDate::from_ymd_opt(1995, 3, 7).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            gender,
            TimeZoneId::AsiaSeoul,
        )
    }

    #[test]
    fn test_single_wire_shape() {
        let record = SubmissionRecord::from(person("Mina", Gender::Female));
        assert_eq!(record.kind().path(), "/api/single");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "name": "Mina",
                "dob": "1995-03-07",
                "time": "14:30",
                "gender": "female",
                "country": "Asia/Seoul"
            })
        );
    }

    #[test]
    fn test_couple_wire_shape() {
        let record = SubmissionRecord::from(CoupleRecord {
            user1: person("Jun", Gender::Male),
            user2: person("Mina", Gender::Female),
            compatibility: 47,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(record.kind().path(), "/api/couple");
        assert_eq!(value["compatibility"], 47);
        assert_eq!(value["user1"]["name"], "Jun");
        assert_eq!(value["user2"]["gender"], "female");
    }

    #[test]
    fn test_feedback_wire_shape() {
        let record = SubmissionRecord::from(FeedbackRecord {
            feedback: "良い".to_string(),
            lang: Locale::Ja,
        });
        assert_eq!(record.kind().path(), "/api/feedback");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"feedback": "良い", "lang": "ja"})
        );
    }

    #[test]
    fn test_retryable_kinds() {
        let endpoint = "http://localhost:3000/api/single".to_string();
        assert!(SubmissionError::Timeout { endpoint: endpoint.clone() }.is_retryable());
        assert!(SubmissionError::Transport {
            endpoint: endpoint.clone(),
            reason: "refused".into()
        }
        .is_retryable());
        assert!(!SubmissionError::Rejected { endpoint, status: 500 }.is_retryable());
    }
}
