//! In-memory submission sink.

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;

use super::{Ack, SubmissionRecord, SubmissionResult, SubmissionSink};

/// Keeps every record in process memory.
///
/// Always acknowledges with status 200. Records are lost on restart.
#[derive(Debug, Default)]
pub struct LocalSubmissionSink {
    records: Mutex<Vec<SubmissionRecord>>,
}

impl LocalSubmissionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored so far, oldest first.
    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl SubmissionSink for LocalSubmissionSink {
    async fn submit(&self, record: &SubmissionRecord) -> SubmissionResult<Ack> {
        let mut records = self.records.lock();
        records.push(record.clone());
        debug!("Stored {} record in memory ({} total)", record.kind(), records.len());
        Ok(Ack {
            status: 200,
            message: None,
        })
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
