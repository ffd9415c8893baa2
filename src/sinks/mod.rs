pub mod log_file;
pub mod sheets;

use std::sync::Arc;

use async_trait::async_trait;

use crate::submission::Submission;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkOutcome {
    Stored(String),
    Skipped(String),
}

#[derive(Debug)]
pub struct SinkError {
    pub message: String,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for SinkError {
    fn from(s: String) -> Self {
        SinkError { message: s }
    }
}

/// A place a submission gets written to after the client has its response.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    fn id(&self) -> &str;
    async fn persist(&self, submission: &Submission) -> Result<SinkOutcome, SinkError>;
}

/// Sinks in registration order. The worker runs them concurrently.
pub struct SinkRegistry {
    sinks: Vec<Arc<dyn SubmissionSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn register(&mut self, sink: Arc<dyn SubmissionSink>) {
        self.sinks.push(sink);
    }

    pub fn list(&self) -> &[Arc<dyn SubmissionSink>] {
        &self.sinks
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
