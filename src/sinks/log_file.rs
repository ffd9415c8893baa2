use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{SinkError, SinkOutcome, SubmissionSink};
use crate::submission::Submission;

/// Appends one line per submission to a text file under the public dir.
pub struct LogFileSink {
    path: PathBuf,
    // Serializes appends within the process so lines never interleave.
    write_lock: Mutex<()>,
}

impl LogFileSink {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SubmissionSink for LogFileSink {
    fn id(&self) -> &str {
        "log_file"
    }

    async fn persist(&self, submission: &Submission) -> Result<SinkOutcome, SinkError> {
        let line = submission.log_line();

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| SinkError::from(format!("Failed to create {}: {e}", dir.display())))?;
        }

        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SinkError::from(format!("Failed to open {}: {e}", self.path.display())))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SinkError::from(format!("Failed to append to {}: {e}", self.path.display())))?;
        file.flush()
            .await
            .map_err(|e| SinkError::from(format!("Failed to flush {}: {e}", self.path.display())))?;

        Ok(SinkOutcome::Stored(format!("appended to {}", self.path.display())))
    }
}
