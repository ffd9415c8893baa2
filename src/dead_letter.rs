use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::submission::Submission;

/// Where failed persistence attempts end up. The HTTP caller never sees
/// these, so they are counted and optionally kept as JSON lines.
pub struct DeadLetter {
    failures: AtomicU64,
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl DeadLetter {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            failures: AtomicU64::new(0),
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub async fn record(&self, sink: &str, submission: &Submission, error: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);

        let Some(path) = &self.path else {
            return;
        };

        let entry = json!({
            "submission_id": submission.id,
            "sink": sink,
            "error": error,
            "failed_at": Utc::now(),
            "fields": &submission.fields,
        });
        let line = format!("{entry}\n");

        let _guard = self.write_lock.lock().await;
        if let Err(e) = append(path, line.as_bytes()).await {
            tracing::error!(
                "Failed to write dead letter for submission {} to {}: {e}",
                submission.id,
                path.display()
            );
        }
    }
}

async fn append(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}
