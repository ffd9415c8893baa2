use async_trait::async_trait;

use super::{SinkError, SinkOutcome, SubmissionSink};
use crate::sheets::SheetsAccess;
use crate::submission::Submission;

pub struct SheetsSink {
    access: SheetsAccess,
}

impl SheetsSink {
    pub fn new(access: SheetsAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl SubmissionSink for SheetsSink {
    fn id(&self) -> &str {
        "google_sheets"
    }

    async fn persist(&self, submission: &Submission) -> Result<SinkOutcome, SinkError> {
        let client = match &self.access {
            SheetsAccess::Available(client) => client,
            SheetsAccess::Unavailable(reason) => {
                tracing::warn!(
                    "Google Sheets saving skipped for submission {}: {reason}",
                    submission.id
                );
                return Ok(SinkOutcome::Skipped(reason.clone()));
            }
        };

        let outcome = client
            .append_row(&submission.sheet_row())
            .await
            .map_err(SinkError::from)?;

        Ok(SinkOutcome::Stored(match outcome.updated_range {
            Some(range) => format!("appended row at {range}"),
            None => "appended row".to_string(),
        }))
    }
}
