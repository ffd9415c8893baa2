pub mod fields;
pub mod parser;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use fields::FormFields;

/// Spreadsheet column order for every appended row.
pub const SHEET_COLUMNS: [&str; 5] = ["timestamp", "name", "email", "phone", "message"];

/// One received form post. Lives only until both sinks have seen it.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub fields: Map<String, Value>,
    pub form: FormFields,
    pub received_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self::with_received_at(fields, Utc::now())
    }

    pub fn with_received_at(fields: Map<String, Value>, received_at: DateTime<Utc>) -> Self {
        let form = FormFields::from_map(&fields);
        Self {
            id: Uuid::now_v7(),
            fields,
            form,
            received_at,
        }
    }

    /// The submission's own `timestamp` field if it is RFC 3339, otherwise
    /// the receive time as ISO-8601. Free-text values stay in the field map
    /// and never reach the log-line prefix.
    pub fn timestamp(&self) -> String {
        self.form
            .timestamp
            .as_deref()
            .filter(|raw| DateTime::parse_from_rfc3339(raw).is_ok())
            .map(str::to_owned)
            .unwrap_or_else(|| {
                self.received_at
                    .to_rfc3339_opts(SecondsFormat::Millis, true)
            })
    }

    /// `<timestamp>: <fields as JSON>` terminated by a newline.
    pub fn log_line(&self) -> String {
        let json = Value::Object(self.fields.clone()).to_string();
        format!("{}: {json}\n", self.timestamp())
    }

    /// Row values in `SHEET_COLUMNS` order; missing fields become "".
    pub fn sheet_row(&self) -> Vec<String> {
        let form = &self.form;
        vec![
            self.timestamp(),
            form.name.clone().unwrap_or_default(),
            form.email.clone().unwrap_or_default(),
            form.phone.clone().unwrap_or_default(),
            form.message.clone().unwrap_or_default(),
        ]
    }
}
