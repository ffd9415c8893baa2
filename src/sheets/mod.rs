//! Google Sheets row-append client and the startup decision of whether the
//! spreadsheet target is usable at all.

pub mod client;
pub mod credentials;
pub mod token;

use std::sync::Arc;

use crate::config::SheetsConfig;

pub use client::{AppendOutcome, SheetsClient};
pub use credentials::ServiceAccountKey;
pub use token::TokenProvider;

/// Resolved once at startup and never reloaded.
#[derive(Clone)]
pub enum SheetsAccess {
    Available(Arc<SheetsClient>),
    Unavailable(String),
}

impl SheetsAccess {
    /// Never fails the process. Any problem with the credentials or the
    /// spreadsheet id disables spreadsheet writes until restart.
    pub fn load(config: &SheetsConfig, client: reqwest::Client) -> Self {
        match build_client(config, client) {
            Ok(sheets) => {
                tracing::info!(
                    "Google Sheets configured (spreadsheet={}, account={})",
                    sheets.spreadsheet_id(),
                    sheets.service_account()
                );
                SheetsAccess::Available(Arc::new(sheets))
            }
            Err(reason) => {
                tracing::error!(
                    "Google Sheets disabled: {reason}. Submissions will only be written to the local log."
                );
                SheetsAccess::Unavailable(reason)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SheetsAccess::Available(_))
    }
}

fn build_client(config: &SheetsConfig, client: reqwest::Client) -> Result<SheetsClient, String> {
    let raw = config
        .credentials
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| "GOOGLE_CREDENTIALS environment variable is not set".to_string())?;

    let spreadsheet_id = config
        .spreadsheet_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "SPREADSHEET_ID environment variable is not set".to_string())?;

    let key = ServiceAccountKey::from_json(raw)?;
    let tokens = TokenProvider::new(client.clone(), key)?;

    SheetsClient::new(client, tokens, &config.api_base, spreadsheet_id, &config.range)
}
