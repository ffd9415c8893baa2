use reqwest::Url;
use serde_json::json;

use super::token::{truncated_body, TokenProvider};

#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    pub updated_range: Option<String>,
}

/// Appends rows to one range of one spreadsheet.
pub struct SheetsClient {
    client: reqwest::Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
    append_url: Url,
}

impl SheetsClient {
    pub fn new(
        client: reqwest::Client,
        tokens: TokenProvider,
        api_base: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Self, String> {
        let append_segment = format!("{range}:append");
        let mut append_url =
            Url::parse(api_base).map_err(|e| format!("Invalid Sheets API base '{api_base}': {e}"))?;

        append_url
            .path_segments_mut()
            .map_err(|_| format!("Sheets API base '{api_base}' cannot carry a path"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                append_segment.as_str(),
            ]);

        append_url
            .query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        Ok(Self {
            client,
            tokens,
            spreadsheet_id: spreadsheet_id.to_string(),
            append_url,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn service_account(&self) -> &str {
        self.tokens.client_email()
    }

    /// Append a single row. Values are sent as user-entered, so the sheet
    /// applies its own type coercion.
    pub async fn append_row(&self, row: &[String]) -> Result<AppendOutcome, String> {
        let token = self.tokens.access_token().await?;

        let resp = self
            .client
            .post(self.append_url.clone())
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| format!("Sheets append request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncated_body(resp).await;
            return Err(format!("Sheets API returned {status}: {body}"));
        }

        let body: serde_json::Value = resp.json().await.unwrap_or_default();
        let updated_range = body
            .get("updates")
            .and_then(|u| u.get("updatedRange"))
            .and_then(|r| r.as_str())
            .map(|s| s.to_string());

        Ok(AppendOutcome { updated_range })
    }
}
