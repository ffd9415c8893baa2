use std::net::IpAddr;
use std::path::PathBuf;

pub const DEFAULT_PING_URL: &str = "https://hf-object-detect-three.onrender.com";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
    pub log_file: String,
    pub ping_url: String,
    pub max_body_size: usize,
    pub log_level: String,
    pub dead_letter_file: Option<PathBuf>,
    pub sheets: SheetsConfig,
}

/// Raw Google Sheets settings. Validation happens once in
/// `SheetsAccess::load`, which never fails the process.
#[derive(Clone)]
pub struct SheetsConfig {
    pub credentials: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub range: String,
    pub api_base: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMSINK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_HOST: {e}"))?;

        // PORT is what most hosting platforms inject, so it takes precedence.
        let port: u16 = std::env::var("PORT")
            .or_else(|_| std::env::var("FORMSINK_PORT"))
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let public_dir = PathBuf::from(env_or("FORMSINK_PUBLIC_DIR", "public"));
        let log_file = env_or("FORMSINK_LOG_FILE", "submissions.txt");
        if log_file.is_empty() || log_file.contains(['/', '\\']) {
            return Err(format!("Invalid FORMSINK_LOG_FILE '{log_file}': must be a plain file name"));
        }

        let ping_url = env_or("FORMSINK_PING_URL", DEFAULT_PING_URL);

        let max_body_size: usize = env_or("FORMSINK_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid FORMSINK_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("FORMSINK_LOG_LEVEL", "info");

        let dead_letter_file = std::env::var("FORMSINK_DEAD_LETTER_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let sheets = SheetsConfig {
            credentials: std::env::var("GOOGLE_CREDENTIALS").ok(),
            spreadsheet_id: std::env::var("SPREADSHEET_ID").ok(),
            range: env_or("FORMSINK_SHEET_RANGE", "Sheet1!A:E"),
            api_base: env_or("FORMSINK_SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE),
        };

        Ok(Config {
            host,
            port,
            public_dir,
            log_file,
            ping_url,
            max_body_size,
            log_level,
            dead_letter_file,
            sheets,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.public_dir.join(&self.log_file)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
