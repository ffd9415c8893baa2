#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use formsink::config::{Config, SheetsConfig, DEFAULT_SHEETS_API_BASE};
use formsink::worker::WorkerHandle;

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/service-account-key.pem");
pub const SPREADSHEET_ID: &str = "test-spreadsheet";
pub const APPEND_PATH: &str = "/v4/spreadsheets/test-spreadsheet/values/Sheet1!A:E:append";

/// A running test server with its own public dir.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub public_dir: PathBuf,
    pub worker: Option<WorkerHandle>,
    _tmp: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.public_dir.join("submissions.txt")
    }

    /// Submit JSON to the form endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (String, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        (resp.text().await.unwrap_or_default(), status)
    }

    pub async fn health(&self) -> Value {
        self.client
            .get(self.url("/health"))
            .send()
            .await
            .expect("health request failed")
            .json()
            .await
            .expect("health body is not JSON")
    }

    /// Wait until the append log holds at least `count` lines.
    pub async fn wait_for_log_lines(&self, count: usize) -> Vec<String> {
        let path = self.log_path();
        wait_until(|| {
            let lines = read_lines(&path);
            (lines.len() >= count).then_some(lines)
        })
        .await
        .unwrap_or_else(|| panic!("log never reached {count} lines: {:?}", read_lines(&path)))
    }

    /// Wait until the persistence failure counter reaches `count`.
    pub async fn wait_for_failures(&self, count: u64) {
        for _ in 0..250 {
            if self.health().await["persistence_failures"].as_u64() >= Some(count) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("persistence failures never reached {count}");
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(|l| l.to_string()).collect())
        .unwrap_or_default()
}

/// Poll `check` for up to five seconds.
pub async fn wait_until<T>(mut check: impl FnMut() -> Option<T>) -> Option<T> {
    for _ in 0..250 {
        if let Some(value) = check() {
            return Some(value);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    None
}

/// Split a log line into its timestamp and decoded field mapping.
pub fn parse_log_line(line: &str) -> (String, Value) {
    let (timestamp, json) = line
        .split_once(": ")
        .unwrap_or_else(|| panic!("malformed log line: {line}"));
    let fields: Value = serde_json::from_str(json).expect("log line suffix is not JSON");
    (timestamp.to_string(), fields)
}

/// Service-account key JSON whose token endpoint is `token_uri`.
pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "formsink-test",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "formsink@formsink-test.iam.gserviceaccount.com",
        "token_uri": token_uri,
    })
    .to_string()
}

/// Point the Sheets settings at a mock server that serves both OAuth and Sheets.
pub fn use_mock_sheets(config: &mut Config, mock_uri: &str) {
    config.sheets = SheetsConfig {
        credentials: Some(service_account_json(&format!("{mock_uri}/token"))),
        spreadsheet_id: Some(SPREADSHEET_ID.to_string()),
        range: "Sheet1!A:E".to_string(),
        api_base: mock_uri.to_string(),
    };
}

pub fn test_config(public_dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        public_dir: public_dir.to_path_buf(),
        log_file: "submissions.txt".to_string(),
        // Nothing listens on port 1, so pings fail unless a test overrides this.
        ping_url: "http://127.0.0.1:1/".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        dead_letter_file: None,
        sheets: SheetsConfig {
            credentials: None,
            spreadsheet_id: None,
            range: "Sheet1!A:E".to_string(),
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
        },
    }
}

/// Spawn a test app with default settings.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app after letting the test adjust its config.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    // Deliberately not created: the log sink must create it.
    let public_dir = tmp.path().join("public");

    let mut config = test_config(&public_dir);
    configure(&mut config);
    let public_dir = config.public_dir.clone();

    let (app, worker) = formsink::build_app(config).expect("Failed to build app");

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        public_dir,
        worker: Some(worker),
        _tmp: tmp,
    }
}
