use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::constants::*;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write access log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("spreadsheet request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("missing spreadsheet credentials: set {0}")]
    MissingCredentials(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub date: String,
    pub time: String,
    pub user: String,
}

impl AccessRecord {
    pub fn at(when: DateTime<Local>, user: impl Into<String>) -> Self {
        Self {
            date: when.format("%Y-%m-%d").to_string(),
            time: when.format("%H:%M:%S").to_string(),
            user: user.into(),
        }
    }

    pub fn now(user: impl Into<String>) -> Self {
        Self::at(Local::now(), user)
    }

    fn fields(&self) -> [&str; 3] {
        [self.date.as_str(), self.time.as_str(), self.user.as_str()]
    }
}

pub trait LogSink: fmt::Debug {
    fn append(&self, record: &AccessRecord) -> Result<(), SinkError>;
}

/// Appends rows to a local CSV file, writing the header on first use.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(",");
    row.push_str("\r\n");
    row
}

impl LogSink for CsvFileSink {
    fn append(&self, record: &AccessRecord) -> Result<(), SinkError> {
        let io_err = |source| SinkError::Io { path: self.path.clone(), source };

        let is_new = !self.path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).map_err(io_err)?;

        let mut text = String::new();
        if is_new {
            text.push_str(&csv_row(&LOG_HEADER));
        }
        text.push_str(&csv_row(&record.fields()));
        file.write_all(text.as_bytes()).map_err(io_err)?;
        Ok(())
    }
}

/// Appends rows to a Google Sheets range through the `values:append` API.
///
/// An explicit `api_base` is contacted directly, bypassing any system proxy.
#[derive(Clone)]
pub struct SheetSink {
    api_base: String,
    direct: bool,
    spreadsheet_id: String,
    range: String,
    token: Option<String>,
    token_env: String,
}

impl fmt::Debug for SheetSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetSink")
            .field("api_base", &self.api_base)
            .field("direct", &self.direct)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_env", &self.token_env)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SheetSink {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>, token: Option<String>) -> Self {
        Self {
            api_base: "https://sheets.googleapis.com".to_string(),
            direct: false,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
            token,
            token_env: SHEET_TOKEN_ENV.to_string(),
        }
    }

    /// Reads the bearer token from the named environment variable.
    pub fn from_env(spreadsheet_id: impl Into<String>, range: impl Into<String>, token_env: &str) -> Self {
        let token = non_blank(std::env::var(token_env).ok());
        let mut sink = Self::new(spreadsheet_id, range, token);
        sink.token_env = token_env.to_string();
        sink
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self.direct = true;
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.api_base, self.spreadsheet_id, self.range
        )
    }
}

impl LogSink for SheetSink {
    fn append(&self, record: &AccessRecord) -> Result<(), SinkError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| SinkError::MissingCredentials(self.token_env.clone()))?;

        let mut builder = reqwest::blocking::Client::builder().timeout(Duration::from_secs(SHEET_TIMEOUT_SECS));
        if self.direct {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        client
            .post(self.url())
            .bearer_auth(token)
            .json(&json!({ "values": [record.fields()] }))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

/// Sink that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn append(&self, _record: &AccessRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes one access record and never fails.
///
/// Returns a message for the operator when the sink rejected the record.
pub fn record_access(sink: &dyn LogSink, record: &AccessRecord) -> Option<String> {
    match sink.append(record) {
        Ok(()) => {
            info!(user = %record.user, date = %record.date, time = %record.time, "access recorded");
            None
        }
        Err(e) => {
            warn!(error = %e, "access log unavailable");
            Some(format!("Access log unavailable: {e}"))
        }
    }
}

/// User identifier from the command line, the environment, or a default.
pub fn resolve_user(explicit: Option<&str>) -> String {
    pick_user(explicit, std::env::var(USER_ENV).ok())
}

// Blank values at either level fall through to the next one.
fn pick_user(explicit: Option<&str>, from_env: Option<String>) -> String {
    non_blank(explicit.map(str::to_string))
        .or_else(|| non_blank(from_env))
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::{BufRead, BufReader, Read};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn record(user: &str) -> AccessRecord {
        let when = Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap();
        AccessRecord::at(when, user)
    }

    #[test]
    fn formats_date_and_time() {
        let r = record("a@finbox.in");
        assert_eq!(r.date, "2024-03-05");
        assert_eq!(r.time, "09:07:02");
    }

    #[test]
    fn csv_header_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let sink = CsvFileSink::new(&path);

        sink.append(&record("a@finbox.in")).unwrap();
        sink.append(&record("Doe, Jane")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Date,Time,User Email",
                "2024-03-05,09:07:02,a@finbox.in",
                "2024-03-05,09:07:02,\"Doe, Jane\"",
            ]
        );
    }

    #[test]
    fn csv_quotes_embedded_quotes() {
        assert_eq!(csv_field(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn failing_sink_yields_message() {
        let dir = TempDir::new().unwrap();
        let sink = CsvFileSink::new(dir.path().join("missing").join("log.csv"));
        let message = record_access(&sink, &record("x")).unwrap();
        assert!(message.starts_with("Access log unavailable"));

        assert_eq!(record_access(&NullSink, &record("x")), None);
    }

    #[test]
    fn sheet_sink_requires_token() {
        let sink = SheetSink::new("sheet-id", "Sheet1!A:C", None);
        let err = sink.append(&record("x")).unwrap_err();
        assert!(matches!(err, SinkError::MissingCredentials(ref var) if var == SHEET_TOKEN_ENV));
    }

    #[test]
    fn user_falls_back_through_flag_env_default() {
        assert_eq!(pick_user(Some("cli@finbox.in"), Some("env@finbox.in".to_string())), "cli@finbox.in");
        assert_eq!(pick_user(Some("  "), Some("env@finbox.in".to_string())), "env@finbox.in");
        assert_eq!(pick_user(None, Some("env@finbox.in".to_string())), "env@finbox.in");
        assert_eq!(pick_user(Some(""), Some(" ".to_string())), UNKNOWN_USER);
        assert_eq!(pick_user(None, None), UNKNOWN_USER);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        assert_eq!(non_blank(Some(" \t".to_string())), None);
        assert_eq!(non_blank(Some("ya29.token".to_string())), Some("ya29.token".to_string()));

        let sink = SheetSink::from_env("abc", "Log!A:C", "AGENDA_DECK_TEST_UNSET_TOKEN");
        let err = sink.append(&record("x")).unwrap_err();
        assert!(matches!(err, SinkError::MissingCredentials(ref var) if var == "AGENDA_DECK_TEST_UNSET_TOKEN"));
    }

    #[test]
    fn sheet_sink_debug_hides_token() {
        let sink = SheetSink::new("abc", "Log!A:C", Some("secret".to_string()));
        let described = format!("{sink:?}");
        assert!(!described.contains("secret"));
        assert!(described.contains("<redacted>"));
        assert!(described.contains("direct: false"));
    }

    #[test]
    fn sheet_sink_posts_row() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push(line);
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}")
                .unwrap();
            (head, String::from_utf8(body).unwrap())
        });

        let sink = SheetSink::new("abc", "Log!A:C", Some("secret".to_string())).with_api_base(format!("http://{addr}/"));
        sink.append(&record("a@finbox.in")).unwrap();

        let (head, body) = server.join().unwrap();
        assert!(head[0].starts_with("POST /v4/spreadsheets/abc/values/Log!A:C:append?valueInputOption=USER_ENTERED"));
        assert!(head.iter().any(|h| h.to_ascii_lowercase().starts_with("authorization: bearer secret")));
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, json!({ "values": [["2024-03-05", "09:07:02", "a@finbox.in"]] }));
    }
}
