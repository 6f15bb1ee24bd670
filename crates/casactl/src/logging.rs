//! Logging for casactl invocations.
//!
//! One JSONL line per command under the XDG state directory.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

/// Log entry for each casactl invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Command name
    pub command: String,

    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Exit code
    pub exit_code: i32,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Success flag
    pub ok: bool,

    /// Error details if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    /// Build an entry for the invocation that just finished.
    pub fn finish(started: Instant, exit_code: i32, error: Option<&anyhow::Error>) -> Self {
        let mut argv = std::env::args().skip(1);
        let command = argv.next().unwrap_or_default();
        Self {
            ts: chrono::Utc::now().to_rfc3339(),
            req_id: uuid::Uuid::new_v4().to_string(),
            command,
            args: argv.collect(),
            exit_code,
            duration_ms: started.elapsed().as_millis() as u64,
            ok: exit_code == 0,
            error: error.map(|e| format!("{e:#}")),
        }
    }

    /// Discover the log file path.
    ///
    /// Priority:
    /// 1. $CASACTL_LOG_FILE environment variable (explicit override)
    /// 2. $XDG_STATE_HOME/casa/ctl.jsonl
    /// 3. ~/.local/state/casa/ctl.jsonl
    fn discover_log_path() -> Option<String> {
        if let Ok(path) = std::env::var("CASACTL_LOG_FILE") {
            return Some(path);
        }

        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            return Some(format!("{}/casa/ctl.jsonl", xdg_state));
        }

        if let Ok(home) = std::env::var("HOME") {
            return Some(format!("{}/.local/state/casa/ctl.jsonl", home));
        }

        None
    }

    /// Write the entry, dropping it silently when no state dir exists.
    pub fn write(&self) -> Result<(), std::io::Error> {
        let json = serde_json::to_string(self)?;

        if let Some(path) = Self::discover_log_path() {
            return Self::write_to_file(&json, &path);
        }

        Ok(())
    }

    fn write_to_file(json: &str, path: &str) -> Result<(), std::io::Error> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", json)?;
        Ok(())
    }
}
