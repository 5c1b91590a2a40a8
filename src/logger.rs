//! Optional structured logging of a backup run

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub trait Logger: Send + Sync {
    fn start(&self, _world: &str, _dest: &Path) {}
    fn file_done(&self, _remote: &str, _bytes: u64) {}
    fn error(&self, _context: &str, _msg: &str) {}
    fn done(&self, _files: u64, _bytes: u64, _seconds: f64) {}
}

pub struct NoopLogger;
impl Logger for NoopLogger {}

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seconds: Option<f64>,
}

/// Appends one JSON object per event to a log file.
pub struct JsonlLogger {
    file: Mutex<File>,
}

impl JsonlLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(f),
        })
    }

    fn write(&self, line: &LogLine) {
        if let Ok(mut f) = self.file.lock() {
            if serde_json::to_writer(&mut *f, line).is_ok() {
                let _ = writeln!(f);
            }
        }
    }

    fn line(&self, event: &str, path: Option<&str>, bytes: Option<u64>, message: Option<&str>) {
        self.write(&LogLine {
            timestamp: Utc::now().to_rfc3339(),
            event,
            path,
            bytes,
            message,
            seconds: None,
        });
    }
}

impl Logger for JsonlLogger {
    fn start(&self, world: &str, dest: &Path) {
        self.line(
            "start",
            Some(world),
            None,
            Some(&dest.display().to_string()),
        );
    }

    fn file_done(&self, remote: &str, bytes: u64) {
        self.line("file", Some(remote), Some(bytes), None);
    }

    fn error(&self, context: &str, msg: &str) {
        self.line("error", None, None, Some(&format!("{context}: {msg}")));
    }

    fn done(&self, files: u64, bytes: u64, seconds: f64) {
        self.write(&LogLine {
            timestamp: Utc::now().to_rfc3339(),
            event: "done",
            path: None,
            bytes: Some(bytes),
            message: Some(&format!("{files} files")),
            seconds: Some(seconds),
        });
    }
}
