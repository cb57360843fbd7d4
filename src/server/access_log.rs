//! Access log shared by every connection.
//!
//! One line per handled request:
//!
//! ```text
//! 2024-05-01 12:00:00 - 127.0.0.1:51234 - "GET /index.html HTTP/1.1" - 200 OK
//! ```
//!
//! Writers from concurrent connections are serialized by a mutex held for
//! the whole format-write-flush of a line, so lines never interleave.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Local};

use crate::http::response::StatusCode;

/// Logged in place of a request line that could not be read.
pub const INVALID_REQUEST_LINE: &str = "<invalid request>";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub remote: SocketAddr,
    pub request_line: String,
    pub status: StatusCode,
}

impl LogRecord {
    /// Creates a record stamped with the current local time.
    ///
    /// Control characters in the request line are escaped so a client cannot
    /// forge extra log lines.
    pub fn new(remote: SocketAddr, request_line: &str, status: StatusCode) -> Self {
        let request_line = if request_line.is_empty() {
            INVALID_REQUEST_LINE.to_string()
        } else {
            let mut escaped = String::with_capacity(request_line.len());
            for c in request_line.chars() {
                if c.is_control() {
                    escaped.extend(c.escape_default());
                } else {
                    escaped.push(c);
                }
            }
            escaped
        };

        Self {
            timestamp: Local::now(),
            remote,
            request_line,
            status,
        }
    }
}

impl std::fmt::Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - \"{}\" - {} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.remote,
            self.request_line,
            self.status.as_u16(),
            self.status.reason_phrase()
        )
    }
}

pub struct AccessLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl AccessLog {
    /// Opens `path` for appending, creating it and its parent directory if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        // Unbuffered: each record is one append write of a whole line.
        Ok(Self::from_writer(file))
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// Appends one record as a complete, flushed line.
    ///
    /// Safe to call from any number of connections at once.
    pub fn record(&self, entry: &LogRecord) -> io::Result<()> {
        tracing::info!(
            peer = %entry.remote,
            request = %entry.request_line,
            status = entry.status.as_u16(),
            "access"
        );

        let line = format!("{entry}\n");

        // The sink stays usable after a panic elsewhere; keep logging.
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.write_all(line.as_bytes())?;
        sink.flush()
    }
}
