//! Listener and the state shared by every connection.

pub mod access_log;
pub mod listener;

use std::sync::Arc;
use std::time::Duration;

use crate::files::DocumentRoot;
use access_log::AccessLog;

pub use listener::Server;

/// Read-only per-server state handed to each connection task.
///
/// The access log is the only mutable part and serializes its own writes.
pub struct ServerContext {
    pub root: DocumentRoot,
    pub access_log: Arc<AccessLog>,
    /// `None` waits for requests indefinitely
    pub idle_timeout: Option<Duration>,
    pub max_header_bytes: usize,
}
