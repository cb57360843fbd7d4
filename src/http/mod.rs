//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset the file server speaks:
//! GET and HEAD over persistent connections.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation
//! - **`headers`**: Case-insensitive header map
//! - **`handler`**: Validates a request and builds the response for a file
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Wait for incoming request data
//!        └──────┬───────────┘
//!               │ Request parsed        (EOF / idle → Closed, nothing logged)
//!               ▼                       (parse error → Responding 400, close)
//!        ┌──────────────────┐
//!        │   Validating     │ ← method → path → media type → freshness
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Send response, write access log line
//!        └──────┬───────────┘
//!               ├─ Keep-Alive → AwaitingRequest (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod handler;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
