//! Lantern - Concurrent static file server
//!
//! Serves GET and HEAD requests for files under a single document root,
//! with keep-alive connections, If-Modified-Since support and an access log.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
