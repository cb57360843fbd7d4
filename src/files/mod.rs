//! Static file lookup.
//!
//! Resolves request targets against the document root and decides whether
//! a conditional request can be answered with 304.

pub mod conditional;
pub mod resolver;

pub use conditional::is_modified_since;
pub use resolver::{DocumentRoot, ResolveError, ResolvedFile};
