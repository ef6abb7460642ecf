// error.rs - Error types for cookie collection.
//
// A failed collection must surface as one of these, never as an empty
// cookie list: zero cookies is a valid (and very good) audit outcome, while
// a blocked browser says nothing about the site.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the cookie collector boundary.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The cookie export file could not be read.
    #[error("failed to read cookie export at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The export was read but is not a recognizable cookie list.
    #[error("malformed cookie export at {path}: {source}")]
    MalformedExport {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The collector could not observe the site at all (navigation failed,
    /// automation was blocked, and so on).
    #[error("cookie collection for '{site}' unavailable: {reason}")]
    Unavailable { site: String, reason: String },
}

/// Rejected cookie audit configuration.
#[derive(Debug, Error, PartialEq)]
pub enum AuditConfigError {
    #[error("invalid cookie audit setting '{field}': {reason}")]
    InvalidPenalty { field: &'static str, reason: String },
}
