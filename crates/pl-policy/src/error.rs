// error.rs - Error types for policy scoring.
//
// Classification itself never fails: unreadable or empty text degrades to
// zero matches. Only configuration can be rejected.

use thiserror::Error;

/// Errors that can occur while configuring the policy scorer.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// A weight or cap in the `[scoring]` config is unusable.
    #[error("invalid scoring config: {reason}")]
    InvalidScoring { reason: String },
}
