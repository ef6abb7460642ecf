// error.rs - Error types for the grading subsystem.

use thiserror::Error;

/// Errors that can occur while grading or aggregating.
#[derive(Debug, Error, PartialEq)]
pub enum GradeError {
    /// `aggregate` was called without a single present component.
    /// The caller must supply at least one grade to average.
    #[error("no present component grades to aggregate ({supplied} supplied, all absent)")]
    NoComponents { supplied: usize },

    /// A custom threshold table breaks ordering or the letter round trip.
    #[error("invalid grade bands: {reason}")]
    InvalidBands { reason: String },

    /// A letter grade string could not be parsed.
    #[error("unknown grade '{input}': expected one of A, B, C, D, F")]
    UnknownGrade { input: String },
}
