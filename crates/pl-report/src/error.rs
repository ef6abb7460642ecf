// error.rs - Error types for the full-audit pipeline.

use pl_cookies::{AuditConfigError, CollectError};
use pl_grade::GradeError;
use pl_policy::PolicyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// Cookies were requested but could not be collected.
    #[error("cookie collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Grade(#[from] GradeError),

    #[error("invalid scoring settings: {0}")]
    Scoring(#[from] PolicyError),

    #[error("invalid cookie audit settings: {0}")]
    CookieConfig(#[from] AuditConfigError),

    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
