//! # pl-report
//!
//! The full PolicyLens audit pipeline and its renderers.
//!
//! [`run_audit`] scores the policy text, audits cookies when a source is
//! given, and folds the policy, cookie, and (externally supplied) breach
//! grades into one [`FinalAuditResult`](pl_grade::FinalAuditResult). The
//! [`output_adapters`] render the resulting [`AuditReport`] for a terminal
//! or as JSON.
//!
//! ## Quick Example
//!
//! ```rust
//! use pl_report::{run_audit, AuditRequest, CookieSource};
//! use pl_grade::Grade;
//!
//! let request = AuditRequest::new("")
//!     .with_cookies(CookieSource::RawList(String::new()));
//! let report = run_audit(&request).unwrap();
//! assert_eq!(report.final_result.grade, Grade::A);
//! ```

pub mod error;
pub mod output_adapters;
pub mod pipeline;

pub use error::ReportError;
pub use output_adapters::{get_adapter, OutputAdapter, OutputFormat, RenderContext};
pub use pipeline::{
    run_audit, run_audit_with, AuditReport, AuditRequest, AuditSettings, CookieSource,
    PolicyReport,
};
