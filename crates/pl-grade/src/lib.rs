//! # pl-grade
//!
//! Letter grades, risk levels, and grade aggregation for PolicyLens.
//!
//! Every path that turns a number into a letter (policy scoring, cookie
//! auditing, final aggregation) goes through one [`GradeBands`] table and
//! one [`RiskLevel::for_grade`] mapping, so a given score can never be graded
//! differently in two places.
//!
//! ## Key invariants
//!
//! - **One threshold table**: A ≥ 85, B ≥ 70, C ≥ 50, D ≥ 25, else F.
//! - **Round trip**: a letter's own point score (`points × 25`) maps back to
//!   the same letter, so averaging a single component is the identity.
//! - **Absent components are ignored**: aggregation averages only present
//!   components, and refuses to run with none.
//!
//! ## Quick Example
//!
//! ```rust
//! use pl_grade::{aggregate, ComponentGrade, ComponentKind, Grade, RiskLevel};
//!
//! let result = aggregate(&[
//!     ComponentGrade::present(ComponentKind::Policy, Grade::A),
//!     ComponentGrade::present(ComponentKind::Cookie, Grade::B),
//!     ComponentGrade::absent(ComponentKind::Breach),
//! ])
//! .unwrap();
//! assert_eq!(result.grade, Grade::A);
//! assert_eq!(result.risk_level, RiskLevel::Low);
//! ```

pub mod aggregate;
pub mod error;
pub mod grade;

pub use aggregate::{aggregate, aggregate_with, ComponentGrade, ComponentKind, FinalAuditResult};
pub use error::GradeError;
pub use grade::{Grade, GradeBands, RiskLevel, SCORE_PER_POINT};
