//! # pl-policy
//!
//! Privacy-policy risk term classification and scoring for PolicyLens.
//!
//! The [`classify`] function scans policy text for the static risk term
//! table (collection, sharing, rights, retention, vague language) and
//! returns every occurrence in document order. The [`PolicyScorer`] turns
//! those matches into a 0..=100 score, a letter grade, and a risk level
//! using the shared bands from `pl-grade`.
//!
//! The [`vocabulary`] module is also the home of [`CookieCategory`] and its
//! disclosure phrases, which the cookie auditor uses to decide whether a
//! policy admits to the cookies a site actually sets.
//!
//! ## Quick Example
//!
//! ```rust
//! use pl_policy::{analyze, RiskCategory};
//!
//! let result = analyze("We may share your data with third parties for advertising.");
//! assert!(result.matches.iter().any(|m| m.category == RiskCategory::Sharing));
//! ```

pub mod classifier;
pub mod error;
pub mod flaws;
pub mod pattern;
pub mod scorer;
pub mod vocabulary;

pub use classifier::{classify, term_counts, TermCount, TermMatch, CONTEXT_RADIUS};
pub use error::PolicyError;
pub use flaws::{danger_spans, extract_flaws, Flaw, HighlightSpan};
pub use pattern::{discloses, offers_opt_out};
pub use scorer::{
    analyze, score, CategoryBreakdown, CategoryWeights, PolicyScoreResult, PolicyScorer,
    PolicySummary, ScoringConfig,
};
pub use vocabulary::{
    risk_terms, CookieCategory, RiskCategory, RiskTerm, Severity, TermGroup, OPT_OUT_TERMS,
    TERM_GROUPS,
};
