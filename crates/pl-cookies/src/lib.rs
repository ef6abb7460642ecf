//! # pl-cookies
//!
//! Cookie compliance auditing for PolicyLens.
//!
//! A [`CookieCollector`] produces the cookies a site sets in a given consent
//! state. The [`CookieAuditor`] classifies each cookie (essential,
//! functional, analytics, advertising, unknown), checks that the policy
//! discloses every non-essential category it sees, and scores attribute,
//! consent, and third-party problems into a letter grade.
//!
//! Browser automation itself is out of scope: [`JsonExportCollector`] reads
//! the JSON a browser run leaves behind, and [`parse_cookie_list`] accepts a
//! pasted `name=value` list.
//!
//! ## Quick Example
//!
//! ```rust
//! use pl_cookies::{CookieAuditor, ObservedCookie};
//! use pl_policy::CookieCategory;
//!
//! let cookies = vec![ObservedCookie::new("_ga", "example.com").with_secure(true)];
//! let result = CookieAuditor::default().audit(&cookies, "We value your privacy.");
//! assert_eq!(result.discrepancies[0].category, CookieCategory::Analytics);
//! ```

pub mod auditor;
pub mod classify;
pub mod collector;
pub mod cookie;
pub mod error;

pub use auditor::{
    audit, AuditIssue, AuditMetadata, CookieAuditConfig, CookieAuditResult, CookieAuditor,
    CookieFinding, CookieFlag, Discrepancy, IssueKind,
};
pub use classify::{classify_cookie, is_third_party, normalize_host};
pub use collector::{
    parse_cookie_list, parse_export, CookieCollection, CookieCollector, JsonExportCollector,
    RawListCollector,
};
pub use cookie::{normalize, ConsentState, ObservedCookie, SameSite};
pub use error::{AuditConfigError, CollectError};
