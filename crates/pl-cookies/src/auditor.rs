// auditor.rs - Cookie compliance auditing.
//
// Compares the cookies a site actually sets with what its policy admits to.
// The score starts at 100 and each rule subtracts a bounded penalty:
//
//   undisclosed category        analytics 20, advertising 25, functional 10
//   set before consent/reject   12 per tracking cookie, max 45
//   insecure attributes         3 per cookie, max 15
//   third parties beyond 5      2 per cookie, max 20
//   more than 3 unknown         10
//   no opt-out language         8
//   tracking lifetime > 395d    2 per cookie, max 10 (needs observed_at)
//
// The result is clamped to 0..=100 and graded with the shared bands.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pl_grade::{Grade, GradeBands, RiskLevel};
use pl_policy::{discloses, offers_opt_out, CookieCategory, Severity};
use serde::{Deserialize, Serialize};

use crate::classify::{classify_cookie, is_third_party, normalize_host};
use crate::collector::CookieCollection;
use crate::cookie::{ConsentState, ObservedCookie, SameSite};
use crate::error::AuditConfigError;

/// Penalty table for the cookie audit, the `[cookies]` table of the config
/// file. Every field is optional there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CookieAuditConfig {
    pub undisclosed_analytics_penalty: f64,
    pub undisclosed_advertising_penalty: f64,
    pub undisclosed_functional_penalty: f64,
    pub consent_penalty_per_cookie: f64,
    pub consent_penalty_cap: f64,
    /// Shared by insecure non-essential cookies and essential cookies
    /// readable from script.
    pub insecure_penalty_per_cookie: f64,
    pub insecure_penalty_cap: f64,
    /// Third-party cookies tolerated before any penalty applies.
    pub third_party_allowance: usize,
    pub third_party_penalty_per_cookie: f64,
    pub third_party_penalty_cap: f64,
    /// Unknown cookies tolerated before the flat penalty applies.
    pub unknown_cookie_threshold: usize,
    pub unknown_cookie_penalty: f64,
    pub missing_opt_out_penalty: f64,
    pub max_tracking_lifetime_days: i64,
    pub long_lived_penalty_per_cookie: f64,
    pub long_lived_penalty_cap: f64,
}

impl Default for CookieAuditConfig {
    fn default() -> Self {
        Self {
            undisclosed_analytics_penalty: 20.0,
            undisclosed_advertising_penalty: 25.0,
            undisclosed_functional_penalty: 10.0,
            consent_penalty_per_cookie: 12.0,
            consent_penalty_cap: 45.0,
            insecure_penalty_per_cookie: 3.0,
            insecure_penalty_cap: 15.0,
            third_party_allowance: 5,
            third_party_penalty_per_cookie: 2.0,
            third_party_penalty_cap: 20.0,
            unknown_cookie_threshold: 3,
            unknown_cookie_penalty: 10.0,
            missing_opt_out_penalty: 8.0,
            max_tracking_lifetime_days: 395,
            long_lived_penalty_per_cookie: 2.0,
            long_lived_penalty_cap: 10.0,
        }
    }
}

impl CookieAuditConfig {
    pub fn validate(&self) -> Result<(), AuditConfigError> {
        let penalties = [
            ("undisclosed_analytics_penalty", self.undisclosed_analytics_penalty),
            ("undisclosed_advertising_penalty", self.undisclosed_advertising_penalty),
            ("undisclosed_functional_penalty", self.undisclosed_functional_penalty),
            ("consent_penalty_per_cookie", self.consent_penalty_per_cookie),
            ("consent_penalty_cap", self.consent_penalty_cap),
            ("insecure_penalty_per_cookie", self.insecure_penalty_per_cookie),
            ("insecure_penalty_cap", self.insecure_penalty_cap),
            ("third_party_penalty_per_cookie", self.third_party_penalty_per_cookie),
            ("third_party_penalty_cap", self.third_party_penalty_cap),
            ("unknown_cookie_penalty", self.unknown_cookie_penalty),
            ("missing_opt_out_penalty", self.missing_opt_out_penalty),
            ("long_lived_penalty_per_cookie", self.long_lived_penalty_per_cookie),
            ("long_lived_penalty_cap", self.long_lived_penalty_cap),
        ];
        for (field, value) in penalties {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AuditConfigError::InvalidPenalty {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }
        if self.max_tracking_lifetime_days <= 0 {
            return Err(AuditConfigError::InvalidPenalty {
                field: "max_tracking_lifetime_days",
                reason: format!("must be positive, got {}", self.max_tracking_lifetime_days),
            });
        }
        Ok(())
    }

    /// Penalty and severity for an undisclosed category. `None` for
    /// categories that need no disclosure.
    fn undisclosed(&self, category: CookieCategory) -> Option<(f64, Severity)> {
        match category {
            CookieCategory::Analytics => Some((self.undisclosed_analytics_penalty, Severity::High)),
            CookieCategory::Advertising => {
                Some((self.undisclosed_advertising_penalty, Severity::High))
            }
            CookieCategory::Functional => {
                Some((self.undisclosed_functional_penalty, Severity::Medium))
            }
            CookieCategory::Essential | CookieCategory::Unknown => None,
        }
    }
}

fn capped(count: usize, per_cookie: f64, cap: f64) -> f64 {
    (count as f64 * per_cookie).min(cap)
}

/// Per-cookie observation attached to a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CookieFlag {
    MissingSecure,
    SameSiteNoneWithoutSecure,
    MissingHttpOnly,
    SetWithoutConsent,
    LongLived,
}

/// What the audit concluded about one cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieFinding {
    pub name: String,
    pub domain: String,
    pub category: CookieCategory,
    pub third_party: bool,
    pub session: bool,
    /// Whether the policy discloses this cookie's category. Absent for
    /// categories that need no disclosure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosed: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<CookieFlag>,
}

/// A cookie category the site sets but the policy never mentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discrepancy {
    pub category: CookieCategory,
    pub cookies: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    UndisclosedCategory,
    TrackingWithoutConsent,
    InsecureCookie,
    MissingHttpOnly,
    ExcessiveThirdParty,
    UnknownCookies,
    MissingOptOut,
    LongLivedTracking,
}

/// One scored problem found by the audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CookieCategory>,
    pub title: String,
    pub detail: String,
    /// Names of the cookies involved (may be empty for policy-level issues).
    pub cookies: Vec<String>,
    /// Points subtracted from the score for this issue.
    pub penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub consent_state: ConsentState,
    pub cookie_count: usize,
    pub third_party_count: usize,
    pub unknown_count: usize,
    /// The collector succeeded and observed no cookies at all.
    pub empty_collection: bool,
    /// Secure/HttpOnly/SameSite checks ran.
    pub attributes_checked: bool,
    /// Reference time for cookie lifetimes, when one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

/// Outcome of one cookie audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookieAuditResult {
    /// 0..=100, higher is more compliant.
    pub score: u32,
    pub grade: Grade,
    pub risk_level: RiskLevel,
    pub discrepancies: Vec<Discrepancy>,
    /// One entry per cookie, in input order.
    pub findings: Vec<CookieFinding>,
    /// Most severe first; equal severities keep rule order.
    pub issues: Vec<AuditIssue>,
    pub category_counts: BTreeMap<CookieCategory, usize>,
    pub metadata: AuditMetadata,
}

impl CookieAuditResult {
    pub fn total_penalty(&self) -> f64 {
        self.issues.iter().map(|i| i.penalty).sum()
    }
}

/// Audits observed cookies against a policy with an immutable configuration.
#[derive(Debug, Clone)]
pub struct CookieAuditor {
    config: CookieAuditConfig,
    bands: GradeBands,
    site: Option<String>,
    consent_state: ConsentState,
    observed_at: Option<DateTime<Utc>>,
    check_attributes: bool,
}

impl Default for CookieAuditor {
    fn default() -> Self {
        Self::new(CookieAuditConfig::default(), GradeBands::default())
    }
}

impl CookieAuditor {
    pub fn new(config: CookieAuditConfig, bands: GradeBands) -> Self {
        Self {
            config,
            bands,
            site: None,
            consent_state: ConsentState::Unknown,
            observed_at: None,
            check_attributes: true,
        }
    }

    /// The audited site. Without one, no cookie counts as third-party.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_consent_state(mut self, consent_state: ConsentState) -> Self {
        self.consent_state = consent_state;
        self
    }

    /// Reference time for the cookie lifetime check.
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    /// Disable the Secure/HttpOnly/SameSite checks for name-only input.
    pub fn with_attribute_checks(mut self, enabled: bool) -> Self {
        self.check_attributes = enabled;
        self
    }

    pub fn config(&self) -> &CookieAuditConfig {
        &self.config
    }

    pub fn audit(&self, cookies: &[ObservedCookie], policy_text: &str) -> CookieAuditResult {
        self.run(
            cookies,
            policy_text,
            self.site.as_deref(),
            self.consent_state,
            self.check_attributes,
        )
    }

    /// Audit a collector result. The collection's site and consent state
    /// take precedence over the auditor's own.
    pub fn audit_collection(
        &self,
        collection: &CookieCollection,
        policy_text: &str,
    ) -> CookieAuditResult {
        let site = if collection.site.trim().is_empty() {
            self.site.as_deref()
        } else {
            Some(collection.site.as_str())
        };
        self.run(
            &collection.cookies,
            policy_text,
            site,
            collection.consent_state,
            self.check_attributes && collection.attributes_known,
        )
    }

    fn run(
        &self,
        cookies: &[ObservedCookie],
        policy_text: &str,
        site: Option<&str>,
        consent_state: ConsentState,
        check_attributes: bool,
    ) -> CookieAuditResult {
        let cfg = &self.config;
        let site = site.map(normalize_host).filter(|s| !s.is_empty());

        let mut findings: Vec<CookieFinding> = cookies
            .iter()
            .map(|c| CookieFinding {
                name: c.name.clone(),
                domain: c.domain.clone(),
                category: c
                    .category
                    .unwrap_or_else(|| classify_cookie(&c.name, &c.domain)),
                third_party: site
                    .as_deref()
                    .is_some_and(|s| is_third_party(&c.domain, s)),
                session: c.is_session(),
                disclosed: None,
                flags: Vec::new(),
            })
            .collect();

        let mut category_counts: BTreeMap<CookieCategory, usize> = BTreeMap::new();
        for f in &findings {
            *category_counts.entry(f.category).or_insert(0) += 1;
        }

        let mut issues: Vec<AuditIssue> = Vec::new();
        let mut discrepancies: Vec<Discrepancy> = Vec::new();

        // Disclosure.
        for category in CookieCategory::ALL {
            let Some((penalty, severity)) = cfg.undisclosed(category) else {
                continue;
            };
            if !category_counts.contains_key(&category) {
                continue;
            }
            let disclosed = discloses(policy_text, category);
            let mut names = Vec::new();
            for f in findings.iter_mut().filter(|f| f.category == category) {
                f.disclosed = Some(disclosed);
                names.push(f.name.clone());
            }
            if disclosed {
                continue;
            }
            issues.push(AuditIssue {
                severity,
                kind: IssueKind::UndisclosedCategory,
                category: Some(category),
                title: format!("Undisclosed {} cookies", category),
                detail: format!(
                    "The site sets {} {} cookie(s) but the policy never mentions {} cookies.",
                    names.len(),
                    category,
                    category
                ),
                cookies: names.clone(),
                penalty,
            });
            discrepancies.push(Discrepancy {
                category,
                cookies: names,
            });
        }

        // Consent.
        if consent_state.forbids_tracking() {
            let names = flag_where(&mut findings, cookies, CookieFlag::SetWithoutConsent, |f, _| {
                f.category.is_tracking()
            });
            if !names.is_empty() {
                issues.push(AuditIssue {
                    severity: Severity::High,
                    kind: IssueKind::TrackingWithoutConsent,
                    category: None,
                    title: "Tracking cookies set without consent".to_string(),
                    detail: format!(
                        "{} analytics or advertising cookie(s) were present {}.",
                        names.len(),
                        match consent_state {
                            ConsentState::AfterReject => "after the visitor rejected cookies",
                            _ => "before the visitor answered the consent banner",
                        }
                    ),
                    penalty: capped(
                        names.len(),
                        cfg.consent_penalty_per_cookie,
                        cfg.consent_penalty_cap,
                    ),
                    cookies: names,
                });
            }
        }

        // Attributes.
        if check_attributes {
            let mut insecure = Vec::new();
            let mut readable = Vec::new();
            for (f, c) in findings.iter_mut().zip(cookies) {
                if f.category.is_non_essential() {
                    let mut hit = false;
                    if !c.secure {
                        f.flags.push(CookieFlag::MissingSecure);
                        hit = true;
                    }
                    if c.same_site == SameSite::None && !c.secure {
                        f.flags.push(CookieFlag::SameSiteNoneWithoutSecure);
                        hit = true;
                    }
                    if hit {
                        insecure.push(f.name.clone());
                    }
                } else if f.category == CookieCategory::Essential
                    && holds_credentials(&f.name)
                    && !c.http_only
                {
                    f.flags.push(CookieFlag::MissingHttpOnly);
                    readable.push(f.name.clone());
                }
            }

            let mut budget = cfg.insecure_penalty_cap;
            if !insecure.is_empty() {
                let penalty = capped(insecure.len(), cfg.insecure_penalty_per_cookie, budget);
                budget -= penalty;
                issues.push(AuditIssue {
                    severity: Severity::Medium,
                    kind: IssueKind::InsecureCookie,
                    category: None,
                    title: "Non-essential cookies without Secure".to_string(),
                    detail: format!(
                        "{} non-essential cookie(s) can travel over plain HTTP or are sent cross-site without Secure.",
                        insecure.len()
                    ),
                    cookies: insecure,
                    penalty,
                });
            }
            if !readable.is_empty() {
                let penalty = capped(
                    readable.len(),
                    cfg.insecure_penalty_per_cookie,
                    budget.max(0.0),
                );
                issues.push(AuditIssue {
                    severity: Severity::Medium,
                    kind: IssueKind::MissingHttpOnly,
                    category: Some(CookieCategory::Essential),
                    title: "Session cookies readable from script".to_string(),
                    detail: format!(
                        "{} session or authentication cookie(s) lack HttpOnly.",
                        readable.len()
                    ),
                    cookies: readable,
                    penalty,
                });
            }
        }

        // Third parties.
        let third_party: Vec<String> = findings
            .iter()
            .filter(|f| f.third_party)
            .map(|f| f.name.clone())
            .collect();
        let third_party_count = third_party.len();
        if third_party_count > cfg.third_party_allowance {
            let excess = third_party_count - cfg.third_party_allowance;
            issues.push(AuditIssue {
                severity: Severity::Medium,
                kind: IssueKind::ExcessiveThirdParty,
                category: None,
                title: "Many third-party cookies".to_string(),
                detail: format!(
                    "{} third-party cookies observed, {} over the allowance of {}.",
                    third_party_count, excess, cfg.third_party_allowance
                ),
                cookies: third_party,
                penalty: capped(
                    excess,
                    cfg.third_party_penalty_per_cookie,
                    cfg.third_party_penalty_cap,
                ),
            });
        }

        // Unknown cookies.
        let unknown: Vec<String> = findings
            .iter()
            .filter(|f| f.category == CookieCategory::Unknown)
            .map(|f| f.name.clone())
            .collect();
        let unknown_count = unknown.len();
        if unknown_count > cfg.unknown_cookie_threshold {
            issues.push(AuditIssue {
                severity: Severity::Medium,
                kind: IssueKind::UnknownCookies,
                category: Some(CookieCategory::Unknown),
                title: "Unrecognized cookies".to_string(),
                detail: format!(
                    "{} cookies could not be categorized; their purpose is unclear.",
                    unknown_count
                ),
                cookies: unknown,
                penalty: cfg.unknown_cookie_penalty,
            });
        }

        // Opt-out language.
        let any_non_essential = findings.iter().any(|f| f.category.is_non_essential());
        if any_non_essential && !offers_opt_out(policy_text) {
            issues.push(AuditIssue {
                severity: Severity::Medium,
                kind: IssueKind::MissingOptOut,
                category: None,
                title: "No opt-out language".to_string(),
                detail: "The site sets non-essential cookies but the policy offers no opt-out or \"do not sell\" choice.".to_string(),
                cookies: Vec::new(),
                penalty: cfg.missing_opt_out_penalty,
            });
        }

        // Lifetimes.
        if let Some(observed_at) = self.observed_at {
            let limit_secs = cfg.max_tracking_lifetime_days.saturating_mul(86_400);
            let names = flag_where(&mut findings, cookies, CookieFlag::LongLived, |f, c| {
                f.category.is_tracking()
                    && c.expires
                        .is_some_and(|exp| (exp - observed_at).num_seconds() > limit_secs)
            });
            if !names.is_empty() {
                issues.push(AuditIssue {
                    severity: Severity::Low,
                    kind: IssueKind::LongLivedTracking,
                    category: None,
                    title: "Long-lived tracking cookies".to_string(),
                    detail: format!(
                        "{} tracking cookie(s) persist longer than {} days.",
                        names.len(),
                        cfg.max_tracking_lifetime_days
                    ),
                    penalty: capped(
                        names.len(),
                        cfg.long_lived_penalty_per_cookie,
                        cfg.long_lived_penalty_cap,
                    ),
                    cookies: names,
                });
            }
        }

        issues.sort_by_key(|i| Reverse(i.severity));

        let total_penalty: f64 = issues.iter().map(|i| i.penalty).sum();
        let score = (100.0 - total_penalty).clamp(0.0, 100.0).round() as u32;
        let (grade, risk_level) = self.bands.classify(score as f64);

        tracing::debug!(
            cookies = cookies.len(),
            issues = issues.len(),
            score,
            grade = %grade,
            "audited cookies"
        );

        CookieAuditResult {
            score,
            grade,
            risk_level,
            discrepancies,
            findings,
            issues,
            category_counts,
            metadata: AuditMetadata {
                site,
                consent_state,
                cookie_count: cookies.len(),
                third_party_count,
                unknown_count,
                empty_collection: cookies.is_empty(),
                attributes_checked: check_attributes,
                observed_at: self.observed_at,
            },
        }
    }
}

/// Add `flag` to every finding matching `pred`; return their names.
fn flag_where(
    findings: &mut [CookieFinding],
    cookies: &[ObservedCookie],
    flag: CookieFlag,
    pred: impl Fn(&CookieFinding, &ObservedCookie) -> bool,
) -> Vec<String> {
    let mut names = Vec::new();
    for (f, c) in findings.iter_mut().zip(cookies) {
        if pred(f, c) {
            f.flags.push(flag);
            names.push(f.name.clone());
        }
    }
    names
}

/// Essential cookies that carry a session or credential.
fn holds_credentials(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["sess", "auth", "token", "sid"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Audit with the default configuration and bands, no site, unknown consent.
pub fn audit(cookies: &[ObservedCookie], policy_text: &str) -> CookieAuditResult {
    CookieAuditor::default().audit(cookies, policy_text)
}
