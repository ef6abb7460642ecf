// pipeline.rs - One full audit: policy, optional cookies, optional breach
// grade, folded into a final grade.
//
//   policy text ──► classify ──► score ──────────────┐
//   cookie source ─► collect ──► audit (optional) ───┼──► aggregate
//   breach grade (optional, supplied externally) ────┘
//
// The policy component is always present, so aggregation from here never
// sees zero components.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use pl_cookies::{
    ConsentState, CookieAuditConfig, CookieAuditResult, CookieAuditor, CookieCollection,
    CookieCollector, JsonExportCollector, RawListCollector,
};
use pl_grade::{aggregate_with, ComponentGrade, ComponentKind, FinalAuditResult, Grade, GradeBands};
use pl_policy::{
    danger_spans, extract_flaws, Flaw, HighlightSpan, PolicyScoreResult, PolicyScorer,
    ScoringConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Where the cookies for an audit come from.
#[derive(Debug, Clone, Default)]
pub enum CookieSource {
    /// Policy-only audit; the cookie component is absent.
    #[default]
    None,
    /// A browser automation JSON export on disk.
    ExportFile(PathBuf),
    /// A pasted `name=value` list.
    RawList(String),
    /// Cookies already collected by the caller.
    Collected(CookieCollection),
}

/// Inputs for one audit.
#[derive(Debug, Clone, Default)]
pub struct AuditRequest {
    pub policy_text: String,
    pub site: Option<String>,
    pub consent_state: ConsentState,
    pub cookies: CookieSource,
    /// Breach-history grade from an external source.
    pub breach_grade: Option<Grade>,
    /// Reference time for cookie lifetime checks.
    pub observed_at: Option<DateTime<Utc>>,
}

impl AuditRequest {
    pub fn new(policy_text: impl Into<String>) -> Self {
        Self {
            policy_text: policy_text.into(),
            ..Default::default()
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_cookies(mut self, cookies: CookieSource) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_consent_state(mut self, consent_state: ConsentState) -> Self {
        self.consent_state = consent_state;
        self
    }

    pub fn with_breach_grade(mut self, grade: Grade) -> Self {
        self.breach_grade = Some(grade);
        self
    }

    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// Scoring knobs shared by every component of an audit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuditSettings {
    pub scoring: ScoringConfig,
    pub bands: GradeBands,
    pub cookies: CookieAuditConfig,
}

impl AuditSettings {
    pub fn validate(&self) -> Result<(), ReportError> {
        self.bands.validate()?;
        self.scoring.validate()?;
        self.cookies.validate()?;
        Ok(())
    }
}

/// Policy component of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyReport {
    #[serde(flatten)]
    pub result: PolicyScoreResult,
    pub flaws: Vec<Flaw>,
    pub highlights: Vec<HighlightSpan>,
}

/// Everything one audit produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub policy: PolicyReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<CookieAuditResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breach_grade: Option<Grade>,
    #[serde(rename = "final")]
    pub final_result: FinalAuditResult,
}

/// Run an audit with default settings.
pub fn run_audit(request: &AuditRequest) -> Result<AuditReport, ReportError> {
    run_audit_with(&AuditSettings::default(), request)
}

/// Run an audit with explicit settings. Settings are validated first.
pub fn run_audit_with(
    settings: &AuditSettings,
    request: &AuditRequest,
) -> Result<AuditReport, ReportError> {
    settings.validate()?;

    let scorer = PolicyScorer::new(settings.scoring, settings.bands);
    let result = scorer.analyze(&request.policy_text);
    let policy = PolicyReport {
        flaws: extract_flaws(&result.matches),
        highlights: danger_spans(&result.matches),
        result,
    };

    let cookies = match collect(request)? {
        Some(collection) => {
            let mut auditor = CookieAuditor::new(settings.cookies, settings.bands);
            if let Some(site) = &request.site {
                auditor = auditor.with_site(site.clone());
            }
            if let Some(at) = request.observed_at {
                auditor = auditor.with_observed_at(at);
            }
            Some(auditor.audit_collection(&collection, &request.policy_text))
        }
        None => None,
    };

    let components = [
        ComponentGrade::present(ComponentKind::Policy, policy.result.grade),
        match &cookies {
            Some(c) => ComponentGrade::present(ComponentKind::Cookie, c.grade),
            None => ComponentGrade::absent(ComponentKind::Cookie),
        },
        match request.breach_grade {
            Some(g) => ComponentGrade::present(ComponentKind::Breach, g),
            None => ComponentGrade::absent(ComponentKind::Breach),
        },
    ];
    let final_result = aggregate_with(&settings.bands, &components)?;

    tracing::info!(
        policy = %policy.result.grade,
        cookies = ?cookies.as_ref().map(|c| c.grade),
        breach = ?request.breach_grade,
        final_grade = %final_result.grade,
        "audit complete"
    );

    Ok(AuditReport {
        site: request.site.clone(),
        policy,
        cookies,
        breach_grade: request.breach_grade,
        final_result,
    })
}

fn collect(request: &AuditRequest) -> Result<Option<CookieCollection>, ReportError> {
    let site = request.site.as_deref().unwrap_or_default();
    let collection = match &request.cookies {
        CookieSource::None => return Ok(None),
        CookieSource::ExportFile(path) => {
            JsonExportCollector::new(path.clone(), request.consent_state).collect(site)?
        }
        CookieSource::RawList(raw) => {
            RawListCollector::new(raw.clone(), request.consent_state).collect(site)?
        }
        CookieSource::Collected(collection) => collection.clone(),
    };
    Ok(Some(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_grade::RiskLevel;

    #[test]
    fn policy_only_audit_uses_policy_grade() {
        let report = run_audit(&AuditRequest::new("")).unwrap();
        assert_eq!(report.policy.result.grade, Grade::A);
        assert!(report.cookies.is_none());
        assert_eq!(report.final_result.grade, Grade::A);
        let present = report
            .final_result
            .components
            .iter()
            .filter(|c| c.is_present())
            .count();
        assert_eq!(present, 1);
    }

    #[test]
    fn breach_grade_pulls_final_down() {
        let report = run_audit(&AuditRequest::new("").with_breach_grade(Grade::F)).unwrap();
        // (4 + 0) / 2 = 2 points = 50 = C
        assert_eq!(report.final_result.grade, Grade::C);
        assert_eq!(report.final_result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn raw_list_cookies_are_audited() {
        let request = AuditRequest::new("We use analytics. You may opt out.")
            .with_site("example.com")
            .with_cookies(CookieSource::RawList("_ga=1".to_string()));
        let report = run_audit(&request).unwrap();
        let cookies = report.cookies.unwrap();
        assert_eq!(cookies.metadata.cookie_count, 1);
        assert!(!cookies.metadata.attributes_checked);
        assert!(report.final_result.components[1].is_present());
        assert!(!report.final_result.components[2].is_present());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = AuditSettings {
            bands: GradeBands {
                min_a: 60.0,
                min_b: 70.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run_audit_with(&settings, &AuditRequest::new("")).unwrap_err();
        assert!(matches!(err, ReportError::Grade(_)));
    }

    #[test]
    fn missing_export_fails_the_audit() {
        let request = AuditRequest::new("")
            .with_cookies(CookieSource::ExportFile(PathBuf::from("/nonexistent/c.json")));
        assert!(matches!(
            run_audit(&request),
            Err(ReportError::Collect(_))
        ));
    }
}
