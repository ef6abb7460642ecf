// grade.rs - The full audit: policy, optional cookies, optional breach grade.

use std::path::PathBuf;

use clap::Args;
use pl_grade::Grade;
use pl_report::{run_audit_with, AuditRequest, OutputFormat};

use crate::commands::{print_report, read_policy, CookieArgs};
use crate::config::LensConfig;

#[derive(Args)]
pub struct GradeArgs {
    /// The privacy policy text.
    #[arg(long)]
    pub policy_file: PathBuf,
    #[command(flatten)]
    pub cookies: CookieArgs,
    /// Breach-history grade from an external source (A-F).
    #[arg(long)]
    pub breach_grade: Option<Grade>,
    /// Output format (terminal, json).
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

impl GradeArgs {
    fn request(&self) -> anyhow::Result<AuditRequest> {
        let mut request = AuditRequest::new(read_policy(&self.policy_file)?)
            .with_cookies(self.cookies.source())
            .with_consent_state(self.cookies.consent_state);
        if let Some(site) = &self.cookies.site {
            request = request.with_site(site.clone());
        }
        if let Some(at) = self.cookies.observed_at {
            request = request.with_observed_at(at);
        }
        if let Some(grade) = self.breach_grade {
            request = request.with_breach_grade(grade);
        }
        Ok(request)
    }
}

pub fn execute(args: &GradeArgs, config: &LensConfig, color: bool) -> anyhow::Result<()> {
    let report = run_audit_with(&config.settings(), &args.request()?)?;
    print_report(&report, args.format, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_cookies::ConsentState;
    use pl_report::CookieSource;
    use tempfile::tempdir;

    #[test]
    fn request_carries_every_input() {
        let dir = tempdir().unwrap();
        let policy = dir.path().join("policy.txt");
        std::fs::write(&policy, "We sell data.").unwrap();

        let args = GradeArgs {
            policy_file: policy,
            cookies: CookieArgs {
                cookies_file: None,
                cookies: Some("_ga=1".to_string()),
                site: Some("example.com".to_string()),
                consent_state: ConsentState::AfterReject,
                observed_at: None,
            },
            breach_grade: Some(Grade::D),
            format: OutputFormat::Json,
        };
        let request = args.request().unwrap();
        assert_eq!(request.policy_text, "We sell data.");
        assert!(matches!(request.cookies, CookieSource::RawList(_)));
        assert_eq!(request.consent_state, ConsentState::AfterReject);
        assert_eq!(request.breach_grade, Some(Grade::D));

        let report = run_audit_with(&LensConfig::default().settings(), &request).unwrap();
        assert!(report.cookies.is_some());
    }

    #[test]
    fn missing_policy_file_is_an_error() {
        let args = GradeArgs {
            policy_file: PathBuf::from("/nonexistent/policy.txt"),
            cookies: CookieArgs {
                cookies_file: None,
                cookies: None,
                site: None,
                consent_state: ConsentState::Unknown,
                observed_at: None,
            },
            breach_grade: None,
            format: OutputFormat::Terminal,
        };
        let err = args.request().unwrap_err();
        assert!(err.to_string().contains("Failed to read policy file"));
    }
}
