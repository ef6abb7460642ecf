// cookies.rs - Cookie subcommands: audit.

use std::path::PathBuf;

use clap::Subcommand;
use pl_report::{run_audit_with, AuditRequest, CookieSource, OutputFormat};

use crate::commands::{print_report, read_policy, CookieArgs};
use crate::config::LensConfig;

#[derive(Subcommand)]
pub enum CookiesCommands {
    /// Check observed cookies against what the policy discloses.
    Audit {
        /// The privacy policy text to check disclosures against.
        #[arg(long)]
        policy_file: PathBuf,
        #[command(flatten)]
        cookies: CookieArgs,
        /// Output format (terminal, json).
        #[arg(long, default_value = "terminal")]
        format: OutputFormat,
    },
}

pub fn execute(cmd: &CookiesCommands, config: &LensConfig, color: bool) -> anyhow::Result<()> {
    match cmd {
        CookiesCommands::Audit {
            policy_file,
            cookies,
            format,
        } => {
            let source = cookies.source();
            if matches!(source, CookieSource::None) {
                anyhow::bail!("Provide cookies with --cookies-file or --cookies");
            }
            let mut request = AuditRequest::new(read_policy(policy_file)?)
                .with_cookies(source)
                .with_consent_state(cookies.consent_state);
            if let Some(site) = &cookies.site {
                request = request.with_site(site.clone());
            }
            if let Some(at) = cookies.observed_at {
                request = request.with_observed_at(at);
            }
            let report = run_audit_with(&config.settings(), &request)?;
            print_report(&report, *format, color)
        }
    }
}
