// Subcommands and the arguments they share.

pub mod cookies;
pub mod grade;
pub mod policy;
pub mod terms;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use pl_cookies::ConsentState;
use pl_report::{get_adapter, AuditReport, CookieSource, OutputFormat, RenderContext};

/// Where cookies come from, plus the context they were observed in.
#[derive(Args, Debug, Clone)]
pub struct CookieArgs {
    /// Browser automation cookie export (JSON).
    #[arg(long, conflicts_with = "cookies")]
    pub cookies_file: Option<PathBuf>,
    /// Pasted cookie list, e.g. "_ga=GA1.2; sessionid=abc".
    #[arg(long)]
    pub cookies: Option<String>,
    /// The audited site; cookies on other domains are third-party.
    #[arg(long)]
    pub site: Option<String>,
    /// When the cookies were captured: before_consent, after_accept,
    /// after_reject, unknown.
    #[arg(long, default_value = "unknown")]
    pub consent_state: ConsentState,
    /// Reference time for cookie lifetimes (RFC 3339).
    #[arg(long, value_parser = parse_timestamp)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl CookieArgs {
    pub fn source(&self) -> CookieSource {
        match (&self.cookies_file, &self.cookies) {
            (Some(path), _) => CookieSource::ExportFile(path.clone()),
            (None, Some(raw)) => CookieSource::RawList(raw.clone()),
            (None, None) => CookieSource::None,
        }
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

pub fn read_policy(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file {}", path.display()))
}

pub fn print_report(report: &AuditReport, format: OutputFormat, color: bool) -> anyhow::Result<()> {
    let adapter = get_adapter(format);
    tracing::debug!("Rendering report with {} adapter", adapter.name());
    let output = adapter.render(&RenderContext::new(report).with_color(color))?;
    println!("{}", output);
    Ok(())
}
