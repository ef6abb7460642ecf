// policy.rs - Policy subcommands: analyze.

use std::path::PathBuf;

use clap::Subcommand;
use pl_report::{run_audit_with, AuditRequest, OutputFormat};

use crate::commands::{print_report, read_policy};
use crate::config::LensConfig;

#[derive(Subcommand)]
pub enum PolicyCommands {
    /// Score policy text for risky language.
    Analyze {
        /// Policy text given inline.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the policy text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output format (terminal, json).
        #[arg(long, default_value = "terminal")]
        format: OutputFormat,
    },
}

pub fn execute(cmd: &PolicyCommands, config: &LensConfig, color: bool) -> anyhow::Result<()> {
    match cmd {
        PolicyCommands::Analyze { text, file, format } => {
            let policy_text = match (text, file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => read_policy(path)?,
                (None, None) => anyhow::bail!("Provide --text or --file"),
            };
            let report = run_audit_with(&config.settings(), &AuditRequest::new(policy_text))?;
            print_report(&report, *format, color)
        }
    }
}
