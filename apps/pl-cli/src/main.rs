//! # pl-cli
//!
//! Command-line interface for PolicyLens.
//!
//! - `policylens policy analyze` scores privacy policy text for risk language
//! - `policylens cookies audit` checks observed cookies against the policy
//! - `policylens grade` combines policy, cookie, and breach grades
//! - `policylens terms` lists the risk term table

mod commands;
mod config;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::LensConfig;

/// PolicyLens: grade privacy policies and the cookies sites actually set.
#[derive(Parser)]
#[command(name = "policylens", version, about)]
struct Cli {
    /// Config file (missing file means built-in defaults).
    #[arg(long, global = true, default_value = ".policylens/config.toml")]
    config: PathBuf,

    /// Disable colored terminal output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze privacy policy text.
    Policy {
        #[command(subcommand)]
        command: commands::policy::PolicyCommands,
    },
    /// Audit observed cookies against a policy.
    Cookies {
        #[command(subcommand)]
        command: commands::cookies::CookiesCommands,
    },
    /// Run the full audit and print the final grade.
    Grade(commands::grade::GradeArgs),
    /// List the risk terms the classifier looks for.
    Terms(commands::terms::TermsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interfere with reports on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("policylens=info".parse()?)
                .add_directive("pl_report=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = LensConfig::load_or_default(&cli.config)?;
    let color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();

    match &cli.command {
        Commands::Policy { command } => commands::policy::execute(command, &config, color),
        Commands::Cookies { command } => commands::cookies::execute(command, &config, color),
        Commands::Grade(args) => commands::grade::execute(args, &config, color),
        Commands::Terms(args) => commands::terms::execute(args),
    }
}
