//! output_adapters - Pluggable renderers for audit reports.
//!
//! - **Terminal**: Human-readable summary with optional ANSI color (default)
//! - **JSON**: Machine-readable structured output for CI and presenters

use crate::error::ReportError;
use crate::pipeline::AuditReport;

pub mod json;
pub mod terminal;

/// Output format for report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" | "text" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: '{}'. Valid formats: terminal, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Terminal => write!(f, "terminal"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Context for rendering a report.
pub struct RenderContext<'a> {
    pub report: &'a AuditReport,
    /// Emit ANSI color codes (terminal only).
    pub color: bool,
    /// How many flaws and issues to list before summarizing the rest.
    pub max_items: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(report: &'a AuditReport) -> Self {
        Self {
            report,
            color: false,
            max_items: 10,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Output adapter trait: renders audit reports in one format.
pub trait OutputAdapter {
    /// Render the report to a string.
    fn render(&self, ctx: &RenderContext) -> Result<String, ReportError>;

    /// Adapter name (for logging/debugging).
    fn name(&self) -> &str;
}

/// Get an adapter instance for the given format.
pub fn get_adapter(format: OutputFormat) -> Box<dyn OutputAdapter> {
    match format {
        OutputFormat::Terminal => Box::new(terminal::TerminalAdapter::new()),
        OutputFormat::Json => Box::new(json::JsonAdapter::new()),
    }
}
