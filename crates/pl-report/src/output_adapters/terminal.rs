//! terminal.rs - Terminal output adapter with optional ANSI color.

use pl_cookies::CookieAuditResult;
use pl_grade::{Grade, RiskLevel};
use pl_policy::Severity;

use crate::error::ReportError;
use crate::output_adapters::{OutputAdapter, RenderContext};
use crate::pipeline::PolicyReport;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

#[derive(Default)]
pub struct TerminalAdapter {}

impl TerminalAdapter {
    pub fn new() -> Self {
        Self {}
    }

    fn paint(&self, ctx: &RenderContext, code: &str, text: &str) -> String {
        if ctx.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn grade_badge(&self, ctx: &RenderContext, grade: Grade, risk: RiskLevel) -> String {
        let code = match grade {
            Grade::A | Grade::B => GREEN,
            Grade::C => YELLOW,
            Grade::D | Grade::F => RED,
        };
        self.paint(ctx, code, &format!("{} ({} risk)", grade, risk))
    }

    fn severity_tag(&self, ctx: &RenderContext, severity: Severity) -> String {
        let (code, label) = match severity {
            Severity::High => (RED, "[high]  "),
            Severity::Medium => (YELLOW, "[medium]"),
            Severity::Low => (DIM, "[low]   "),
        };
        self.paint(ctx, code, label)
    }

    fn render_policy(&self, ctx: &RenderContext, policy: &PolicyReport) -> String {
        let result = &policy.result;
        let mut out = format!(
            "{}\n  Score: {}/100  Grade: {}\n",
            self.paint(ctx, BOLD, "Privacy policy"),
            result.score,
            self.grade_badge(ctx, result.grade, result.risk_level),
        );

        let summary = &result.summary;
        out.push_str(&format!("  Risk terms found: {}", summary.total_hits));
        if let (Some(words), Some(density)) = (summary.word_count, summary.vague_density_percent) {
            out.push_str(&format!(
                " in {} words (vague language {:.3}%)",
                words, density
            ));
        }
        out.push('\n');

        for cat in result.categories.iter().filter(|c| c.hits > 0) {
            out.push_str(&format!(
                "    {:<11} {:>3} hit(s)  -{:.1}\n",
                cat.category.to_string(),
                cat.hits,
                cat.penalty
            ));
        }

        if !policy.flaws.is_empty() {
            out.push_str(&format!("  {}\n", self.paint(ctx, BOLD, "Flaws:")));
            for flaw in policy.flaws.iter().take(ctx.max_items) {
                out.push_str(&format!(
                    "    {} \"{}\" x{} {}\n",
                    self.severity_tag(ctx, flaw.severity),
                    flaw.term,
                    flaw.count,
                    self.paint(ctx, DIM, &format!("({}: {})", flaw.category, flaw.subgroup)),
                ));
            }
            if policy.flaws.len() > ctx.max_items {
                out.push_str(&format!(
                    "    ... and {} more\n",
                    policy.flaws.len() - ctx.max_items
                ));
            }
        }
        out
    }

    fn render_cookies(&self, ctx: &RenderContext, cookies: &CookieAuditResult) -> String {
        let meta = &cookies.metadata;
        let mut out = format!(
            "{}\n  Score: {}/100  Grade: {}\n",
            self.paint(ctx, BOLD, "Cookies"),
            cookies.score,
            self.grade_badge(ctx, cookies.grade, cookies.risk_level),
        );

        if meta.empty_collection {
            out.push_str("  No cookies were observed.\n");
            return out;
        }

        let counts: Vec<String> = cookies
            .category_counts
            .iter()
            .map(|(category, n)| format!("{} {}", n, category))
            .collect();
        out.push_str(&format!(
            "  {} cookie(s), {} third-party, consent state {}: {}\n",
            meta.cookie_count,
            meta.third_party_count,
            meta.consent_state,
            counts.join(", ")
        ));

        for d in &cookies.discrepancies {
            out.push_str(&format!(
                "  {} {} cookies not disclosed: {}\n",
                self.paint(ctx, RED, "!"),
                d.category,
                d.cookies.join(", ")
            ));
        }

        if !cookies.issues.is_empty() {
            out.push_str(&format!("  {}\n", self.paint(ctx, BOLD, "Issues:")));
            for issue in cookies.issues.iter().take(ctx.max_items) {
                out.push_str(&format!(
                    "    {} {} (-{:.1})\n      {}\n",
                    self.severity_tag(ctx, issue.severity),
                    issue.title,
                    issue.penalty,
                    self.paint(ctx, DIM, &issue.detail),
                ));
            }
            if cookies.issues.len() > ctx.max_items {
                out.push_str(&format!(
                    "    ... and {} more\n",
                    cookies.issues.len() - ctx.max_items
                ));
            }
        }
        out
    }
}

impl OutputAdapter for TerminalAdapter {
    fn render(&self, ctx: &RenderContext) -> Result<String, ReportError> {
        let report = ctx.report;
        let mut output = String::new();

        if let Some(site) = &report.site {
            output.push_str(&format!(
                "{}\n\n",
                self.paint(ctx, BOLD, &format!("PolicyLens audit: {}", site))
            ));
        }

        output.push_str(&self.render_policy(ctx, &report.policy));
        output.push('\n');

        if let Some(cookies) = &report.cookies {
            output.push_str(&self.render_cookies(ctx, cookies));
            output.push('\n');
        }

        if let Some(breach) = report.breach_grade {
            output.push_str(&format!(
                "{}\n  Grade: {}\n\n",
                self.paint(ctx, BOLD, "Breach history"),
                breach
            ));
        }

        let fin = &report.final_result;
        output.push_str(&format!(
            "{} {}  (average {:.2} points, score {:.0})\n",
            self.paint(ctx, BOLD, "Final grade:"),
            self.grade_badge(ctx, fin.grade, fin.risk_level),
            fin.average_points,
            fin.score
        ));

        Ok(output)
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_audit, AuditRequest, CookieSource};

    #[test]
    fn plain_output_has_no_escape_codes() {
        let report = run_audit(&AuditRequest::new("We may share data, such as your IP address."))
            .unwrap();
        let output = TerminalAdapter::new()
            .render(&RenderContext::new(&report))
            .unwrap();
        assert!(!output.contains('\x1b'));
        assert!(output.contains("Privacy policy"));
        assert!(output.contains("\"share\""));
        assert!(output.contains("Final grade:"));
        assert!(!output.contains("Cookies"));
    }

    #[test]
    fn color_output_uses_ansi() {
        let report = run_audit(&AuditRequest::new("")).unwrap();
        let output = TerminalAdapter::new()
            .render(&RenderContext::new(&report).with_color(true))
            .unwrap();
        assert!(output.contains(GREEN));
        assert!(output.contains(RESET));
    }

    #[test]
    fn cookie_section_lists_discrepancies() {
        let request = AuditRequest::new("We care about privacy.")
            .with_site("https://shop.example")
            .with_cookies(CookieSource::RawList("_ga=1; IDE=2".to_string()));
        let report = run_audit(&request).unwrap();
        let output = TerminalAdapter::new()
            .render(&RenderContext::new(&report))
            .unwrap();
        assert!(output.contains("PolicyLens audit: https://shop.example"));
        assert!(output.contains("analytics cookies not disclosed: _ga"));
        assert!(output.contains("advertising cookies not disclosed: IDE"));
    }

    #[test]
    fn empty_collection_is_called_out() {
        let request =
            AuditRequest::new("").with_cookies(CookieSource::RawList(String::new()));
        let report = run_audit(&request).unwrap();
        let output = TerminalAdapter::new()
            .render(&RenderContext::new(&report))
            .unwrap();
        assert!(output.contains("No cookies were observed."));
    }
}
