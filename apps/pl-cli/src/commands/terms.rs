// terms.rs - List the risk term table and cookie disclosure phrases.

use clap::Args;
use pl_policy::{risk_terms, CookieCategory, RiskCategory, RiskTerm, TERM_GROUPS};
use pl_report::OutputFormat;

#[derive(Args)]
pub struct TermsArgs {
    /// Only show one category (collection, sharing, rights, retention, vague).
    #[arg(long)]
    pub category: Option<RiskCategory>,
    /// Show cookie disclosure phrases instead of risk terms.
    #[arg(long, conflicts_with = "category")]
    pub cookies: bool,
    /// Output format (terminal, json).
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

pub fn execute(args: &TermsArgs) -> anyhow::Result<()> {
    let output = if args.cookies {
        render_disclosures(args.format)?
    } else {
        render_terms(args.category, args.format)?
    };
    println!("{}", output);
    Ok(())
}

fn render_terms(category: Option<RiskCategory>, format: OutputFormat) -> anyhow::Result<String> {
    let wanted = |c: RiskCategory| category.is_none() || category == Some(c);
    match format {
        OutputFormat::Json => {
            let terms: Vec<RiskTerm> = risk_terms().filter(|t| wanted(t.category)).collect();
            Ok(serde_json::to_string_pretty(&terms)?)
        }
        OutputFormat::Terminal => {
            let mut out = String::new();
            for group in TERM_GROUPS.iter().filter(|g| wanted(g.category)) {
                out.push_str(&format!(
                    "{} / {} [{}]\n  {}\n",
                    group.category,
                    group.subgroup,
                    group.severity,
                    group.literals.join(", ")
                ));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

fn render_disclosures(format: OutputFormat) -> anyhow::Result<String> {
    let rows: Vec<(CookieCategory, &[&str])> = CookieCategory::ALL
        .iter()
        .filter(|c| !c.disclosure_terms().is_empty())
        .map(|&c| (c, c.disclosure_terms()))
        .collect();
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = rows
                .iter()
                .map(|(c, terms)| (c.to_string(), serde_json::json!(terms)))
                .collect();
            Ok(serde_json::to_string_pretty(&map)?)
        }
        OutputFormat::Terminal => Ok(rows
            .iter()
            .map(|(c, terms)| format!("{}\n  {}", c, terms.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_limits_output() {
        let out = render_terms(Some(RiskCategory::Vague), OutputFormat::Terminal).unwrap();
        assert!(out.contains("vague / Vague Qualifiers [high]"));
        assert!(!out.contains("sharing"));
    }

    #[test]
    fn json_lists_every_term() {
        let out = render_terms(None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), risk_terms().count());
    }

    #[test]
    fn disclosures_skip_unknown() {
        let out = render_disclosures(OutputFormat::Terminal).unwrap();
        assert!(out.starts_with("essential"));
        assert!(out.contains("advertising\n  advertising, ad network"));
        assert!(!out.contains("unknown"));
    }
}
