// flaws.rs - Reviewer-facing flaw list and highlight spans.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::TermMatch;
use crate::vocabulary::{RiskCategory, Severity};

/// One distinct risk term found in the policy, with how often it appeared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flaw {
    pub category: RiskCategory,
    pub subgroup: String,
    pub term: String,
    pub count: usize,
    pub severity: Severity,
}

/// Collapse matches into one flaw per term, most severe first, then most
/// frequent, then alphabetical.
pub fn extract_flaws(matches: &[TermMatch]) -> Vec<Flaw> {
    let mut by_term: BTreeMap<(RiskCategory, &str, &str), Flaw> = BTreeMap::new();
    for m in matches {
        by_term
            .entry((m.category, m.subgroup.as_str(), m.term.as_str()))
            .and_modify(|f| f.count += 1)
            .or_insert_with(|| Flaw {
                category: m.category,
                subgroup: m.subgroup.clone(),
                term: m.term.clone(),
                count: 1,
                severity: m.severity,
            });
    }

    let mut flaws: Vec<Flaw> = by_term.into_values().collect();
    flaws.sort_by_key(|f| (Reverse(f.severity), Reverse(f.count), f.term.to_lowercase()));
    flaws
}

/// A byte range of the policy text worth marking up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    /// Worst severity among the matches merged into this span.
    pub severity: Severity,
}

/// Merge medium and high severity matches into non-overlapping spans, in
/// document order. Low severity matches are not highlighted.
pub fn danger_spans(matches: &[TermMatch]) -> Vec<HighlightSpan> {
    let mut candidates: Vec<HighlightSpan> = matches
        .iter()
        .filter(|m| m.severity >= Severity::Medium)
        .map(|m| HighlightSpan {
            start: m.start,
            end: m.end,
            severity: m.severity,
        })
        .collect();
    candidates.sort_by_key(|s| (s.start, Reverse(s.end)));

    let mut merged: Vec<HighlightSpan> = Vec::new();
    for span in candidates {
        match merged.last_mut() {
            Some(last) if span.start < last.end => {
                last.end = last.end.max(span.end);
                last.severity = last.severity.max(span.severity);
            }
            _ => merged.push(span),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    #[test]
    fn flaws_group_by_term_and_sort_by_severity() {
        let text = "We collect data. We collect more. We retain it. We may share it, possibly.";
        let flaws = extract_flaws(&classify(text));
        let summary: Vec<(&str, usize, Severity)> = flaws
            .iter()
            .map(|f| (f.term.as_str(), f.count, f.severity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("possibly", 1, Severity::High),
                ("share", 1, Severity::High),
                ("collect", 2, Severity::Medium),
                ("retain", 1, Severity::Low),
            ]
        );
    }

    #[test]
    fn high_risk_identifiers_are_high_severity() {
        let flaws = extract_flaws(&classify("We log your IP address."));
        assert_eq!(flaws.len(), 1);
        assert_eq!(flaws[0].severity, Severity::High);
        assert_eq!(flaws[0].subgroup, "High-Risk Identifiers");
    }

    #[test]
    fn no_matches_no_flaws() {
        assert!(extract_flaws(&[]).is_empty());
        assert!(danger_spans(&[]).is_empty());
    }

    #[test]
    fn overlapping_spans_merge() {
        let text = "apps automatically collect data";
        let spans = danger_spans(&classify(text));
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "automatically collect");
    }

    #[test]
    fn low_severity_is_not_highlighted() {
        let text = "We retain data and sell it";
        let spans = danger_spans(&classify(text));
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..spans[0].end], "sell");
        assert_eq!(spans[0].severity, Severity::High);
    }
}
