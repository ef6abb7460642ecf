// classifier.rs - Risk term classifier.
//
// Scans policy text for every term in the static table and returns one
// `TermMatch` per occurrence, in document order. Matches are not
// deduplicated across terms or categories: if "automatically collect"
// matches, "collect" matches too, and both count toward collection.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::compile_term;
use crate::vocabulary::{risk_terms, RiskCategory, RiskTerm, Severity};

/// Characters of context kept on each side of a match.
pub const CONTEXT_RADIUS: usize = 40;

/// One occurrence of a risk term in the policy text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermMatch {
    pub category: RiskCategory,
    /// Subgroup label within the category (e.g., "High-Risk Identifiers").
    pub subgroup: String,
    /// The table term that matched.
    pub term: String,
    pub severity: Severity,
    /// Byte offset of the match start in the input text.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// The matched span exactly as written in the text.
    pub matched: String,
    /// Surrounding text (±40 characters, whitespace collapsed).
    pub context: String,
}

struct CompiledTerm {
    term: RiskTerm,
    regex: Option<Regex>,
}

static COMPILED_TERMS: LazyLock<Vec<CompiledTerm>> = LazyLock::new(|| {
    risk_terms()
        .map(|term| CompiledTerm {
            term,
            regex: compile_term(term.literal),
        })
        .collect()
});

/// Classify policy text into risk term matches, ordered by position.
///
/// Empty or whitespace-only text yields no matches.
pub fn classify(policy_text: &str) -> Vec<TermMatch> {
    if policy_text.trim().is_empty() {
        return Vec::new();
    }

    // (start, table index) keeps ties at the same offset in table order.
    let mut found: Vec<(usize, usize, TermMatch)> = Vec::new();
    for (index, compiled) in COMPILED_TERMS.iter().enumerate() {
        let Some(re) = compiled.regex.as_ref() else {
            continue;
        };
        for m in re.find_iter(policy_text) {
            found.push((
                m.start(),
                index,
                TermMatch {
                    category: compiled.term.category,
                    subgroup: compiled.term.subgroup.to_string(),
                    term: compiled.term.literal.to_string(),
                    severity: compiled.term.severity,
                    start: m.start(),
                    end: m.end(),
                    matched: m.as_str().to_string(),
                    context: context_window(policy_text, m.start(), m.end(), CONTEXT_RADIUS),
                },
            ));
        }
    }
    found.sort_by_key(|(start, index, _)| (*start, *index));

    tracing::debug!(matches = found.len(), "classified policy text");
    found.into_iter().map(|(_, _, m)| m).collect()
}

/// Hit count for one term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermCount {
    pub subgroup: String,
    pub term: String,
    pub count: usize,
}

/// Per-term hit counts for each category, sorted by descending count then
/// term (case-insensitive). Categories with no hits are omitted.
pub fn term_counts(matches: &[TermMatch]) -> BTreeMap<RiskCategory, Vec<TermCount>> {
    let mut raw: BTreeMap<(RiskCategory, &str, &str), usize> = BTreeMap::new();
    for m in matches {
        *raw.entry((m.category, m.subgroup.as_str(), m.term.as_str()))
            .or_insert(0) += 1;
    }

    let mut grouped: BTreeMap<RiskCategory, Vec<TermCount>> = BTreeMap::new();
    for ((category, subgroup, term), count) in raw {
        grouped.entry(category).or_default().push(TermCount {
            subgroup: subgroup.to_string(),
            term: term.to_string(),
            count,
        });
    }
    for counts in grouped.values_mut() {
        counts.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.term.to_lowercase().cmp(&b.term.to_lowercase()))
        });
    }
    grouped
}

/// Slice `radius` characters either side of `start..end`, snapped to char
/// boundaries, with runs of whitespace collapsed to single spaces.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_matches() {
        assert!(classify("").is_empty());
        assert!(classify("   \n\t ").is_empty());
    }

    #[test]
    fn text_without_risk_language_has_no_matches() {
        assert!(classify("Welcome to our bakery. Fresh bread daily.").is_empty());
    }

    #[test]
    fn share_with_third_parties_is_sharing() {
        let matches = classify("we may share your data with third parties for advertising");
        let terms: Vec<(&str, RiskCategory)> = matches
            .iter()
            .map(|m| (m.term.as_str(), m.category))
            .collect();
        assert_eq!(
            terms,
            vec![
                ("share", RiskCategory::Sharing),
                ("third parties", RiskCategory::Sharing),
            ]
        );
        assert_eq!(matches[0].start, 7);
        assert_eq!(matches[0].matched, "share");
    }

    #[test]
    fn matches_are_in_document_order() {
        let text = "We retain records. Later we collect your IP address and could sell it.";
        let matches = classify(text);
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(matches.first().unwrap().term, "retain");
        assert_eq!(matches.last().unwrap().term, "sell");
    }

    #[test]
    fn overlapping_terms_all_match() {
        let matches = classify("Our app may automatically collect usage data.");
        let terms: Vec<&str> = matches.iter().map(|m| m.term.as_str()).collect();
        assert!(terms.contains(&"automatically collect"));
        assert!(terms.contains(&"collect"));
    }

    #[test]
    fn position_wins_over_table_order() {
        // "collect" sits earlier in the table, but starts later in the text.
        let matches = classify("automatically collect");
        assert_eq!(matches[0].term, "automatically collect");
        assert_eq!(matches[1].term, "collect");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let matches = classify("WE COLLECT GEOLOCATION");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].matched, "GEOLOCATION");
        assert_eq!(matches[1].severity, Severity::High);
    }

    #[test]
    fn context_window_is_bounded_and_char_safe() {
        let prefix = "é".repeat(60);
        let suffix = "ü".repeat(60);
        let text = format!("{} we sell {}", prefix, suffix);
        let matches = classify(&text);
        assert_eq!(matches.len(), 1);
        let ctx = &matches[0].context;
        assert!(ctx.contains("we sell"));
        assert!(ctx.chars().count() <= 2 * CONTEXT_RADIUS + "sell".len());
    }

    #[test]
    fn context_collapses_whitespace() {
        let matches = classify("line one\n\n   we   share\n data");
        let share = matches.iter().find(|m| m.term == "share").unwrap();
        assert_eq!(share.context, "line one we share data");
    }

    #[test]
    fn term_counts_sorted_by_count_then_term() {
        let matches = classify("share share sell disclose disclose disclose");
        let counts = term_counts(&matches);
        let sharing = &counts[&RiskCategory::Sharing];
        let order: Vec<(&str, usize)> = sharing
            .iter()
            .map(|c| (c.term.as_str(), c.count))
            .collect();
        assert_eq!(order, vec![("disclose", 3), ("share", 2), ("sell", 1)]);
        assert!(!counts.contains_key(&RiskCategory::Vague));
    }

    #[test]
    fn classify_is_idempotent() {
        let text = "We may share data such as your IP address with affiliates.";
        assert_eq!(classify(text), classify(text));
    }
}
