// pattern.rs - Literal term → case-insensitive regex.
//
// Spaces in a term match any whitespace run (policies wrap lines mid-phrase),
// commas tolerate surrounding whitespace, and purely alphabetic terms are
// anchored on word boundaries so "sell" does not fire inside "seller".

use std::sync::LazyLock;

use regex::Regex;

use crate::vocabulary::{CookieCategory, OPT_OUT_TERMS};

/// Build the regex source for a literal term.
pub fn term_pattern(term: &str) -> String {
    let escaped = regex::escape(term)
        .replace(' ', r"\s+")
        .replace(',', r"\s*,\s*");
    let word_like = !term.is_empty()
        && term
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '-');
    if word_like {
        format!(r"(?i)\b{}\b", escaped)
    } else {
        format!("(?i){}", escaped)
    }
}

/// Compile a term. `None` only if the generated pattern is rejected, in
/// which case the term simply never matches.
pub fn compile_term(term: &str) -> Option<Regex> {
    match Regex::new(&term_pattern(term)) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(term, error = %e, "risk term pattern failed to compile; term disabled");
            None
        }
    }
}


struct DisclosurePatterns {
    category: CookieCategory,
    regexes: Vec<Regex>,
}

static DISCLOSURE_PATTERNS: LazyLock<Vec<DisclosurePatterns>> = LazyLock::new(|| {
    CookieCategory::ALL
        .iter()
        .map(|&category| DisclosurePatterns {
            category,
            regexes: category
                .disclosure_terms()
                .iter()
                .filter_map(|t| compile_term(t))
                .collect(),
        })
        .collect()
});

static OPT_OUT_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| OPT_OUT_TERMS.iter().filter_map(|t| compile_term(t)).collect());

/// True when the policy offers an opt-out or "do not sell" choice.
pub fn offers_opt_out(text: &str) -> bool {
    OPT_OUT_PATTERNS.iter().any(|re| re.is_match(text))
}

/// True when the policy text contains a disclosure phrase for `category`.
/// `Unknown` is never disclosed.
pub fn discloses(text: &str, category: CookieCategory) -> bool {
    DISCLOSURE_PATTERNS
        .iter()
        .find(|p| p.category == category)
        .is_some_and(|p| p.regexes.iter().any(|re| re.is_match(text)))
}
