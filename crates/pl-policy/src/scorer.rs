// scorer.rs - Policy risk scorer.
//
// Turns classifier matches into a 0..=100 score (higher is safer):
//
//   penalty(category) = min(category_cap, hits × weight(category))
//   score             = 100 − min(100, Σ penalty), rounded
//
// The cap is the same for every category, so a heavier category can never
// produce a smaller penalty than a lighter one at the same hit count.
// Grade and risk level come from the shared bands in pl-grade.

use std::sync::LazyLock;

use pl_grade::{Grade, GradeBands, RiskLevel};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::{classify, term_counts, TermCount, TermMatch};
use crate::error::PolicyError;
use crate::vocabulary::RiskCategory;

/// Per-category penalty per hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CategoryWeights {
    #[serde(default = "default_collection_weight")]
    pub collection: f64,
    #[serde(default = "default_sharing_weight")]
    pub sharing: f64,
    #[serde(default = "default_rights_weight")]
    pub rights: f64,
    #[serde(default = "default_retention_weight")]
    pub retention: f64,
    #[serde(default = "default_vague_weight")]
    pub vague: f64,
}

fn default_collection_weight() -> f64 {
    1.0
}

fn default_sharing_weight() -> f64 {
    2.0
}

fn default_rights_weight() -> f64 {
    1.5
}

fn default_retention_weight() -> f64 {
    1.5
}

fn default_vague_weight() -> f64 {
    0.5
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            collection: default_collection_weight(),
            sharing: default_sharing_weight(),
            rights: default_rights_weight(),
            retention: default_retention_weight(),
            vague: default_vague_weight(),
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Collection => self.collection,
            RiskCategory::Sharing => self.sharing,
            RiskCategory::Rights => self.rights,
            RiskCategory::Retention => self.retention,
            RiskCategory::Vague => self.vague,
        }
    }
}

/// Scoring configuration, the `[scoring]` table of the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: CategoryWeights,
    /// Largest penalty any one category can contribute.
    #[serde(default = "default_category_cap")]
    pub category_cap: f64,
}

fn default_category_cap() -> f64 {
    25.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            category_cap: default_category_cap(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), PolicyError> {
        for category in RiskCategory::ALL {
            let weight = self.weights.weight(category);
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(PolicyError::InvalidScoring {
                    reason: format!("weight for {} must be a non-negative number, got {}", category, weight),
                });
            }
        }
        if !(self.category_cap.is_finite() && self.category_cap > 0.0) {
            return Err(PolicyError::InvalidScoring {
                reason: format!("category_cap must be positive, got {}", self.category_cap),
            });
        }
        Ok(())
    }

    /// Penalty for `hits` matches in `category`.
    pub fn penalty(&self, category: RiskCategory, hits: usize) -> f64 {
        (hits as f64 * self.weights.weight(category)).min(self.category_cap)
    }
}

/// Hits and penalty for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub category: RiskCategory,
    pub hits: usize,
    pub penalty: f64,
    /// Term counts, most frequent first.
    pub terms: Vec<TermCount>,
}

/// Aggregate statistics over the scored text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicySummary {
    pub total_hits: usize,
    pub vague_hits: usize,
    /// Word count of the source text; absent when scoring bare matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Vague hits per hundred words, rounded to three decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vague_density_percent: Option<f64>,
}

/// Everything the scorer knows about one policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyScoreResult {
    /// 0..=100, higher is safer.
    pub score: u32,
    pub grade: Grade,
    pub risk_level: RiskLevel,
    /// Matches in document order, retained for highlighting.
    pub matches: Vec<TermMatch>,
    /// Every category, highest hit count first.
    pub categories: Vec<CategoryBreakdown>,
    pub summary: PolicySummary,
}

/// Scores policies with an immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct PolicyScorer {
    config: ScoringConfig,
    bands: GradeBands,
}

impl PolicyScorer {
    pub fn new(config: ScoringConfig, bands: GradeBands) -> Self {
        Self { config, bands }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a set of matches. Text statistics are left empty.
    pub fn score(&self, matches: &[TermMatch]) -> PolicyScoreResult {
        self.score_inner(matches, None)
    }

    /// Classify and score raw policy text in one step.
    pub fn analyze(&self, policy_text: &str) -> PolicyScoreResult {
        let matches = classify(policy_text);
        self.score_inner(&matches, Some(word_count(policy_text)))
    }

    fn score_inner(&self, matches: &[TermMatch], words: Option<usize>) -> PolicyScoreResult {
        let counts = term_counts(matches);

        let mut categories: Vec<CategoryBreakdown> = RiskCategory::ALL
            .iter()
            .map(|&category| {
                let terms = counts.get(&category).cloned().unwrap_or_default();
                let hits = terms.iter().map(|t| t.count).sum();
                CategoryBreakdown {
                    category,
                    hits,
                    penalty: self.config.penalty(category, hits),
                    terms,
                }
            })
            .collect();

        let total_penalty: f64 = categories.iter().map(|c| c.penalty).sum();
        let score = (100.0 - total_penalty.min(100.0)).round().max(0.0) as u32;
        let (grade, risk_level) = self.bands.classify(score as f64);

        categories.sort_by(|a, b| b.hits.cmp(&a.hits).then(a.category.cmp(&b.category)));

        let vague_hits = matches
            .iter()
            .filter(|m| m.category == RiskCategory::Vague)
            .count();
        let vague_density_percent = words.map(|w| {
            let density = vague_hits as f64 / w.max(1) as f64 * 100.0;
            (density * 1000.0).round() / 1000.0
        });

        tracing::debug!(
            hits = matches.len(),
            score,
            grade = %grade,
            "scored policy"
        );

        PolicyScoreResult {
            score,
            grade,
            risk_level,
            matches: matches.to_vec(),
            categories,
            summary: PolicySummary {
                total_hits: matches.len(),
                vague_hits,
                word_count: words,
                vague_density_percent,
            },
        }
    }
}

/// Score matches with the default configuration and bands.
pub fn score(matches: &[TermMatch]) -> PolicyScoreResult {
    PolicyScorer::default().score(matches)
}

/// Classify and score with the default configuration and bands.
pub fn analyze(policy_text: &str) -> PolicyScoreResult {
    PolicyScorer::default().analyze(policy_text)
}

static WORD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\w+").ok());

fn word_count(text: &str) -> usize {
    WORD.as_ref()
        .map(|re| re.find_iter(text).count())
        .unwrap_or_else(|| text.split_whitespace().count())
}
