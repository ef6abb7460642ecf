// grade.rs - Letter grades, the shared threshold table, and risk levels.
//
// Scores live on a 0..=100 scale where higher is better. Letters live on a
// 0..=4 point scale (A=4 .. F=0). The two scales meet at `points × 25`, and
// the default bands are placed so each letter's point score lands inside its
// own band: 100→A, 75→B, 50→C, 25→D, 0→F.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Multiplier from the point scale (0..=4) to the score scale (0..=100).
pub const SCORE_PER_POINT: f64 = 25.0;

/// A letter grade. Serialized as the bare letter (`"A"` .. `"F"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Every grade, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Position on the point scale (A=4 .. F=0).
    pub fn points(self) -> u32 {
        match self {
            Grade::A => 4,
            Grade::B => 3,
            Grade::C => 2,
            Grade::D => 1,
            Grade::F => 0,
        }
    }

    /// The grade's point value expressed on the 0..=100 score scale.
    pub fn score_equivalent(self) -> f64 {
        self.points() as f64 * SCORE_PER_POINT
    }

    pub fn letter(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::F => 'F',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Grade {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            _ => Err(GradeError::UnknownGrade {
                input: s.to_string(),
            }),
        }
    }
}

/// Coarse risk bucket shown next to every grade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// The only grade → risk mapping in the system: {A,B}→Low, C→Medium,
    /// {D,F}→High.
    pub fn for_grade(grade: Grade) -> Self {
        match grade {
            Grade::A | Grade::B => RiskLevel::Low,
            Grade::C => RiskLevel::Medium,
            Grade::D | Grade::F => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Minimum score (inclusive) for each passing letter. Anything below
/// `min_d` is an F.
///
/// Loaded from the `[bands]` table of `.policylens/config.toml`:
/// ```toml
/// [bands]
/// min_a = 85.0
/// min_b = 70.0
/// min_c = 50.0
/// min_d = 25.0
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GradeBands {
    #[serde(default = "default_min_a")]
    pub min_a: f64,
    #[serde(default = "default_min_b")]
    pub min_b: f64,
    #[serde(default = "default_min_c")]
    pub min_c: f64,
    #[serde(default = "default_min_d")]
    pub min_d: f64,
}

fn default_min_a() -> f64 {
    85.0
}

fn default_min_b() -> f64 {
    70.0
}

fn default_min_c() -> f64 {
    50.0
}

fn default_min_d() -> f64 {
    25.0
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            min_a: default_min_a(),
            min_b: default_min_b(),
            min_c: default_min_c(),
            min_d: default_min_d(),
        }
    }
}

impl GradeBands {
    /// Map a 0..=100 score to a letter. Out-of-range scores are clamped.
    pub fn grade_for(&self, score: f64) -> Grade {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 100.0)
        };
        if score >= self.min_a {
            Grade::A
        } else if score >= self.min_b {
            Grade::B
        } else if score >= self.min_c {
            Grade::C
        } else if score >= self.min_d {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Grade and risk level for a score, in one call.
    pub fn classify(&self, score: f64) -> (Grade, RiskLevel) {
        let grade = self.grade_for(score);
        (grade, RiskLevel::for_grade(grade))
    }

    /// Check ordering, range, and that every letter's point score maps back
    /// to that letter. Custom bands that fail this would let the aggregator
    /// disagree with the component scorers.
    pub fn validate(&self) -> Result<(), GradeError> {
        let thresholds = [
            ("min_a", self.min_a),
            ("min_b", self.min_b),
            ("min_c", self.min_c),
            ("min_d", self.min_d),
        ];
        for (name, value) in thresholds {
            if !(value > 0.0 && value <= 100.0) {
                return Err(GradeError::InvalidBands {
                    reason: format!("{} = {} is outside (0, 100]", name, value),
                });
            }
        }
        for pair in thresholds.windows(2) {
            let (hi_name, hi) = pair[0];
            let (lo_name, lo) = pair[1];
            if hi <= lo {
                return Err(GradeError::InvalidBands {
                    reason: format!(
                        "{} ({}) must be greater than {} ({})",
                        hi_name, hi, lo_name, lo
                    ),
                });
            }
        }
        for grade in Grade::ALL {
            let mapped = self.grade_for(grade.score_equivalent());
            if mapped != grade {
                return Err(GradeError::InvalidBands {
                    reason: format!(
                        "grade {} ({} points = score {}) maps to {}",
                        grade,
                        grade.points(),
                        grade.score_equivalent(),
                        mapped
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_thresholds() {
        let bands = GradeBands::default();
        assert_eq!(bands.grade_for(100.0), Grade::A);
        assert_eq!(bands.grade_for(85.0), Grade::A);
        assert_eq!(bands.grade_for(84.9), Grade::B);
        assert_eq!(bands.grade_for(70.0), Grade::B);
        assert_eq!(bands.grade_for(69.0), Grade::C);
        assert_eq!(bands.grade_for(50.0), Grade::C);
        assert_eq!(bands.grade_for(49.5), Grade::D);
        assert_eq!(bands.grade_for(25.0), Grade::D);
        assert_eq!(bands.grade_for(24.0), Grade::F);
        assert_eq!(bands.grade_for(0.0), Grade::F);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let bands = GradeBands::default();
        assert_eq!(bands.grade_for(250.0), Grade::A);
        assert_eq!(bands.grade_for(-3.0), Grade::F);
        assert_eq!(bands.grade_for(f64::NAN), Grade::F);
    }

    #[test]
    fn default_bands_round_trip_every_letter() {
        let bands = GradeBands::default();
        for grade in Grade::ALL {
            assert_eq!(bands.grade_for(grade.score_equivalent()), grade);
        }
        assert!(bands.validate().is_ok());
    }

    #[test]
    fn risk_level_mapping() {
        assert_eq!(RiskLevel::for_grade(Grade::A), RiskLevel::Low);
        assert_eq!(RiskLevel::for_grade(Grade::B), RiskLevel::Low);
        assert_eq!(RiskLevel::for_grade(Grade::C), RiskLevel::Medium);
        assert_eq!(RiskLevel::for_grade(Grade::D), RiskLevel::High);
        assert_eq!(RiskLevel::for_grade(Grade::F), RiskLevel::High);
    }

    #[test]
    fn classify_pairs_grade_with_risk() {
        let bands = GradeBands::default();
        assert_eq!(bands.classify(92.0), (Grade::A, RiskLevel::Low));
        assert_eq!(bands.classify(55.0), (Grade::C, RiskLevel::Medium));
        assert_eq!(bands.classify(10.0), (Grade::F, RiskLevel::High));
    }

    #[test]
    fn validate_rejects_unordered_bands() {
        let bands = GradeBands {
            min_a: 70.0,
            min_b: 80.0,
            ..GradeBands::default()
        };
        let err = bands.validate().unwrap_err();
        assert!(matches!(err, GradeError::InvalidBands { .. }));
    }

    #[test]
    fn validate_rejects_bands_that_break_round_trip() {
        // 90/75/60/40 is ordered, but C's point score (50) grades as D.
        let bands = GradeBands {
            min_a: 90.0,
            min_b: 75.0,
            min_c: 60.0,
            min_d: 40.0,
        };
        match bands.validate() {
            Err(GradeError::InvalidBands { reason }) => {
                assert!(reason.contains("grade C"), "reason: {}", reason)
            }
            other => panic!("expected InvalidBands, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let bands = GradeBands {
            min_d: 0.0,
            ..GradeBands::default()
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn grade_parse_and_display() {
        assert_eq!("b".parse::<Grade>().unwrap(), Grade::B);
        assert_eq!(" F ".parse::<Grade>().unwrap(), Grade::F);
        assert!("E".parse::<Grade>().is_err());
        assert_eq!(Grade::C.to_string(), "C");
        assert_eq!(RiskLevel::Medium.to_string(), "Medium");
    }

    #[test]
    fn grade_serialization() {
        assert_eq!(serde_json::to_string(&Grade::A).unwrap(), "\"A\"");
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        let restored: Grade = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(restored, Grade::D);
    }
}
