// aggregate.rs - Final grade from the policy, cookie, and breach components.
//
// Points are summed as integers before dividing, so the average is exactly
// the same whatever order the components arrive in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GradeError;
use crate::grade::{Grade, GradeBands, RiskLevel, SCORE_PER_POINT};

/// Which independently computed grade a component represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Risk language in the privacy policy text.
    Policy,
    /// Observed cookies vs. what the policy discloses.
    Cookie,
    /// Breach history, graded by an external collaborator.
    Breach,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Policy => write!(f, "policy"),
            ComponentKind::Cookie => write!(f, "cookie"),
            ComponentKind::Breach => write!(f, "breach"),
        }
    }
}

/// One input to the aggregator. A component with no grade is absent and
/// takes no part in the average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentGrade {
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
}

impl ComponentGrade {
    pub fn present(kind: ComponentKind, grade: Grade) -> Self {
        Self {
            kind,
            grade: Some(grade),
        }
    }

    pub fn absent(kind: ComponentKind) -> Self {
        Self { kind, grade: None }
    }

    pub fn is_present(&self) -> bool {
        self.grade.is_some()
    }
}

/// The averaged result of all present components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalAuditResult {
    /// Mean on the 0..=4 point scale.
    pub average_points: f64,
    /// The same mean on the 0..=100 score scale (`average_points × 25`).
    pub score: f64,
    pub grade: Grade,
    pub risk_level: RiskLevel,
    /// Every supplied component (present or not), sorted by kind for display.
    pub components: Vec<ComponentGrade>,
}

/// Aggregate with the default threshold table.
pub fn aggregate(components: &[ComponentGrade]) -> Result<FinalAuditResult, GradeError> {
    aggregate_with(&GradeBands::default(), components)
}

/// Average the present components and grade the mean with `bands`.
///
/// Returns [`GradeError::NoComponents`] when nothing is present; a missing
/// grade is never silently defaulted.
pub fn aggregate_with(
    bands: &GradeBands,
    components: &[ComponentGrade],
) -> Result<FinalAuditResult, GradeError> {
    let present: Vec<Grade> = components.iter().filter_map(|c| c.grade).collect();
    if present.is_empty() {
        return Err(GradeError::NoComponents {
            supplied: components.len(),
        });
    }

    let total_points: u32 = present.iter().map(|g| g.points()).sum();
    let average_points = total_points as f64 / present.len() as f64;
    let score = average_points * SCORE_PER_POINT;
    let (grade, risk_level) = bands.classify(score);

    let mut retained = components.to_vec();
    retained.sort();

    tracing::debug!(
        present = present.len(),
        supplied = components.len(),
        average_points,
        grade = %grade,
        "aggregated component grades"
    );

    Ok(FinalAuditResult {
        average_points,
        score,
        grade,
        risk_level,
        components: retained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(grade: Grade) -> ComponentGrade {
        ComponentGrade::present(ComponentKind::Policy, grade)
    }

    fn cookie(grade: Grade) -> ComponentGrade {
        ComponentGrade::present(ComponentKind::Cookie, grade)
    }

    fn breach(grade: Grade) -> ComponentGrade {
        ComponentGrade::present(ComponentKind::Breach, grade)
    }

    #[test]
    fn single_component_is_identity() {
        for grade in Grade::ALL {
            let result = aggregate(&[policy(grade)]).unwrap();
            assert_eq!(result.grade, grade);
            assert_eq!(result.risk_level, RiskLevel::for_grade(grade));
        }
    }

    #[test]
    fn averages_present_components() {
        // A(4) + C(2) = 3.0 → 75 → B
        let result = aggregate(&[policy(Grade::A), cookie(Grade::C)]).unwrap();
        assert_eq!(result.average_points, 3.0);
        assert_eq!(result.score, 75.0);
        assert_eq!(result.grade, Grade::B);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn rounds_to_nearest_letter() {
        // A, A, B → 3.67 → 91.7 → A
        let result = aggregate(&[policy(Grade::A), cookie(Grade::A), breach(Grade::B)]).unwrap();
        assert_eq!(result.grade, Grade::A);
        // A, B, B → 3.33 → 83.3 → B
        let result = aggregate(&[policy(Grade::A), cookie(Grade::B), breach(Grade::B)]).unwrap();
        assert_eq!(result.grade, Grade::B);
        // A, F → 2.0 → 50 → C (Medium)
        let result = aggregate(&[policy(Grade::A), cookie(Grade::F)]).unwrap();
        assert_eq!(result.grade, Grade::C);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn absent_components_are_ignored() {
        let with_absent = aggregate(&[
            policy(Grade::B),
            cookie(Grade::D),
            ComponentGrade::absent(ComponentKind::Breach),
        ])
        .unwrap();
        let without = aggregate(&[policy(Grade::B), cookie(Grade::D)]).unwrap();
        assert_eq!(with_absent.grade, without.grade);
        assert_eq!(with_absent.average_points, without.average_points);
        assert_eq!(with_absent.components.len(), 3);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = aggregate(&[policy(Grade::B), cookie(Grade::B)]).unwrap();
        let reverse = aggregate(&[cookie(Grade::B), policy(Grade::B)]).unwrap();
        assert_eq!(forward, reverse);

        let forward = aggregate(&[policy(Grade::A), cookie(Grade::D), breach(Grade::C)]).unwrap();
        let reverse = aggregate(&[breach(Grade::C), policy(Grade::A), cookie(Grade::D)]).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn zero_present_components_is_an_error() {
        assert_eq!(
            aggregate(&[]).unwrap_err(),
            GradeError::NoComponents { supplied: 0 }
        );
        let err = aggregate(&[
            ComponentGrade::absent(ComponentKind::Policy),
            ComponentGrade::absent(ComponentKind::Breach),
        ])
        .unwrap_err();
        assert_eq!(err, GradeError::NoComponents { supplied: 2 });
    }

    #[test]
    fn aggregate_is_idempotent() {
        let input = [policy(Grade::C), cookie(Grade::A), breach(Grade::F)];
        assert_eq!(aggregate(&input).unwrap(), aggregate(&input).unwrap());
    }

    #[test]
    fn custom_bands_are_respected() {
        let bands = GradeBands {
            min_a: 95.0,
            min_b: 75.0,
            min_c: 50.0,
            min_d: 25.0,
        };
        // A, B → 87.5: an A under the defaults, a B here.
        let result = aggregate_with(&bands, &[policy(Grade::A), cookie(Grade::B)]).unwrap();
        assert_eq!(result.grade, Grade::B);
    }

    #[test]
    fn component_serialization_skips_absent_grade() {
        let json = serde_json::to_string(&ComponentGrade::absent(ComponentKind::Breach)).unwrap();
        assert_eq!(json, r#"{"kind":"breach"}"#);
        let restored: ComponentGrade = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_present());
    }
}
