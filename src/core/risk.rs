//! Health risk scoring - an additive point model over age, BMI, active conditions and
//! household size.
//!
//! Each factor contributes an independently capped sub-score; the total is clamped to
//! `[0, 100]` and bucketed into a [`RiskLevel`].

use crate::{
    entities::{health_profile, medical_condition},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Maximum points the age factor can contribute.
pub const AGE_CAP: u32 = 20;
/// Maximum points the BMI factor can contribute.
pub const BMI_CAP: u32 = 15;
/// Maximum points the active conditions can contribute together.
pub const CONDITIONS_CAP: u32 = 55;
/// Maximum points the household size can contribute.
pub const FAMILY_CAP: u32 = 10;
/// Upper bound of the total score.
pub const MAX_SCORE: u32 = 100;

/// Clinical severity of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor impact
    Mild,
    /// Noticeable, managed impact
    Moderate,
    /// Significant impact
    Severe,
    /// Life-threatening
    Critical,
}

impl Severity {
    /// Risk points an active condition of this severity adds.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Mild => 2,
            Self::Moderate => 5,
            Self::Severe => 10,
            Self::Critical => 15,
        }
    }

    /// Lowercase label as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            "critical" => Ok(Self::Critical),
            other => Err(Error::health(format!("unknown severity '{other}'"))),
        }
    }
}

/// Bucket of the 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// 0-25
    Low,
    /// 26-50
    Moderate,
    /// 51-75
    High,
    /// 76-100
    Critical,
}

impl RiskLevel {
    /// Level for a total score.
    #[must_use]
    pub const fn from_score(score: u32) -> Self {
        match score {
            0..=25 => Self::Low,
            26..=50 => Self::Moderate,
            51..=75 => Self::High,
            _ => Self::Critical,
        }
    }

    /// Lowercase label for logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points contributed by each factor, after capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Age points
    pub age: u32,
    /// BMI points
    pub bmi: u32,
    /// Active condition points
    pub conditions: u32,
    /// Household size points
    pub family: u32,
}

/// Output of [`calculate_health_risk_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Total score in `[0, 100]`
    pub score: u32,
    /// Bucket of `score`
    pub level: RiskLevel,
    /// Per-factor contributions
    pub breakdown: RiskBreakdown,
}

/// Age factor.
#[must_use]
pub const fn age_points(age: i32) -> u32 {
    match age {
        ..=29 => 0,
        30..=39 => 5,
        40..=49 => 10,
        50..=59 => 15,
        _ => AGE_CAP,
    }
}

/// BMI factor: underweight or obese score highest, overweight scores partially.
#[must_use]
pub fn bmi_points(bmi: f64) -> u32 {
    if bmi < 18.5 || bmi > 30.0 {
        BMI_CAP
    } else if bmi >= 25.0 {
        8
    } else {
        0
    }
}

/// Household size factor.
#[must_use]
pub const fn family_points(family_size: i32) -> u32 {
    if family_size > 4 {
        FAMILY_CAP
    } else if family_size > 2 {
        5
    } else {
        0
    }
}

/// Sum of severity points over active conditions, capped at [`CONDITIONS_CAP`].
pub fn condition_points(conditions: &[medical_condition::Model]) -> Result<u32> {
    let mut points = 0u32;
    for condition in conditions {
        let severity: Severity = condition.severity.parse()?;
        if condition.is_active {
            points = points.saturating_add(severity.points());
        }
    }
    Ok(points.min(CONDITIONS_CAP))
}

fn validate_profile(profile: &health_profile::Model) -> Result<f64> {
    if !(0..=150).contains(&profile.age) {
        return Err(Error::health(format!(
            "profile {} has age {} outside 0-150",
            profile.id, profile.age
        )));
    }
    if profile.family_size < 1 {
        return Err(Error::health(format!(
            "profile {} has family size {}",
            profile.id, profile.family_size
        )));
    }
    if !(profile.weight_kg.is_finite() && profile.weight_kg > 0.0) {
        return Err(Error::health(format!(
            "profile {} has invalid weight {}",
            profile.id, profile.weight_kg
        )));
    }
    profile
        .bmi()
        .filter(|bmi| bmi.is_finite())
        .ok_or_else(|| {
            Error::health(format!(
                "profile {} has invalid height {}",
                profile.id, profile.height_cm
            ))
        })
}

/// Computes the 0-100 health risk score for a profile and its conditions.
///
/// Inactive conditions contribute nothing, so adding an active condition never lowers
/// the score.
///
/// # Errors
/// `InvalidHealthData` for an out-of-range profile or an unknown severity.
pub fn calculate_health_risk_score(
    profile: &health_profile::Model,
    conditions: &[medical_condition::Model],
) -> Result<RiskAssessment> {
    let bmi = validate_profile(profile)?;

    let breakdown = RiskBreakdown {
        age: age_points(profile.age),
        bmi: bmi_points(bmi),
        conditions: condition_points(conditions)?,
        family: family_points(profile.family_size),
    };
    let score = (breakdown.age + breakdown.bmi + breakdown.conditions + breakdown.family)
        .min(MAX_SCORE);

    Ok(RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        breakdown,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{condition_record, profile_record};

    #[test]
    fn test_reference_profile_scores_28() {
        // 175cm / 80kg is a BMI of 26.12
        let profile = profile_record(35, 175.0, 80.0, 2);
        let conditions = vec![
            condition_record("moderate", true),
            condition_record("severe", true),
        ];

        let assessment = calculate_health_risk_score(&profile, &conditions).unwrap();

        assert_eq!(assessment.breakdown.age, 5);
        assert_eq!(assessment.breakdown.bmi, 8);
        assert_eq!(assessment.breakdown.conditions, 15);
        assert_eq!(assessment.breakdown.family, 0);
        assert_eq!(assessment.score, 28);
        assert_eq!(assessment.level, RiskLevel::Moderate);
    }

    #[test]
    fn test_age_brackets() {
        assert_eq!(age_points(0), 0);
        assert_eq!(age_points(29), 0);
        assert_eq!(age_points(30), 5);
        assert_eq!(age_points(49), 10);
        assert_eq!(age_points(59), 15);
        assert_eq!(age_points(60), 20);
        assert_eq!(age_points(150), 20);
    }

    #[test]
    fn test_bmi_brackets() {
        assert_eq!(bmi_points(18.4), 15);
        assert_eq!(bmi_points(18.5), 0);
        assert_eq!(bmi_points(24.9), 0);
        assert_eq!(bmi_points(25.0), 8);
        assert_eq!(bmi_points(30.0), 8);
        assert_eq!(bmi_points(30.1), 15);
    }

    #[test]
    fn test_family_brackets() {
        assert_eq!(family_points(1), 0);
        assert_eq!(family_points(2), 0);
        assert_eq!(family_points(3), 5);
        assert_eq!(family_points(4), 5);
        assert_eq!(family_points(5), 10);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(26), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(51), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(76), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Critical);
    }

    #[test]
    fn test_inactive_conditions_ignored() {
        let profile = profile_record(25, 170.0, 65.0, 1);
        let conditions = vec![condition_record("critical", false)];
        let assessment = calculate_health_risk_score(&profile, &conditions).unwrap();
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_score_bounded_and_monotonic_in_conditions() {
        // Obese, elderly, large household: 20 + 15 + 10 before any condition
        let profile = profile_record(72, 160.0, 95.0, 6);
        let mut conditions = Vec::new();
        let mut previous = calculate_health_risk_score(&profile, &conditions)
            .unwrap()
            .score;
        assert_eq!(previous, 45);

        for severity in ["mild", "critical", "severe", "critical", "moderate", "critical"] {
            conditions.push(condition_record(severity, true));
            let score = calculate_health_risk_score(&profile, &conditions)
                .unwrap()
                .score;
            assert!(score >= previous);
            assert!(score <= MAX_SCORE);
            previous = score;
        }
        assert_eq!(previous, MAX_SCORE);
        assert_eq!(RiskLevel::from_score(previous), RiskLevel::Critical);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let too_old = profile_record(151, 170.0, 70.0, 1);
        assert!(matches!(
            calculate_health_risk_score(&too_old, &[]),
            Err(Error::InvalidHealthData { .. })
        ));

        let no_height = profile_record(40, 0.0, 70.0, 1);
        assert!(calculate_health_risk_score(&no_height, &[]).is_err());

        let empty_household = profile_record(40, 170.0, 70.0, 0);
        assert!(calculate_health_risk_score(&empty_household, &[]).is_err());
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let profile = profile_record(40, 170.0, 70.0, 1);
        let conditions = vec![condition_record("terminal", true)];
        assert!(matches!(
            calculate_health_risk_score(&profile, &conditions),
            Err(Error::InvalidHealthData { .. })
        ));
    }
}
