//! Health summary composition.
//!
//! Combines the risk score, medical cost analysis and insurance position into a single
//! summary, including the priority adjustment that scales purchase affordability.

use crate::{
    config::settings::AssessmentSettings,
    core::{
        finance::FinanceSummary,
        insurance::apply_to_policies,
        medical_costs::{CostReductionCandidate, analyze_medical_costs},
        risk::{RiskLevel, calculate_health_risk_score},
    },
    entities::{health_profile, insurance_policy, medical_condition, medical_expense},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Months of expenses the emergency fund should cover before risk weighting.
pub const EMERGENCY_FUND_MONTHS: f64 = 6.0;

/// How exposed a household is to its health costs, relative to income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilityTier {
    /// Health costs below 5% of income
    Secure,
    /// 5% up to 10%
    Moderate,
    /// 10% up to and including 20%
    Vulnerable,
    /// Above 20%
    Critical,
}

impl VulnerabilityTier {
    /// Tier for health costs expressed as a percentage of income.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 5.0 {
            Self::Secure
        } else if percentage < 10.0 {
            Self::Moderate
        } else if percentage <= 20.0 {
            Self::Vulnerable
        } else {
            Self::Critical
        }
    }

    /// Lowercase label for logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secure => "secure",
            Self::Moderate => "moderate",
            Self::Vulnerable => "vulnerable",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for VulnerabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived view of a profile's health and its financial weight. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Score in `[0, 100]`
    pub risk_score: u32,
    /// Bucket of `risk_score`
    pub risk_level: RiskLevel,
    /// Recurring medical spend per month
    pub monthly_medical_cost: f64,
    /// Premiums of the currently active policies, per month
    pub monthly_insurance_premiums: f64,
    /// Deductible still to be met across active policies
    pub deductible_remaining: f64,
    /// Out-of-pocket headroom across active policies
    pub out_of_pocket_remaining: f64,
    /// Medical cost plus premiums, per month
    pub total_health_costs: f64,
    /// Estimated yearly condition cost that insurance would not pay
    pub coverage_gap_risk: f64,
    /// Suggested emergency savings, weighted by risk
    pub recommended_emergency_fund: f64,
    /// `None` when no income is known
    pub financial_vulnerability: Option<VulnerabilityTier>,
    /// Multiplier applied to the maximum affordable purchase
    pub priority_adjustment: f64,
    /// Expensive, poorly covered medical bills, largest out-of-pocket first
    pub cost_reduction_candidates: Vec<CostReductionCandidate>,
}

/// Yearly medication cost of the active conditions.
fn annual_condition_cost(conditions: &[medical_condition::Model]) -> Result<f64> {
    let mut monthly = 0.0;
    for condition in conditions.iter().filter(|c| c.is_active) {
        let cost = condition.monthly_medication_cost;
        if !cost.is_finite() || cost < 0.0 {
            return Err(Error::health(format!(
                "condition {} has invalid medication cost {cost}",
                condition.id
            )));
        }
        monthly += cost;
    }
    Ok(monthly * 12.0)
}

/// Composes the health summary for one profile.
///
/// `household` is the user's finance summary when available: it supplies the income
/// for the vulnerability tier and the expenses behind the emergency fund. Without it
/// the vulnerability is left unclassified and the fund is based on health costs alone.
///
/// # Errors
/// Propagates validation errors from the risk scorer, the cost analyzer and the
/// coverage evaluator.
pub fn calculate_health_summary(
    profile: &health_profile::Model,
    conditions: &[medical_condition::Model],
    expenses: &[medical_expense::Model],
    policies: &[insurance_policy::Model],
    household: Option<&FinanceSummary>,
    settings: &AssessmentSettings,
    now: DateTime<Utc>,
) -> Result<HealthSummary> {
    let today = now.date_naive();
    let risk = calculate_health_risk_score(profile, conditions)?;
    let costs = analyze_medical_costs(expenses, settings, now)?;

    let active: Vec<&insurance_policy::Model> =
        policies.iter().filter(|p| p.is_active_on(today)).collect();
    let monthly_insurance_premiums: f64 = active.iter().map(|p| p.monthly_premium).sum();
    let deductible_remaining: f64 = active
        .iter()
        .map(|p| (p.deductible - p.deductible_met).max(0.0))
        .sum();
    let out_of_pocket_remaining: f64 = active
        .iter()
        .map(|p| (p.out_of_pocket_max - p.out_of_pocket_current).max(0.0))
        .sum();

    let coverage_gap_risk = apply_to_policies(
        annual_condition_cost(conditions)?,
        policies,
        settings.policy_order,
        today,
    )?
    .out_of_pocket;

    let total_health_costs = costs.monthly_average + monthly_insurance_premiums;
    let risk_weight = 1.0 + f64::from(risk.score) / 100.0;

    let financial_vulnerability = household
        .map(|h| h.monthly_income)
        .filter(|income| *income > 0.0)
        .map(|income| VulnerabilityTier::from_percentage(total_health_costs * 100.0 / income));

    let expense_basis = household.map_or(total_health_costs, |h| h.monthly_expenses);

    Ok(HealthSummary {
        risk_score: risk.score,
        risk_level: risk.level,
        monthly_medical_cost: costs.monthly_average,
        monthly_insurance_premiums,
        deductible_remaining,
        out_of_pocket_remaining,
        total_health_costs,
        coverage_gap_risk,
        recommended_emergency_fund: EMERGENCY_FUND_MONTHS * expense_basis * risk_weight,
        financial_vulnerability,
        priority_adjustment: risk_weight,
        cost_reduction_candidates: costs.cost_reduction_candidates,
    })
}
