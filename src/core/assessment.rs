//! Per-user assessment - loads everything a user has recorded and runs the engine.

use crate::{
    config::settings::AssessmentSettings,
    core::{
        affordability::get_max_affordable_amount,
        finance::{FinanceSummary, PointEvents, calculate_finance_summary, one_time_totals},
        finance_records::{get_active_incomes, get_expenses, get_loans},
        health_records::{
            find_profile, get_active_conditions, get_active_policies, get_medical_expenses,
        },
        health_summary::{HealthSummary, calculate_health_summary},
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything the engine derives for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAssessment {
    /// Whose records were assessed
    pub user_id: String,
    /// Monthly finance view
    pub finance: FinanceSummary,
    /// One-time incomes and expenses left out of `finance`
    pub point_events: PointEvents,
    /// Present when the user has a health profile, with its cost-reduction candidates
    pub health: Option<HealthSummary>,
    /// Largest recommended one-time purchase
    pub max_affordable: f64,
}

/// Runs the full assessment for `user_id` as of `now`.
///
/// Finance records are always assessed. Health is assessed only when the user has a
/// profile; its priority adjustment then scales the affordability result.
///
/// # Errors
/// Propagates database errors and any validation error raised by the calculators on
/// malformed stored records.
pub async fn assess_user<C>(
    db: &C,
    user_id: &str,
    settings: &AssessmentSettings,
    now: DateTime<Utc>,
) -> Result<UserAssessment>
where
    C: ConnectionTrait,
{
    let incomes = get_active_incomes(db, user_id).await?;
    let expenses = get_expenses(db, user_id).await?;
    let loans = get_loans(db, user_id).await?;
    debug!(
        user_id,
        incomes = incomes.len(),
        expenses = expenses.len(),
        loans = loans.len(),
        "loaded finance records"
    );

    let finance = calculate_finance_summary(&incomes, &expenses, &loans)?;
    let point_events = one_time_totals(&incomes, &expenses)?;

    let health = match find_profile(db, user_id).await? {
        Some(profile) => {
            let conditions = get_active_conditions(db, profile.id).await?;
            let medical = get_medical_expenses(db, profile.id).await?;
            let policies = get_active_policies(db, profile.id, now.date_naive()).await?;

            let summary = calculate_health_summary(
                &profile,
                &conditions,
                &medical,
                &policies,
                Some(&finance),
                settings,
                now,
            )?;
            Some(summary)
        }
        None => {
            debug!(user_id, "no health profile, assessing finances only");
            None
        }
    };

    let max_affordable =
        get_max_affordable_amount(&finance, health.as_ref().map(|h| h.priority_adjustment))?;

    info!(
        user_id,
        tier = %finance.health_tier,
        risk_score = health.as_ref().map(|h| h.risk_score),
        max_affordable,
        "assessed user"
    );

    Ok(UserAssessment {
        user_id: user_id.to_string(),
        finance,
        point_events,
        health,
        max_affordable,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            classifier::FinancialHealth,
            finance_records::{create_expense, create_income, create_loan},
            frequency::Frequency,
            health_records::add_condition,
            health_summary::VulnerabilityTier,
            risk::{RiskLevel, Severity},
        },
        test_utils::*,
    };
    use sea_orm::DatabaseConnection;

    async fn seed_household(db: &DatabaseConnection, user_id: &str) -> Result<()> {
        create_income(db, user_id, "Salary", 8000.0, Frequency::Monthly).await?;
        create_income(db, user_id, "Tax refund", 900.0, Frequency::OneTime).await?;
        create_expense(db, test_new_expense(user_id, "Rent", 3200.0)).await?;
        create_loan(db, test_new_loan(user_id, 1266.71)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_finance_only_user() -> Result<()> {
        let db = setup_test_db().await?;
        seed_household(&db, "alice").await?;

        let assessment =
            assess_user(&db, "alice", &AssessmentSettings::default(), fixed_now()).await?;

        assert_eq!(assessment.finance.health_tier, FinancialHealth::Excellent);
        assert!((assessment.max_affordable - 12_366.515).abs() < 0.01);
        assert_eq!(assessment.point_events.one_time_income, 900.0);
        assert!(assessment.health.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_health_profile_scales_affordability() -> Result<()> {
        let db = setup_test_db().await?;
        seed_household(&db, "alice").await?;

        let profile = create_test_profile(&db, "alice").await?;
        let mut moderate = test_new_condition("Asthma", Severity::Moderate);
        moderate.monthly_medication_cost = 100.0;
        add_condition(&db, profile.id, moderate).await?;
        let mut severe = test_new_condition("Diabetes", Severity::Severe);
        severe.monthly_medication_cost = 50.0;
        add_condition(&db, profile.id, severe).await?;
        create_test_policy(&db, profile.id, "PN-1").await?;
        insert_test_medical_expense(&db, profile.id, 480.0).await?;

        let assessment =
            assess_user(&db, "alice", &AssessmentSettings::default(), fixed_now()).await?;
        let health = assessment.health.unwrap();

        assert_eq!(health.risk_score, 28);
        assert_eq!(health.risk_level, RiskLevel::Moderate);
        assert_eq!(health.monthly_insurance_premiums, 250.0);
        assert!((health.coverage_gap_risk - 760.0).abs() < 1e-9);
        assert_eq!(health.financial_vulnerability, Some(VulnerabilityTier::Secure));
        assert!((assessment.max_affordable - 12_366.515 * 1.28).abs() < 0.01);

        assert_eq!(health.cost_reduction_candidates.len(), 1);
        assert_eq!(health.cost_reduction_candidates[0].out_of_pocket, 480.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty_and_poor() -> Result<()> {
        let db = setup_test_db().await?;
        let assessment =
            assess_user(&db, "nobody", &AssessmentSettings::default(), fixed_now()).await?;
        assert_eq!(assessment.finance.monthly_income, 0.0);
        assert_eq!(assessment.finance.health_tier, FinancialHealth::Poor);
        assert_eq!(assessment.max_affordable, 0.0);
        Ok(())
    }
}
