use finhealth::{
    config::{database, settings},
    core::{assessment::assess_user, health_summary::VulnerabilityTier},
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    let user_id = env::args().nth(1).ok_or_else(|| Error::Config {
        message: "usage: finhealth <user_id>".to_string(),
    })?;

    // 3. Settings from config.toml, defaults when absent
    let config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Assess
    let assessment = assess_user(&db, &user_id, &config.assessment, chrono::Utc::now()).await?;

    let finance = &assessment.finance;
    info!(
        monthly_income = finance.monthly_income,
        monthly_expenses = finance.monthly_expenses,
        monthly_loan_payments = finance.monthly_loan_payments,
        disposable_income = finance.disposable_income,
        debt_to_income = finance.debt_to_income,
        savings_rate = finance.savings_rate,
        budget_remaining = finance.budget_remaining,
        tier = %finance.health_tier,
        "finance summary"
    );
    if let Some(health) = &assessment.health {
        info!(
            risk_score = health.risk_score,
            risk_level = %health.risk_level,
            total_health_costs = health.total_health_costs,
            coverage_gap_risk = health.coverage_gap_risk,
            recommended_emergency_fund = health.recommended_emergency_fund,
            vulnerability = health.financial_vulnerability.map(VulnerabilityTier::as_str),
            "health summary"
        );
        for candidate in &health.cost_reduction_candidates {
            info!(
                expense_id = candidate.expense_id,
                category = %candidate.category,
                out_of_pocket = candidate.out_of_pocket,
                "cost reduction candidate"
            );
        }
    }
    info!(
        max_affordable = assessment.max_affordable,
        "maximum recommended purchase"
    );

    Ok(())
}
