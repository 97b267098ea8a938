//! Maximum recommended one-time purchase.

use crate::{
    core::{classifier::FinancialHealth, finance::FinanceSummary},
    errors::{Error, Result},
};

/// Months of disposable income a user in `tier` can safely spend at once.
#[must_use]
pub const fn base_multiplier(tier: FinancialHealth) -> f64 {
    match tier {
        FinancialHealth::Excellent => 3.5,
        FinancialHealth::Good => 3.0,
        FinancialHealth::Fair => 1.5,
        FinancialHealth::Poor => 0.0,
    }
}

/// Largest one-time purchase recommended for the household described by `summary`.
///
/// `priority_adjustment` comes from the health summary when the user has health data;
/// `None` means 1.0. The result is never negative.
///
/// # Errors
/// `InvalidFinanceData` if the adjustment is negative or not finite.
pub fn get_max_affordable_amount(
    summary: &FinanceSummary,
    priority_adjustment: Option<f64>,
) -> Result<f64> {
    let adjustment = priority_adjustment.unwrap_or(1.0);
    if !adjustment.is_finite() || adjustment < 0.0 {
        return Err(Error::finance(format!(
            "priority adjustment must be a non-negative number, got {adjustment}"
        )));
    }

    let amount = summary.disposable_income * base_multiplier(summary.health_tier) * adjustment;
    Ok(amount.max(0.0))
}
