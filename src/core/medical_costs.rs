//! Medical cost analysis.
//!
//! Normalizes recurring medical expenses to a monthly average, projects the coming year,
//! and surfaces expensive, poorly covered bills as cost-reduction candidates.

use crate::{
    config::settings::AssessmentSettings,
    core::frequency::{Frequency, normalize},
    entities::medical_expense,
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of the trailing window for one-time expenses.
pub const TRAILING_WINDOW_DAYS: i64 = 365;

/// An expense worth reviewing for savings. Never acted on automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReductionCandidate {
    /// ID of the medical expense
    pub expense_id: i64,
    /// Category of the expense
    pub category: String,
    /// Billed amount
    pub amount: f64,
    /// Insurer-paid share of the amount, in `[0, 1]`
    pub coverage_ratio: f64,
    /// What the insured paid
    pub out_of_pocket: f64,
}

/// Output of [`analyze_medical_costs`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MedicalCostAnalysis {
    /// Recurring medical spend per month
    pub monthly_average: f64,
    /// One-time spend within the trailing window
    pub trailing_one_time: f64,
    /// `monthly_average * 12 + trailing_one_time`
    pub projected_annual: f64,
    /// Expensive, poorly covered expenses, largest out-of-pocket first
    pub cost_reduction_candidates: Vec<CostReductionCandidate>,
}

/// Cadence of an expense, or `None` for a one-time bill.
fn recurring_frequency(expense: &medical_expense::Model) -> Result<Option<Frequency>> {
    if !expense.is_recurring {
        return Ok(None);
    }
    let raw = expense.frequency.as_deref().ok_or_else(|| {
        Error::finance(format!(
            "medical expense {} is recurring but has no frequency",
            expense.id
        ))
    })?;
    let frequency: Frequency = raw.parse()?;
    Ok(frequency.is_recurring().then_some(frequency))
}

fn check_expense(expense: &medical_expense::Model) -> Result<()> {
    if !expense.amount.is_finite() || expense.amount < 0.0 {
        return Err(Error::finance(format!(
            "medical expense {} has invalid amount {}",
            expense.id, expense.amount
        )));
    }
    if !expense.insurance_payment.is_finite()
        || expense.insurance_payment < 0.0
        || expense.insurance_payment > expense.amount
    {
        return Err(Error::finance(format!(
            "medical expense {} has insurance payment {} outside [0, {}]",
            expense.id, expense.insurance_payment, expense.amount
        )));
    }
    Ok(())
}

/// Insurer-paid share of an expense; uncovered expenses have a ratio of zero.
#[must_use]
pub fn coverage_ratio(expense: &medical_expense::Model) -> f64 {
    if !expense.is_covered || expense.amount <= 0.0 {
        return 0.0;
    }
    expense.insurance_payment / expense.amount
}

/// Analyzes a profile's medical expenses as of `now`.
///
/// # Errors
/// * `InvalidFinanceData` for a negative amount, an insurance payment above the amount,
///   or a recurring expense without a frequency
/// * `UnrecognizedFrequency` for an unknown cadence
pub fn analyze_medical_costs(
    expenses: &[medical_expense::Model],
    settings: &AssessmentSettings,
    now: DateTime<Utc>,
) -> Result<MedicalCostAnalysis> {
    let window_start = now - Duration::days(TRAILING_WINDOW_DAYS);
    let mut analysis = MedicalCostAnalysis::default();

    for expense in expenses {
        check_expense(expense)?;
        match recurring_frequency(expense)? {
            Some(frequency) => analysis.monthly_average += normalize(expense.amount, frequency),
            None => {
                if expense.expense_date > window_start && expense.expense_date <= now {
                    analysis.trailing_one_time += expense.amount;
                }
            }
        }

        let ratio = coverage_ratio(expense);
        if expense.amount > settings.cost_reduction_threshold && ratio < settings.low_coverage_ratio
        {
            analysis.cost_reduction_candidates.push(CostReductionCandidate {
                expense_id: expense.id,
                category: expense.category.clone(),
                amount: expense.amount,
                coverage_ratio: ratio,
                out_of_pocket: expense.amount - expense.insurance_payment,
            });
        }
    }

    analysis.projected_annual = analysis.monthly_average * 12.0 + analysis.trailing_one_time;
    analysis
        .cost_reduction_candidates
        .sort_by(|a, b| b.out_of_pocket.total_cmp(&a.out_of_pocket).then(a.expense_id.cmp(&b.expense_id)));
    Ok(analysis)
}
