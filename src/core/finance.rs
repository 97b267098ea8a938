//! Finance aggregation - turns a user's incomes, expenses and loans into monthly figures.
//!
//! All functions here are pure: callers load the records (see `finance_records`) and pass
//! them in. Every amount is normalized through `frequency::normalize` before summing.

use crate::{
    core::{
        classifier::{FinancialHealth, classify},
        finance_records::ExpenseCategory,
        frequency::{Frequency, normalize},
    },
    entities::{expense, income, loan},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived monthly view of a user's finances. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    /// Sum of active recurring incomes, per month
    pub monthly_income: f64,
    /// Sum of recurring expenses, per month
    pub monthly_expenses: f64,
    /// Sum of loan payments, per month
    pub monthly_loan_payments: f64,
    /// Income minus expenses minus loan payments
    pub disposable_income: f64,
    /// Loan payments over income; `f64::INFINITY` when there is no income
    pub debt_to_income: f64,
    /// Disposable income over income; 0 when there is no income
    pub savings_rate: f64,
    /// Tier assigned by the classifier
    pub health_tier: FinancialHealth,
    /// Income left after fixed expenses and loan payments
    pub budget_remaining: f64,
}

/// One-time entries excluded from the recurring monthly totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointEvents {
    /// Sum of active one-time incomes
    pub one_time_income: f64,
    /// Sum of one-time expenses
    pub one_time_expenses: f64,
}

fn check_amount(kind: &str, id: i64, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::finance(format!(
            "{kind} {id} has invalid amount {amount}"
        )));
    }
    Ok(())
}

fn check_expense(expense: &expense::Model) -> Result<Frequency> {
    check_amount("expense", expense.id, expense.amount)?;
    expense.category.parse::<ExpenseCategory>()?;
    expense.frequency.parse()
}

fn check_loan(loan: &loan::Model) -> Result<()> {
    check_amount("loan", loan.id, loan.principal)?;
    check_amount("loan", loan.id, loan.remaining_balance)?;
    if !loan.monthly_payment.is_finite() || loan.monthly_payment <= 0.0 {
        return Err(Error::finance(format!(
            "loan {} has non-positive monthly payment {}",
            loan.id, loan.monthly_payment
        )));
    }
    if loan.remaining_balance > loan.principal {
        return Err(Error::finance(format!(
            "loan {} remaining balance {} exceeds principal {}",
            loan.id, loan.remaining_balance, loan.principal
        )));
    }
    Ok(())
}

/// Monthly equivalent of the active, non-deleted incomes.
pub fn monthly_income(incomes: &[income::Model]) -> Result<f64> {
    let mut total = 0.0;
    for income in incomes {
        if !income.is_active || income.is_deleted {
            debug!(income_id = income.id, "skipping inactive income");
            continue;
        }
        check_amount("income", income.id, income.amount)?;
        let frequency: Frequency = income.frequency.parse()?;
        total += normalize(income.amount, frequency);
    }
    Ok(total)
}

/// Monthly equivalent of the non-deleted expenses, optionally only the fixed ones.
fn monthly_expenses(expenses: &[expense::Model], fixed_only: bool) -> Result<f64> {
    let mut total = 0.0;
    for expense in expenses.iter().filter(|e| !e.is_deleted) {
        let frequency = check_expense(expense)?;
        if fixed_only && !expense.is_fixed {
            continue;
        }
        total += normalize(expense.amount, frequency);
    }
    Ok(total)
}

/// Sum of monthly loan payments. Payments are monthly by construction.
pub fn monthly_loan_payments(loans: &[loan::Model]) -> Result<f64> {
    let mut total = 0.0;
    for loan in loans {
        check_loan(loan)?;
        total += loan.monthly_payment;
    }
    Ok(total)
}

/// Aggregates a user's records into a [`FinanceSummary`].
///
/// # Errors
/// * `InvalidFinanceData` if any record carries a negative or non-finite amount, or a
///   loan violates `remaining_balance <= principal` / `monthly_payment > 0`
/// * `UnrecognizedFrequency` if any record has an unknown cadence
///
/// No income is not an error: DTI becomes unbounded and the tier is Poor.
pub fn calculate_finance_summary(
    incomes: &[income::Model],
    expenses: &[expense::Model],
    loans: &[loan::Model],
) -> Result<FinanceSummary> {
    let monthly_income = monthly_income(incomes)?;
    let monthly_expenses_total = monthly_expenses(expenses, false)?;
    let fixed_expenses = monthly_expenses(expenses, true)?;
    let monthly_loan_payments = monthly_loan_payments(loans)?;

    let disposable_income = monthly_income - monthly_expenses_total - monthly_loan_payments;
    let (debt_to_income, savings_rate) = if monthly_income > 0.0 {
        (
            monthly_loan_payments / monthly_income,
            disposable_income / monthly_income,
        )
    } else {
        (f64::INFINITY, 0.0)
    };

    Ok(FinanceSummary {
        monthly_income,
        monthly_expenses: monthly_expenses_total,
        monthly_loan_payments,
        disposable_income,
        debt_to_income,
        savings_rate,
        health_tier: classify(disposable_income, debt_to_income, savings_rate),
        budget_remaining: monthly_income - fixed_expenses - monthly_loan_payments,
    })
}

/// Totals of the one-time incomes and expenses that the monthly figures leave out.
pub fn one_time_totals(
    incomes: &[income::Model],
    expenses: &[expense::Model],
) -> Result<PointEvents> {
    let mut events = PointEvents::default();
    for income in incomes.iter().filter(|i| i.is_active && !i.is_deleted) {
        check_amount("income", income.id, income.amount)?;
        if income.frequency.parse::<Frequency>()? == Frequency::OneTime {
            events.one_time_income += income.amount;
        }
    }
    for expense in expenses.iter().filter(|e| !e.is_deleted) {
        if check_expense(expense)? == Frequency::OneTime {
            events.one_time_expenses += expense.amount;
        }
    }
    Ok(events)
}
