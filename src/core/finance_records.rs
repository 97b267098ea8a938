//! Finance records - create, list and soft-delete incomes, expenses and loans.
//!
//! These functions are the repository side of the finance aggregator: they validate
//! records on the way in so the calculators only ever see well-formed data, and they
//! load exactly the sets the aggregator expects (active incomes, non-deleted expenses).

use crate::{
    core::frequency::Frequency,
    entities::{Expense, Income, Loan, expense, income, loan},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use std::str::FromStr;
use tracing::{debug, info};

/// Closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Food,
    Utilities,
    Healthcare,
    Insurance,
    Entertainment,
    Education,
    Debt,
    Savings,
    Personal,
    Other,
}

impl ExpenseCategory {
    /// Lowercase label as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Housing => "housing",
            Self::Transportation => "transportation",
            Self::Food => "food",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Insurance => "insurance",
            Self::Entertainment => "entertainment",
            Self::Education => "education",
            Self::Debt => "debt",
            Self::Savings => "savings",
            Self::Personal => "personal",
            Self::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "housing" => Ok(Self::Housing),
            "transportation" => Ok(Self::Transportation),
            "food" => Ok(Self::Food),
            "utilities" => Ok(Self::Utilities),
            "healthcare" => Ok(Self::Healthcare),
            "insurance" => Ok(Self::Insurance),
            "entertainment" => Ok(Self::Entertainment),
            "education" => Ok(Self::Education),
            "debt" => Ok(Self::Debt),
            "savings" => Ok(Self::Savings),
            "personal" => Ok(Self::Personal),
            "other" => Ok(Self::Other),
            other => Err(Error::finance(format!("unknown expense category '{other}'"))),
        }
    }
}

/// Fields for a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Owner of the expense
    pub user_id: String,
    /// Budget category
    pub category: ExpenseCategory,
    /// Human-readable name
    pub name: String,
    /// Amount per occurrence
    pub amount: f64,
    /// Cadence
    pub frequency: Frequency,
    /// Fixed commitment or flexible spend
    pub is_fixed: bool,
    /// 1 = essential, 2 = important, 3 = discretionary
    pub priority: i32,
}

/// Fields for a new loan.
#[derive(Debug, Clone)]
pub struct NewLoan {
    /// Owner of the loan
    pub user_id: String,
    /// Who the money is owed to
    pub lender: String,
    /// Kind of loan
    pub loan_type: String,
    /// Original amount borrowed
    pub principal: f64,
    /// Amount still owed
    pub remaining_balance: f64,
    /// Payment due each month
    pub monthly_payment: f64,
    /// Annual interest rate as a percentage
    pub interest_rate: f64,
    /// Scheduled payoff date
    pub end_date: Option<NaiveDate>,
}

fn require_positive(what: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::finance(format!("{what} must be positive, got {amount}")));
    }
    Ok(())
}

fn require_label(what: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::finance(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Records a new active income for `user_id`.
pub async fn create_income<C>(
    db: &C,
    user_id: &str,
    source: &str,
    amount: f64,
    frequency: Frequency,
) -> Result<income::Model>
where
    C: ConnectionTrait,
{
    require_positive("Income amount", amount)?;
    let source = require_label("Income source", source)?;

    let income = income::ActiveModel {
        user_id: Set(user_id.to_string()),
        source: Set(source),
        amount: Set(amount),
        frequency: Set(frequency.as_str().to_string()),
        is_active: Set(true),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let result = income.insert(db).await?;
    debug!(user_id, income_id = result.id, "created income");
    Ok(result)
}

/// All active, non-deleted incomes for a user, oldest first.
pub async fn get_active_incomes<C>(db: &C, user_id: &str) -> Result<Vec<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find()
        .filter(income::Column::UserId.eq(user_id))
        .filter(income::Column::IsActive.eq(true))
        .filter(income::Column::IsDeleted.eq(false))
        .order_by_asc(income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_income<C>(db: &C, income_id: i64) -> Result<income::Model>
where
    C: ConnectionTrait,
{
    Income::find_by_id(income_id)
        .one(db)
        .await?
        .filter(|i| !i.is_deleted)
        .ok_or(Error::RecordNotFound {
            kind: "income",
            id: income_id,
        })
}

/// Pauses or resumes an income without deleting it.
pub async fn set_income_active<C>(db: &C, income_id: i64, active: bool) -> Result<income::Model>
where
    C: ConnectionTrait,
{
    let mut model: income::ActiveModel = find_income(db, income_id).await?.into();
    model.is_active = Set(active);
    model.update(db).await.map_err(Into::into)
}

/// Soft-deletes an income; the row is kept for history.
pub async fn soft_delete_income<C>(db: &C, income_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut model: income::ActiveModel = find_income(db, income_id).await?.into();
    model.is_deleted = Set(true);
    model.update(db).await?;
    info!(income_id, "soft-deleted income");
    Ok(())
}

/// Records a new expense.
pub async fn create_expense<C>(db: &C, new: NewExpense) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    require_positive("Expense amount", new.amount)?;
    let name = require_label("Expense name", &new.name)?;
    if !(1..=3).contains(&new.priority) {
        return Err(Error::finance(format!(
            "Expense priority must be 1-3, got {}",
            new.priority
        )));
    }

    let expense = expense::ActiveModel {
        user_id: Set(new.user_id),
        category: Set(new.category.as_str().to_string()),
        name: Set(name),
        amount: Set(new.amount),
        frequency: Set(new.frequency.as_str().to_string()),
        is_fixed: Set(new.is_fixed),
        priority: Set(new.priority),
        is_deleted: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    expense.insert(db).await.map_err(Into::into)
}

/// All non-deleted expenses for a user, by priority then id.
pub async fn get_expenses<C>(db: &C, user_id: &str) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .filter(expense::Column::IsDeleted.eq(false))
        .order_by_asc(expense::Column::Priority)
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Soft-deletes an expense.
pub async fn soft_delete_expense<C>(db: &C, expense_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .filter(|e| !e.is_deleted)
        .ok_or(Error::RecordNotFound {
            kind: "expense",
            id: expense_id,
        })?;

    let mut model: expense::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.update(db).await?;
    info!(expense_id, "soft-deleted expense");
    Ok(())
}

/// Records a new loan after checking its balance and rate invariants.
pub async fn create_loan<C>(db: &C, new: NewLoan) -> Result<loan::Model>
where
    C: ConnectionTrait,
{
    require_positive("Loan principal", new.principal)?;
    require_positive("Loan monthly payment", new.monthly_payment)?;
    if !new.remaining_balance.is_finite()
        || new.remaining_balance < 0.0
        || new.remaining_balance > new.principal
    {
        return Err(Error::finance(format!(
            "Loan remaining balance {} must be between 0 and the principal {}",
            new.remaining_balance, new.principal
        )));
    }
    if !(0.0..=100.0).contains(&new.interest_rate) {
        return Err(Error::finance(format!(
            "Loan interest rate must be 0-100, got {}",
            new.interest_rate
        )));
    }
    let lender = require_label("Lender", &new.lender)?;

    let loan = loan::ActiveModel {
        user_id: Set(new.user_id),
        lender: Set(lender),
        loan_type: Set(new.loan_type),
        principal: Set(new.principal),
        remaining_balance: Set(new.remaining_balance),
        monthly_payment: Set(new.monthly_payment),
        interest_rate: Set(new.interest_rate),
        end_date: Set(new.end_date),
        ..Default::default()
    };
    loan.insert(db).await.map_err(Into::into)
}

/// All loans for a user, oldest first.
pub async fn get_loans<C>(db: &C, user_id: &str) -> Result<Vec<loan::Model>>
where
    C: ConnectionTrait,
{
    Loan::find()
        .filter(loan::Column::UserId.eq(user_id))
        .order_by_asc(loan::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
