//! Medical expense write path.
//!
//! Recording an expense applies coverage across the profile's active policies and writes
//! the advanced counters back under a version check, so a writer holding a stale policy
//! fails with `ConcurrentUpdateConflict` instead of overwriting newer counters. The policy
//! updates and the expense row commit together or not at all.

use crate::{
    core::{
        frequency::Frequency,
        health_records::get_active_policies,
        insurance::{CoordinatedCoverage, PolicyOrder, apply_to_policies},
    },
    entities::{InsurancePolicy, insurance_policy, medical_expense},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseTransaction, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, warn};

/// A medical expense about to be recorded.
#[derive(Debug, Clone)]
pub struct NewMedicalExpense {
    /// Billed amount, must be positive
    pub amount: f64,
    /// Kind of expense
    pub category: String,
    /// Free-form description
    pub description: String,
    /// Cadence; `None` or one-time for a single bill
    pub frequency: Option<Frequency>,
    /// Submit the expense to the profile's insurance
    pub is_covered: bool,
    /// When it was incurred
    pub expense_date: DateTime<Utc>,
}

/// The stored expense and how it was split between insurers and the insured.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedExpense {
    /// Row as persisted
    pub expense: medical_expense::Model,
    /// Per-policy outcomes; empty when the expense was not covered
    pub coverage: CoordinatedCoverage,
}

fn validate(new: &NewMedicalExpense, now: DateTime<Utc>) -> Result<()> {
    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::finance(format!(
            "Medical expense amount must be positive, got {}",
            new.amount
        )));
    }
    if new.expense_date > now {
        return Err(Error::finance(format!(
            "Medical expense date {} is in the future",
            new.expense_date
        )));
    }
    Ok(())
}

/// Writes advanced counters for one policy, guarded by the version it was read at.
async fn write_back_policy<C>(db: &C, policy: &insurance_policy::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = InsurancePolicy::update_many()
        .col_expr(
            insurance_policy::Column::DeductibleMet,
            Expr::value(policy.deductible_met),
        )
        .col_expr(
            insurance_policy::Column::OutOfPocketCurrent,
            Expr::value(policy.out_of_pocket_current),
        )
        .col_expr(
            insurance_policy::Column::Version,
            Expr::col(insurance_policy::Column::Version).add(1),
        )
        .filter(insurance_policy::Column::Id.eq(policy.id))
        .filter(insurance_policy::Column::Version.eq(policy.version))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!(
            policy_id = policy.id,
            version = policy.version,
            "policy changed since it was read"
        );
        return Err(Error::ConcurrentUpdateConflict {
            policy_id: policy.id,
        });
    }
    Ok(())
}

async fn persist_claim(
    txn: &DatabaseTransaction,
    profile_id: i64,
    new: NewMedicalExpense,
    policies: &[insurance_policy::Model],
    order: PolicyOrder,
) -> Result<RecordedExpense> {
    // coverage follows the policies in force on the day the expense was incurred
    let coverage = if new.is_covered {
        apply_to_policies(new.amount, policies, order, new.expense_date.date_naive())?
    } else {
        CoordinatedCoverage {
            out_of_pocket: new.amount,
            ..CoordinatedCoverage::default()
        }
    };

    for application in &coverage.applications {
        write_back_policy(txn, &application.updated_policy).await?;
    }

    let expense = medical_expense::ActiveModel {
        profile_id: Set(profile_id),
        amount: Set(new.amount),
        category: Set(new.category),
        description: Set(new.description),
        is_recurring: Set(new.frequency.is_some_and(Frequency::is_recurring)),
        frequency: Set(new.frequency.map(|f| f.as_str().to_string())),
        is_covered: Set(new.is_covered),
        insurance_payment: Set(coverage.insurer_paid),
        out_of_pocket: Set(coverage.out_of_pocket),
        expense_date: Set(new.expense_date),
        ..Default::default()
    };
    let expense = expense.insert(txn).await?;

    Ok(RecordedExpense { expense, coverage })
}

/// Applies coverage from a policy snapshot the caller already holds and persists the
/// result. The snapshot's versions are what the write-back checks against.
///
/// # Errors
/// `ConcurrentUpdateConflict` when any policy in the snapshot has since changed; nothing
/// is written in that case.
pub async fn apply_and_persist(
    db: &DatabaseConnection,
    profile_id: i64,
    new: NewMedicalExpense,
    policies: &[insurance_policy::Model],
    order: PolicyOrder,
    now: DateTime<Utc>,
) -> Result<RecordedExpense> {
    validate(&new, now)?;

    let txn = db.begin().await?;
    match persist_claim(&txn, profile_id, new, policies, order).await {
        Ok(recorded) => {
            txn.commit().await?;
            debug!(
                expense_id = recorded.expense.id,
                policies = recorded.coverage.applications.len(),
                "persisted medical expense"
            );
            Ok(recorded)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

/// Records a medical expense for a profile, reading the policies in force on the
/// expense date and applying coverage in `order` within one transaction.
pub async fn record_medical_expense(
    db: &DatabaseConnection,
    profile_id: i64,
    new: NewMedicalExpense,
    order: PolicyOrder,
    now: DateTime<Utc>,
) -> Result<RecordedExpense> {
    validate(&new, now)?;

    let txn = db.begin().await?;
    let incurred_on = new.expense_date.date_naive();
    let outcome = match get_active_policies(&txn, profile_id, incurred_on).await {
        Ok(policies) => persist_claim(&txn, profile_id, new, &policies, order).await,
        Err(e) => Err(e),
    };
    let recorded = match outcome {
        Ok(recorded) => {
            txn.commit().await?;
            recorded
        }
        Err(e) => {
            txn.rollback().await?;
            return Err(e);
        }
    };

    info!(
        profile_id,
        expense_id = recorded.expense.id,
        insurer_paid = recorded.coverage.insurer_paid,
        out_of_pocket = recorded.coverage.out_of_pocket,
        "recorded medical expense"
    );
    Ok(recorded)
}
