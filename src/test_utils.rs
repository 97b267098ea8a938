//! Shared test utilities for `finhealth`.
//!
//! Two kinds of helpers live here: plain record builders for the pure calculators, and
//! database helpers that go through the real persistence functions with sensible
//! defaults.
#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        finance_records::{ExpenseCategory, NewExpense, NewLoan},
        frequency::Frequency,
        health_records::{self, NewCondition, NewPolicy, NewProfile},
        risk::Severity,
    },
    entities::{
        expense, health_profile, income, insurance_policy, loan, medical_condition,
        medical_expense,
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all persistence tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The instant every time-dependent test treats as "now": 2024-06-15 12:00 UTC.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn plan_year_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Active income record for the pure calculators.
pub fn income_record(amount: f64, frequency: &str) -> income::Model {
    income::Model {
        id: 1,
        user_id: "test_user".to_string(),
        source: "Salary".to_string(),
        amount,
        frequency: frequency.to_string(),
        is_active: true,
        is_deleted: false,
        created_at: fixed_now(),
    }
}

/// Fixed, essential expense record for the pure calculators.
pub fn expense_record(amount: f64, frequency: &str) -> expense::Model {
    expense::Model {
        id: 1,
        user_id: "test_user".to_string(),
        category: "housing".to_string(),
        name: "Rent".to_string(),
        amount,
        frequency: frequency.to_string(),
        is_fixed: true,
        priority: 1,
        is_deleted: false,
        created_at: fixed_now(),
    }
}

/// Loan record paying `monthly_payment`, half paid off.
pub fn loan_record(monthly_payment: f64) -> loan::Model {
    loan::Model {
        id: 1,
        user_id: "test_user".to_string(),
        lender: "Test Bank".to_string(),
        loan_type: "auto".to_string(),
        principal: 60_000.0,
        remaining_balance: 30_000.0,
        monthly_payment,
        interest_rate: 5.0,
        end_date: None,
    }
}

/// Health profile record with the given measurements.
pub fn profile_record(
    age: i32,
    height_cm: f64,
    weight_kg: f64,
    family_size: i32,
) -> health_profile::Model {
    health_profile::Model {
        id: 1,
        user_id: "test_user".to_string(),
        age,
        gender: "unspecified".to_string(),
        height_cm,
        weight_kg,
        family_size,
        created_at: fixed_now(),
    }
}

/// Condition record with no medication cost.
pub fn condition_record(severity: &str, is_active: bool) -> medical_condition::Model {
    medical_condition::Model {
        id: 1,
        profile_id: 1,
        name: format!("{severity} condition"),
        category: "chronic".to_string(),
        severity: severity.to_string(),
        is_active,
        monthly_medication_cost: 0.0,
        risk_factor: 0.5,
    }
}

/// Fresh policy record with untouched counters, open-ended from 2024-01-01.
///
/// # Defaults
/// * `monthly_premium`: 250.0
/// * `is_primary`: false
pub fn policy_record(
    id: i64,
    deductible: f64,
    coverage_percentage: f64,
    out_of_pocket_max: f64,
) -> insurance_policy::Model {
    insurance_policy::Model {
        id,
        profile_id: 1,
        provider: "Test Health".to_string(),
        policy_number: format!("TEST-{id}"),
        deductible,
        deductible_met: 0.0,
        out_of_pocket_max,
        out_of_pocket_current: 0.0,
        coverage_percentage,
        monthly_premium: 250.0,
        start_date: plan_year_start(),
        end_date: None,
        is_active: true,
        is_primary: false,
        version: 0,
    }
}

/// Uncovered medical expense record. Recurring exactly when `frequency` is given.
pub fn medical_expense_record(
    id: i64,
    amount: f64,
    frequency: Option<&str>,
    expense_date: DateTime<Utc>,
) -> medical_expense::Model {
    medical_expense::Model {
        id,
        profile_id: 1,
        amount,
        category: "prescription".to_string(),
        description: "Test expense".to_string(),
        is_recurring: frequency.is_some(),
        frequency: frequency.map(str::to_string),
        is_covered: false,
        insurance_payment: 0.0,
        out_of_pocket: amount,
        expense_date,
    }
}

/// Monthly fixed housing expense with priority 1.
pub fn test_new_expense(user_id: &str, name: &str, amount: f64) -> NewExpense {
    NewExpense {
        user_id: user_id.to_string(),
        category: ExpenseCategory::Housing,
        name: name.to_string(),
        amount,
        frequency: Frequency::Monthly,
        is_fixed: true,
        priority: 1,
    }
}

/// Auto loan paying `monthly_payment`, half paid off at 5%.
pub fn test_new_loan(user_id: &str, monthly_payment: f64) -> NewLoan {
    NewLoan {
        user_id: user_id.to_string(),
        lender: "Test Bank".to_string(),
        loan_type: "auto".to_string(),
        principal: 60_000.0,
        remaining_balance: 30_000.0,
        monthly_payment,
        interest_rate: 5.0,
        end_date: None,
    }
}

/// Profile for a 35 year old, 175 cm, 80 kg, in a household of two (BMI 26.12).
pub fn test_new_profile(user_id: &str) -> NewProfile {
    NewProfile {
        user_id: user_id.to_string(),
        age: 35,
        gender: "unspecified".to_string(),
        height_cm: 175.0,
        weight_kg: 80.0,
        family_size: 2,
    }
}

/// Condition with no medication cost and a mid risk factor.
pub fn test_new_condition(name: &str, severity: Severity) -> NewCondition {
    NewCondition {
        name: name.to_string(),
        category: "chronic".to_string(),
        severity,
        monthly_medication_cost: 0.0,
        risk_factor: 0.5,
    }
}

/// Open-ended secondary policy from 2024-01-01.
///
/// # Defaults
/// * deductible 500, 80% coverage, out-of-pocket max 2000
/// * `monthly_premium`: 250.0
pub fn test_new_policy(policy_number: &str) -> NewPolicy {
    NewPolicy {
        provider: "Test Health".to_string(),
        policy_number: policy_number.to_string(),
        deductible: 500.0,
        out_of_pocket_max: 2000.0,
        coverage_percentage: 80.0,
        monthly_premium: 250.0,
        start_date: plan_year_start(),
        end_date: None,
        is_primary: false,
    }
}

/// Creates the default test profile for `user_id`.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<health_profile::Model> {
    health_records::create_profile(db, test_new_profile(user_id)).await
}

/// Registers the default test policy on a profile.
pub async fn create_test_policy(
    db: &DatabaseConnection,
    profile_id: i64,
    policy_number: &str,
) -> Result<insurance_policy::Model> {
    health_records::add_policy(db, profile_id, test_new_policy(policy_number)).await
}

/// Inserts an uncovered one-time medical expense dated [`fixed_now`], bypassing claims.
pub async fn insert_test_medical_expense(
    db: &DatabaseConnection,
    profile_id: i64,
    amount: f64,
) -> Result<medical_expense::Model> {
    let expense = medical_expense::ActiveModel {
        profile_id: Set(profile_id),
        amount: Set(amount),
        category: Set("hospital".to_string()),
        description: Set("Emergency visit".to_string()),
        is_recurring: Set(false),
        frequency: Set(None),
        is_covered: Set(false),
        insurance_payment: Set(0.0),
        out_of_pocket: Set(amount),
        expense_date: Set(fixed_now()),
        ..Default::default()
    };
    expense.insert(db).await.map_err(Into::into)
}
