//! Health records - profiles, conditions, insurance policies and medical expense history.
//!
//! One profile per user is enforced here and by the unique `user_id` column; the
//! calculators assume it. Deleting a profile cascades to everything hanging off it.

use crate::{
    entities::{
        HealthProfile, InsurancePolicy, MedicalCondition, MedicalExpense, health_profile,
        insurance_policy, medical_condition, medical_expense,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Fields for a new health profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    /// Owner of the profile
    pub user_id: String,
    /// Age in years
    pub age: i32,
    /// Free-form gender label
    pub gender: String,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Household size, at least 1
    pub family_size: i32,
}

/// Fields for a new medical condition.
#[derive(Debug, Clone)]
pub struct NewCondition {
    /// Name of the condition
    pub name: String,
    /// Broad category
    pub category: String,
    /// Clinical severity
    pub severity: crate::core::risk::Severity,
    /// Monthly medication spend
    pub monthly_medication_cost: f64,
    /// Clinician-supplied weight in [0, 1]
    pub risk_factor: f64,
}

/// Fields for a new insurance policy. Counters start at zero.
#[derive(Debug, Clone)]
pub struct NewPolicy {
    /// Insurer name
    pub provider: String,
    /// Insurer-issued policy number
    pub policy_number: String,
    /// Yearly deductible
    pub deductible: f64,
    /// Yearly out-of-pocket cap
    pub out_of_pocket_max: f64,
    /// Insurer share after the deductible (0-100)
    pub coverage_percentage: f64,
    /// Monthly premium
    pub monthly_premium: f64,
    /// First day of coverage
    pub start_date: NaiveDate,
    /// Last day of coverage
    pub end_date: Option<NaiveDate>,
    /// Apply before secondary policies
    pub is_primary: bool,
}

fn validate_measurements(age: i32, height_cm: f64, weight_kg: f64, family_size: i32) -> Result<()> {
    if !(0..=150).contains(&age) {
        return Err(Error::health(format!("Age must be 0-150, got {age}")));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(Error::health(format!("Height must be positive, got {height_cm}")));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::health(format!("Weight must be positive, got {weight_kg}")));
    }
    if family_size < 1 {
        return Err(Error::health(format!(
            "Family size must be at least 1, got {family_size}"
        )));
    }
    Ok(())
}

/// Creates the health profile for a user.
///
/// # Errors
/// `ProfileExists` if the user already has one, `InvalidHealthData` for out-of-range
/// measurements.
pub async fn create_profile<C>(db: &C, new: NewProfile) -> Result<health_profile::Model>
where
    C: ConnectionTrait,
{
    validate_measurements(new.age, new.height_cm, new.weight_kg, new.family_size)?;
    if find_profile(db, &new.user_id).await?.is_some() {
        return Err(Error::ProfileExists {
            user_id: new.user_id,
        });
    }

    let profile = health_profile::ActiveModel {
        user_id: Set(new.user_id),
        age: Set(new.age),
        gender: Set(new.gender),
        height_cm: Set(new.height_cm),
        weight_kg: Set(new.weight_kg),
        family_size: Set(new.family_size),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let result = profile.insert(db).await?;
    info!(user_id = %result.user_id, profile_id = result.id, "created health profile");
    Ok(result)
}

/// The user's profile, if one exists.
pub async fn find_profile<C>(db: &C, user_id: &str) -> Result<Option<health_profile::Model>>
where
    C: ConnectionTrait,
{
    HealthProfile::find()
        .filter(health_profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// The user's profile.
///
/// # Errors
/// `ProfileNotFound` if the user has none.
pub async fn get_profile<C>(db: &C, user_id: &str) -> Result<health_profile::Model>
where
    C: ConnectionTrait,
{
    find_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })
}

/// Replaces the measurements on a user's profile.
pub async fn update_profile_measurements<C>(
    db: &C,
    user_id: &str,
    age: i32,
    height_cm: f64,
    weight_kg: f64,
    family_size: i32,
) -> Result<health_profile::Model>
where
    C: ConnectionTrait,
{
    validate_measurements(age, height_cm, weight_kg, family_size)?;
    let mut model: health_profile::ActiveModel = get_profile(db, user_id).await?.into();
    model.age = Set(age);
    model.height_cm = Set(height_cm);
    model.weight_kg = Set(weight_kg);
    model.family_size = Set(family_size);
    model.update(db).await.map_err(Into::into)
}

/// Attaches an active condition to a profile.
pub async fn add_condition<C>(
    db: &C,
    profile_id: i64,
    new: NewCondition,
) -> Result<medical_condition::Model>
where
    C: ConnectionTrait,
{
    if !new.monthly_medication_cost.is_finite() || new.monthly_medication_cost < 0.0 {
        return Err(Error::health(format!(
            "Medication cost cannot be negative, got {}",
            new.monthly_medication_cost
        )));
    }
    if !(0.0..=1.0).contains(&new.risk_factor) {
        return Err(Error::health(format!(
            "Risk factor must be within [0, 1], got {}",
            new.risk_factor
        )));
    }
    if new.name.trim().is_empty() {
        return Err(Error::health("Condition name cannot be empty"));
    }

    let condition = medical_condition::ActiveModel {
        profile_id: Set(profile_id),
        name: Set(new.name.trim().to_string()),
        category: Set(new.category),
        severity: Set(new.severity.as_str().to_string()),
        is_active: Set(true),
        monthly_medication_cost: Set(new.monthly_medication_cost),
        risk_factor: Set(new.risk_factor),
        ..Default::default()
    };
    condition.insert(db).await.map_err(Into::into)
}

/// Marks a condition as active or resolved.
pub async fn set_condition_active<C>(
    db: &C,
    condition_id: i64,
    active: bool,
) -> Result<medical_condition::Model>
where
    C: ConnectionTrait,
{
    let existing = MedicalCondition::find_by_id(condition_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "condition",
            id: condition_id,
        })?;
    let mut model: medical_condition::ActiveModel = existing.into();
    model.is_active = Set(active);
    model.update(db).await.map_err(Into::into)
}

/// Active conditions of a profile.
pub async fn get_active_conditions<C>(
    db: &C,
    profile_id: i64,
) -> Result<Vec<medical_condition::Model>>
where
    C: ConnectionTrait,
{
    MedicalCondition::find()
        .filter(medical_condition::Column::ProfileId.eq(profile_id))
        .filter(medical_condition::Column::IsActive.eq(true))
        .order_by_asc(medical_condition::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Registers an insurance policy for a profile.
///
/// # Errors
/// `PolicyExists` for a duplicate policy number, `InvalidFinanceData` when the terms
/// are inconsistent (deductible above the out-of-pocket max, coverage outside 0-100).
pub async fn add_policy<C>(
    db: &C,
    profile_id: i64,
    new: NewPolicy,
) -> Result<insurance_policy::Model>
where
    C: ConnectionTrait,
{
    let amounts = [new.deductible, new.out_of_pocket_max, new.monthly_premium];
    if amounts.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(Error::finance("Policy amounts cannot be negative"));
    }
    if new.deductible > new.out_of_pocket_max {
        return Err(Error::finance(format!(
            "Deductible {} exceeds out-of-pocket max {}",
            new.deductible, new.out_of_pocket_max
        )));
    }
    if !(0.0..=100.0).contains(&new.coverage_percentage) {
        return Err(Error::finance(format!(
            "Coverage percentage must be 0-100, got {}",
            new.coverage_percentage
        )));
    }
    if new.end_date.is_some_and(|end| end < new.start_date) {
        return Err(Error::finance("Policy ends before it starts"));
    }

    let duplicate = InsurancePolicy::find()
        .filter(insurance_policy::Column::PolicyNumber.eq(new.policy_number.as_str()))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(Error::PolicyExists {
            policy_number: new.policy_number,
        });
    }

    let policy = insurance_policy::ActiveModel {
        profile_id: Set(profile_id),
        provider: Set(new.provider),
        policy_number: Set(new.policy_number),
        deductible: Set(new.deductible),
        deductible_met: Set(0.0),
        out_of_pocket_max: Set(new.out_of_pocket_max),
        out_of_pocket_current: Set(0.0),
        coverage_percentage: Set(new.coverage_percentage),
        monthly_premium: Set(new.monthly_premium),
        start_date: Set(new.start_date),
        end_date: Set(new.end_date),
        is_active: Set(true),
        is_primary: Set(new.is_primary),
        version: Set(0),
        ..Default::default()
    };
    policy.insert(db).await.map_err(Into::into)
}

/// A policy by id.
///
/// # Errors
/// `PolicyNotFound` if it does not exist.
pub async fn get_policy<C>(db: &C, policy_id: i64) -> Result<insurance_policy::Model>
where
    C: ConnectionTrait,
{
    InsurancePolicy::find_by_id(policy_id)
        .one(db)
        .await?
        .ok_or(Error::PolicyNotFound { policy_id })
}

/// Policies of a profile that are switched on and cover `today`.
pub async fn get_active_policies<C>(
    db: &C,
    profile_id: i64,
    today: NaiveDate,
) -> Result<Vec<insurance_policy::Model>>
where
    C: ConnectionTrait,
{
    InsurancePolicy::find()
        .filter(insurance_policy::Column::ProfileId.eq(profile_id))
        .filter(insurance_policy::Column::IsActive.eq(true))
        .filter(insurance_policy::Column::StartDate.lte(today))
        .filter(
            Condition::any()
                .add(insurance_policy::Column::EndDate.is_null())
                .add(insurance_policy::Column::EndDate.gte(today)),
        )
        .order_by_asc(insurance_policy::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Medical expense history of a profile, newest first.
pub async fn get_medical_expenses<C>(
    db: &C,
    profile_id: i64,
) -> Result<Vec<medical_expense::Model>>
where
    C: ConnectionTrait,
{
    MedicalExpense::find()
        .filter(medical_expense::Column::ProfileId.eq(profile_id))
        .order_by_desc(medical_expense::Column::ExpenseDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a user's profile together with its conditions, medical expenses and
/// policies. All rows go or none do.
///
/// # Errors
/// `ProfileNotFound` if the user has no profile.
pub async fn delete_profile(db: &DatabaseConnection, user_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    let profile = get_profile(&txn, user_id).await?;

    let conditions = MedicalCondition::delete_many()
        .filter(medical_condition::Column::ProfileId.eq(profile.id))
        .exec(&txn)
        .await?;
    let expenses = MedicalExpense::delete_many()
        .filter(medical_expense::Column::ProfileId.eq(profile.id))
        .exec(&txn)
        .await?;
    let policies = InsurancePolicy::delete_many()
        .filter(insurance_policy::Column::ProfileId.eq(profile.id))
        .exec(&txn)
        .await?;
    HealthProfile::delete_by_id(profile.id).exec(&txn).await?;

    txn.commit().await?;

    debug!(
        conditions = conditions.rows_affected,
        expenses = expenses.rows_affected,
        policies = policies.rows_affected,
        "cascaded profile delete"
    );
    info!(user_id, profile_id = profile.id, "deleted health profile");
    Ok(())
}
