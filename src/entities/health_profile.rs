//! Health profile entity - Body measurements and household size for one user.
//!
//! Each user has at most one profile (enforced by the unique `user_id` column).
//! Conditions, medical expenses and insurance policies hang off the profile.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Health profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "health_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the profile, unique across the table
    #[sea_orm(unique)]
    pub user_id: String,
    /// Age in years (0-150)
    pub age: i32,
    /// Free-form gender label
    pub gender: String,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Number of people in the household, at least 1
    pub family_size: i32,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Body mass index: weight(kg) / height(m)².
    ///
    /// Returns `None` when the height is not positive.
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        if self.height_cm <= 0.0 {
            return None;
        }
        let height_m = self.height_cm / 100.0;
        Some(self.weight_kg / (height_m * height_m))
    }
}

/// Defines relationships between `HealthProfile` and its dependent records
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile has many conditions
    #[sea_orm(has_many = "super::medical_condition::Entity")]
    MedicalConditions,
    /// One profile has many medical expenses
    #[sea_orm(has_many = "super::medical_expense::Entity")]
    MedicalExpenses,
    /// One profile has many insurance policies
    #[sea_orm(has_many = "super::insurance_policy::Entity")]
    InsurancePolicies,
}

impl Related<super::medical_condition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicalConditions.def()
    }
}

impl Related<super::medical_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicalExpenses.def()
    }
}

impl Related<super::insurance_policy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InsurancePolicies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
