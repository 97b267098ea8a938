//! Medical expense entity - A bill or recurring medical cost and how it was paid.
//!
//! `out_of_pocket` is always `amount - insurance_payment`; it is stored so history
//! survives later policy changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medical expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medical_expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile this expense belongs to
    pub profile_id: i64,
    /// Billed amount
    pub amount: f64,
    /// Kind of expense (e.g., "prescription", "specialist", "hospital")
    pub category: String,
    /// Free-form description
    pub description: String,
    /// Whether the expense repeats
    pub is_recurring: bool,
    /// Cadence of a recurring expense; `None` for one-time bills
    pub frequency: Option<String>,
    /// Whether the expense was submitted to insurance
    pub is_covered: bool,
    /// Portion paid by insurers
    pub insurance_payment: f64,
    /// Portion paid by the insured
    pub out_of_pocket: f64,
    /// When the expense was incurred, never in the future
    pub expense_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one profile
    #[sea_orm(
        belongs_to = "super::health_profile::Entity",
        from = "Column::ProfileId",
        to = "super::health_profile::Column::Id"
    )]
    HealthProfile,
}

impl Related<super::health_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
