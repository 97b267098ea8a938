//! Medical condition entity - A diagnosis attached to a health profile.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medical condition database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medical_conditions")]
pub struct Model {
    /// Unique identifier for the condition
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile this condition belongs to
    pub profile_id: i64,
    /// Name of the condition (e.g., "Type 2 diabetes")
    pub name: String,
    /// Broad category (e.g., "chronic", "acute", "mental")
    pub category: String,
    /// `"mild"`, `"moderate"`, `"severe"` or `"critical"`
    pub severity: String,
    /// Only active conditions count toward the risk score
    pub is_active: bool,
    /// Recurring medication spend per month, never negative
    pub monthly_medication_cost: f64,
    /// Clinician-supplied weight in [0, 1]
    pub risk_factor: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each condition belongs to one profile
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
