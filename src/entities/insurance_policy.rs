//! Insurance policy entity - Health coverage terms plus the running deductible and
//! out-of-pocket counters for the current plan year.
//!
//! `version` is bumped on every counter write so a stale read-modify-write can be
//! detected instead of silently overwriting another writer.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insurance policy database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insurance_policies")]
pub struct Model {
    /// Unique identifier for the policy
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile this policy belongs to
    pub profile_id: i64,
    /// Insurer name
    pub provider: String,
    /// Insurer-issued policy number, unique across the table
    #[sea_orm(unique)]
    pub policy_number: String,
    /// Yearly deductible
    pub deductible: f64,
    /// Deductible paid so far, in `[0, deductible]`
    pub deductible_met: f64,
    /// Yearly out-of-pocket cap, at least `deductible`
    pub out_of_pocket_max: f64,
    /// Out-of-pocket charged so far, in `[0, out_of_pocket_max]`
    pub out_of_pocket_current: f64,
    /// Share of post-deductible cost paid by the insurer (0-100)
    pub coverage_percentage: f64,
    /// Premium paid each month
    pub monthly_premium: f64,
    /// First day of coverage
    pub start_date: Date,
    /// Last day of coverage; open-ended when `None`
    pub end_date: Option<Date>,
    /// Manually deactivated policies never apply
    pub is_active: bool,
    /// Primary policies are applied before secondary ones
    pub is_primary: bool,
    /// Optimistic concurrency counter
    pub version: i32,
}

impl Model {
    /// Whether the policy is switched on and `day` falls inside its coverage window.
    #[must_use]
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.is_active && self.start_date <= day && self.end_date.is_none_or(|end| day <= end)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each policy belongs to one profile
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
