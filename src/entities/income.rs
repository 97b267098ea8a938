//! Income entity - A recurring or one-time source of money for a user.
//!
//! Amounts are recorded at the cadence the user thinks in (weekly pay, annual bonus);
//! the engine normalizes them to a monthly figure.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the record
    pub user_id: String,
    /// Human-readable source label (e.g., "Salary", "Freelance")
    pub source: String,
    /// Amount per occurrence, always positive
    pub amount: f64,
    /// Cadence as a lowercase string (`"weekly"`, `"annual"`, `"one-time"`, ...)
    pub frequency: String,
    /// Inactive incomes are kept for history but excluded from monthly totals
    pub is_active: bool,
    /// Soft delete flag - if true, income is hidden but data is preserved
    pub is_deleted: bool,
    /// When the income was recorded
    pub created_at: DateTimeUtc,
}

/// `Income` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
