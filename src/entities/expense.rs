//! Expense entity - A household outflow recorded by a user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the record
    pub user_id: String,
    /// Budget category, one of the closed set in `core::finance_records::ExpenseCategory`
    pub category: String,
    /// Human-readable name (e.g., "Rent", "Groceries")
    pub name: String,
    /// Amount per occurrence, always positive
    pub amount: f64,
    /// Cadence as a lowercase string
    pub frequency: String,
    /// Whether the amount is a fixed commitment (rent) or flexible (dining out)
    pub is_fixed: bool,
    /// 1 = essential, 2 = important, 3 = discretionary
    pub priority: i32,
    /// Soft delete flag
    pub is_deleted: bool,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
