//! Loan entity - An outstanding debt with a fixed monthly payment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Loan database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Unique identifier for the loan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the record
    pub user_id: String,
    /// Who the money is owed to
    pub lender: String,
    /// Kind of loan (e.g., "mortgage", "auto", "student")
    pub loan_type: String,
    /// Original amount borrowed
    pub principal: f64,
    /// Amount still owed, never above `principal`
    pub remaining_balance: f64,
    /// Payment due each month, always positive
    pub monthly_payment: f64,
    /// Annual interest rate as a percentage (0-100)
    pub interest_rate: f64,
    /// Scheduled payoff date, if known
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
