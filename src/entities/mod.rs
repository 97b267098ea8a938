//! Entity module - Contains all SeaORM entity definitions for the database.
//! Finance records (incomes, expenses, loans) are keyed by user; health records
//! (conditions, medical expenses, policies) are keyed by health profile.

pub mod expense;
pub mod health_profile;
pub mod income;
pub mod insurance_policy;
pub mod loan;
pub mod medical_condition;
pub mod medical_expense;

// Re-export specific types to avoid conflicts
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use health_profile::{
    Column as HealthProfileColumn, Entity as HealthProfile, Model as HealthProfileModel,
};
pub use income::{Column as IncomeColumn, Entity as Income, Model as IncomeModel};
pub use insurance_policy::{
    Column as InsurancePolicyColumn, Entity as InsurancePolicy, Model as InsurancePolicyModel,
};
pub use loan::{Column as LoanColumn, Entity as Loan, Model as LoanModel};
pub use medical_condition::{
    Column as MedicalConditionColumn, Entity as MedicalCondition, Model as MedicalConditionModel,
};
pub use medical_expense::{
    Column as MedicalExpenseColumn, Entity as MedicalExpense, Model as MedicalExpenseModel,
};
