//! Core logic, independent of any front end.
//!
//! The calculators (`frequency` through `health_summary`) are pure functions over records
//! the caller has already loaded. The `*_records`, `claims` and `assessment` modules are the
//! async persistence layer around them.

/// Maximum recommended one-time purchase
pub mod affordability;
/// Loads a user's records and runs the whole engine
pub mod assessment;
/// Medical expense write path with versioned policy write-back
pub mod claims;
/// Financial health tiers
pub mod classifier;
/// Monthly income, expense and loan aggregation
pub mod finance;
/// Income, expense and loan persistence
pub mod finance_records;
/// Frequency parsing and monthly normalization
pub mod frequency;
/// Health profile, condition, policy and medical expense persistence
pub mod health_records;
/// Health summary composition
pub mod health_summary;
/// Deductible, coinsurance and out-of-pocket cap evaluation
pub mod insurance;
/// Medical cost normalization and cost-reduction candidates
pub mod medical_costs;
/// Health risk scoring
pub mod risk;
