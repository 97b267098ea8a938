//! Insurance coverage evaluation.
//!
//! Splits a medical expense between the deductible, the insurer and the insured, and
//! advances the policy's running counters. Nothing is persisted here: the updated policy
//! is returned and the caller (see `claims`) writes it back under a version check.

use crate::{
    entities::insurance_policy,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Order in which several active policies are applied to one expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyOrder {
    /// Primary-flagged policies first, then earliest start date, then lowest id
    #[default]
    PrimaryFirst,
    /// Earliest start date first, then lowest id
    EarliestStart,
    /// Highest coverage percentage first, then lowest id
    HighestCoverage,
}

impl PolicyOrder {
    fn compare(self, a: &insurance_policy::Model, b: &insurance_policy::Model) -> Ordering {
        let by_key = match self {
            Self::PrimaryFirst => b
                .is_primary
                .cmp(&a.is_primary)
                .then(a.start_date.cmp(&b.start_date)),
            Self::EarliestStart => a.start_date.cmp(&b.start_date),
            Self::HighestCoverage => b.coverage_percentage.total_cmp(&a.coverage_percentage),
        };
        by_key.then(a.id.cmp(&b.id))
    }

    /// Sorts `policies` in application order.
    pub fn sort(self, policies: &mut [insurance_policy::Model]) {
        policies.sort_by(|a, b| self.compare(a, b));
    }
}

/// Result of applying one expense to one policy.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageOutcome {
    /// Amount the insurer pays
    pub insurer_paid: f64,
    /// Amount the insured pays, deductible portion included
    pub out_of_pocket: f64,
    /// Part of `out_of_pocket` that went toward the deductible
    pub toward_deductible: f64,
    /// Policy with advanced `deductible_met` / `out_of_pocket_current`
    pub updated_policy: insurance_policy::Model,
}

/// Result of applying one expense across several policies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinatedCoverage {
    /// Per-policy outcomes, in application order
    pub applications: Vec<CoverageOutcome>,
    /// Total paid by all insurers
    pub insurer_paid: f64,
    /// What the insured still owes after every policy
    pub out_of_pocket: f64,
}

fn check_policy(policy: &insurance_policy::Model) -> Result<()> {
    let invalid = |what: &str| {
        Err(Error::finance(format!(
            "policy {} ({}) {what}",
            policy.id, policy.policy_number
        )))
    };

    let amounts = [
        policy.deductible,
        policy.deductible_met,
        policy.out_of_pocket_max,
        policy.out_of_pocket_current,
        policy.coverage_percentage,
    ];
    if amounts.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return invalid("has a negative or non-finite amount");
    }
    if policy.deductible > policy.out_of_pocket_max {
        return invalid("has a deductible above its out-of-pocket max");
    }
    if policy.coverage_percentage > 100.0 {
        return invalid("covers more than 100%");
    }
    if policy.deductible_met > policy.deductible {
        return invalid("has met more than its deductible");
    }
    if policy.out_of_pocket_current > policy.out_of_pocket_max {
        return invalid("has exceeded its out-of-pocket max");
    }
    Ok(())
}

/// Applies one expense to one policy.
///
/// The deductible is paid first, entirely out of pocket. The remainder is split by the
/// coverage percentage; the insured's share is clamped to what is left under the
/// out-of-pocket max and any excess shifts to the insurer. `insurer_paid + out_of_pocket`
/// always equals `expense_amount`.
///
/// # Errors
/// `InvalidFinanceData` for a negative/non-finite amount or a policy that violates its
/// own invariants. The input policy is never modified.
pub fn apply_insurance_coverage(
    expense_amount: f64,
    policy: &insurance_policy::Model,
) -> Result<CoverageOutcome> {
    if !expense_amount.is_finite() || expense_amount < 0.0 {
        return Err(Error::finance(format!(
            "expense amount must be a non-negative number, got {expense_amount}"
        )));
    }
    check_policy(policy)?;

    let deductible_remaining = (policy.deductible - policy.deductible_met).max(0.0);
    let toward_deductible = expense_amount.min(deductible_remaining);
    let after_deductible = expense_amount - toward_deductible;

    let cap_remaining = (policy.out_of_pocket_max - policy.out_of_pocket_current).max(0.0);
    let insurer_share = after_deductible * policy.coverage_percentage / 100.0;
    let insured_share = (after_deductible - insurer_share).min(cap_remaining);

    let out_of_pocket = toward_deductible + insured_share;

    let mut updated_policy = policy.clone();
    updated_policy.deductible_met = if toward_deductible >= deductible_remaining {
        policy.deductible
    } else {
        policy.deductible_met + toward_deductible
    };
    updated_policy.out_of_pocket_current = if insured_share >= cap_remaining {
        policy.out_of_pocket_max
    } else {
        policy.out_of_pocket_current + insured_share
    };

    Ok(CoverageOutcome {
        insurer_paid: expense_amount - out_of_pocket,
        out_of_pocket,
        toward_deductible,
        updated_policy,
    })
}

/// Applies one expense across every policy active on `today`, in `order`.
///
/// The first policy sees the full expense; each following policy sees only what the
/// insured still owes after the previous one. Stops once nothing is owed.
pub fn apply_to_policies(
    expense_amount: f64,
    policies: &[insurance_policy::Model],
    order: PolicyOrder,
    today: NaiveDate,
) -> Result<CoordinatedCoverage> {
    if !expense_amount.is_finite() || expense_amount < 0.0 {
        return Err(Error::finance(format!(
            "expense amount must be a non-negative number, got {expense_amount}"
        )));
    }

    let mut active: Vec<insurance_policy::Model> = policies
        .iter()
        .filter(|p| p.is_active_on(today))
        .cloned()
        .collect();
    order.sort(&mut active);

    let mut remaining = expense_amount;
    let mut coverage = CoordinatedCoverage {
        out_of_pocket: expense_amount,
        ..CoordinatedCoverage::default()
    };
    for policy in &active {
        if remaining <= 0.0 {
            break;
        }
        let outcome = apply_insurance_coverage(remaining, policy)?;
        coverage.insurer_paid += outcome.insurer_paid;
        remaining = outcome.out_of_pocket;
        coverage.applications.push(outcome);
    }
    coverage.out_of_pocket = remaining;
    Ok(coverage)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::policy_record;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_claim() {
        let policy = policy_record(1, 500.0, 80.0, 2000.0);

        let outcome = apply_insurance_coverage(1200.0, &policy).unwrap();

        assert_eq!(outcome.toward_deductible, 500.0);
        assert_eq!(outcome.insurer_paid, 560.0);
        assert_eq!(outcome.out_of_pocket, 640.0);
        assert_eq!(outcome.updated_policy.deductible_met, 500.0);
        assert_eq!(outcome.updated_policy.out_of_pocket_current, 140.0);
        // input untouched
        assert_eq!(policy.deductible_met, 0.0);
    }

    #[test]
    fn test_expense_below_deductible_is_all_out_of_pocket() {
        let policy = policy_record(1, 500.0, 80.0, 2000.0);
        let outcome = apply_insurance_coverage(200.0, &policy).unwrap();
        assert_eq!(outcome.out_of_pocket, 200.0);
        assert_eq!(outcome.insurer_paid, 0.0);
        assert_eq!(outcome.updated_policy.deductible_met, 200.0);
        assert_eq!(outcome.updated_policy.out_of_pocket_current, 0.0);
    }

    #[test]
    fn test_out_of_pocket_cap_shifts_excess_to_insurer() {
        let mut policy = policy_record(1, 500.0, 50.0, 1000.0);
        policy.deductible_met = 500.0;
        policy.out_of_pocket_current = 900.0;

        let outcome = apply_insurance_coverage(1000.0, &policy).unwrap();

        // nominal insured share is 500, only 100 left under the cap
        assert_eq!(outcome.out_of_pocket, 100.0);
        assert_eq!(outcome.insurer_paid, 900.0);
        assert_eq!(outcome.updated_policy.out_of_pocket_current, 1000.0);

        let next = apply_insurance_coverage(400.0, &outcome.updated_policy).unwrap();
        assert_eq!(next.out_of_pocket, 0.0);
        assert_eq!(next.insurer_paid, 400.0);
    }

    #[test]
    fn test_conservation_and_counter_bounds_over_many_claims() {
        let mut policy = policy_record(1, 750.0, 70.0, 3000.0);
        for amount in [0.0, 120.0, 333.33, 980.5, 45.0, 2500.0, 10_000.0, 17.17, 640.0] {
            let outcome = apply_insurance_coverage(amount, &policy).unwrap();
            assert!((outcome.insurer_paid + outcome.out_of_pocket - amount).abs() < 1e-9);
            assert!(outcome.insurer_paid >= -1e-9);
            assert!(outcome.out_of_pocket >= 0.0);

            policy = outcome.updated_policy;
            assert!(policy.deductible_met >= 0.0 && policy.deductible_met <= policy.deductible);
            assert!(
                policy.out_of_pocket_current >= 0.0
                    && policy.out_of_pocket_current <= policy.out_of_pocket_max
            );
        }
        assert_eq!(policy.deductible_met, 750.0);
    }

    #[test]
    fn test_full_and_zero_coverage() {
        let full = policy_record(1, 0.0, 100.0, 1000.0);
        let outcome = apply_insurance_coverage(300.0, &full).unwrap();
        assert_eq!(outcome.insurer_paid, 300.0);
        assert_eq!(outcome.out_of_pocket, 0.0);

        let none = policy_record(2, 0.0, 0.0, 1000.0);
        let outcome = apply_insurance_coverage(300.0, &none).unwrap();
        assert_eq!(outcome.insurer_paid, 0.0);
        assert_eq!(outcome.out_of_pocket, 300.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let policy = policy_record(1, 500.0, 80.0, 2000.0);
        assert!(apply_insurance_coverage(-1.0, &policy).is_err());
        assert!(apply_insurance_coverage(f64::INFINITY, &policy).is_err());

        let broken = policy_record(1, 3000.0, 80.0, 2000.0);
        assert!(matches!(
            apply_insurance_coverage(100.0, &broken),
            Err(Error::InvalidFinanceData { .. })
        ));

        let mut overspent = policy_record(1, 500.0, 80.0, 2000.0);
        overspent.deductible_met = 600.0;
        assert!(apply_insurance_coverage(100.0, &overspent).is_err());
    }

    #[test]
    fn test_primary_policy_applied_first() {
        let mut secondary = policy_record(1, 0.0, 50.0, 5000.0);
        secondary.start_date = day(2023, 1, 1);
        let mut primary = policy_record(2, 500.0, 80.0, 2000.0);
        primary.is_primary = true;
        primary.start_date = day(2024, 1, 1);

        let coverage =
            apply_to_policies(1200.0, &[secondary, primary], PolicyOrder::PrimaryFirst, day(2024, 6, 1))
                .unwrap();

        assert_eq!(coverage.applications.len(), 2);
        assert_eq!(coverage.applications[0].updated_policy.id, 2);
        // primary leaves 640, secondary pays half of it
        assert_eq!(coverage.applications[1].insurer_paid, 320.0);
        assert_eq!(coverage.insurer_paid, 880.0);
        assert_eq!(coverage.out_of_pocket, 320.0);
    }

    #[test]
    fn test_order_variants() {
        let mut a = policy_record(1, 0.0, 60.0, 5000.0);
        a.start_date = day(2022, 1, 1);
        let mut b = policy_record(2, 0.0, 90.0, 5000.0);
        b.start_date = day(2023, 1, 1);
        let mut c = policy_record(3, 0.0, 90.0, 5000.0);
        c.start_date = day(2021, 1, 1);

        let mut by_start = vec![a.clone(), b.clone(), c.clone()];
        PolicyOrder::EarliestStart.sort(&mut by_start);
        let ids: Vec<i64> = by_start.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let mut by_coverage = vec![a, b, c];
        PolicyOrder::HighestCoverage.sort(&mut by_coverage);
        let ids: Vec<i64> = by_coverage.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_inactive_or_expired_policies_skipped() {
        let mut expired = policy_record(1, 0.0, 100.0, 1000.0);
        expired.end_date = Some(day(2023, 12, 31));
        let mut switched_off = policy_record(2, 0.0, 100.0, 1000.0);
        switched_off.is_active = false;

        let coverage = apply_to_policies(
            250.0,
            &[expired, switched_off],
            PolicyOrder::default(),
            day(2024, 3, 1),
        )
        .unwrap();

        assert!(coverage.applications.is_empty());
        assert_eq!(coverage.insurer_paid, 0.0);
        assert_eq!(coverage.out_of_pocket, 250.0);
    }

    #[test]
    fn test_chain_conserves_amount() {
        let policies = vec![
            policy_record(1, 250.0, 75.0, 1500.0),
            policy_record(2, 100.0, 60.0, 800.0),
            policy_record(3, 0.0, 20.0, 400.0),
        ];
        for amount in [10.0, 260.0, 999.99, 4321.0] {
            let coverage =
                apply_to_policies(amount, &policies, PolicyOrder::EarliestStart, day(2024, 6, 1))
                    .unwrap();
            assert!((coverage.insurer_paid + coverage.out_of_pocket - amount).abs() < 1e-9);
        }
    }
}
