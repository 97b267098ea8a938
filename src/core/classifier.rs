//! Financial health classification.
//!
//! Maps the aggregate ratios produced by the finance aggregator onto a four-step tier.
//! Rules are evaluated in order and the first match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// DTI below this, together with a healthy savings rate, is Excellent.
pub const EXCELLENT_DTI_LIMIT: f64 = 0.28;
/// Savings rate required for Excellent.
pub const EXCELLENT_SAVINGS_RATE: f64 = 0.20;
/// DTI below this is Good.
pub const GOOD_DTI_LIMIT: f64 = 0.36;
/// DTI below this is Fair.
pub const FAIR_DTI_LIMIT: f64 = 0.50;

/// Overall financial health tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialHealth {
    /// Low debt load and strong savings
    Excellent,
    /// Manageable debt load
    Good,
    /// Debt load approaching the danger zone
    Fair,
    /// Spending more than earned, or debt load too high
    Poor,
}

impl FinancialHealth {
    /// Lowercase label for logs and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for FinancialHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a user's finances.
///
/// An unbounded DTI (no income) is `f64::INFINITY` and fails every DTI check, so it
/// lands on Poor. NaN is treated the same way.
#[must_use]
pub fn classify(disposable_income: f64, debt_to_income: f64, savings_rate: f64) -> FinancialHealth {
    if disposable_income < 0.0 {
        return FinancialHealth::Poor;
    }
    if debt_to_income < EXCELLENT_DTI_LIMIT && savings_rate >= EXCELLENT_SAVINGS_RATE {
        FinancialHealth::Excellent
    } else if debt_to_income < GOOD_DTI_LIMIT {
        FinancialHealth::Good
    } else if debt_to_income < FAIR_DTI_LIMIT {
        FinancialHealth::Fair
    } else {
        FinancialHealth::Poor
    }
}
