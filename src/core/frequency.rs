//! Frequency normalization.
//!
//! Every amount in the system is recorded at some cadence; all aggregate figures are
//! expressed per month. This module owns the single conversion table between the two.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Average number of weeks in a month used for weekly amounts.
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Days counted per month for daily amounts.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// How often an amount recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Every day
    Daily,
    /// Every week
    Weekly,
    /// Every month
    Monthly,
    /// Every three months
    Quarterly,
    /// Every six months
    Semiannual,
    /// Once a year
    Annual,
    /// A single point event that never recurs
    OneTime,
}

impl Frequency {
    /// All supported cadences, in ascending period length (one-time last).
    pub const ALL: [Self; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Semiannual,
        Self::Annual,
        Self::OneTime,
    ];

    /// Multiplier that turns one occurrence into its monthly equivalent.
    ///
    /// One-time amounts have no recurring monthly share, so their factor is zero.
    #[must_use]
    pub const fn monthly_factor(self) -> f64 {
        match self {
            Self::Daily => DAYS_PER_MONTH,
            Self::Weekly => WEEKS_PER_MONTH,
            Self::Monthly => 1.0,
            Self::Quarterly => 1.0 / 3.0,
            Self::Semiannual => 1.0 / 6.0,
            Self::Annual => 1.0 / 12.0,
            Self::OneTime => 0.0,
        }
    }

    /// Whether the amount contributes to recurring monthly totals.
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Canonical lowercase spelling, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semiannual => "semiannual",
            Self::Annual => "annual",
            Self::OneTime => "one-time",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "semiannual" | "semi-annual" | "semi_annual" => Ok(Self::Semiannual),
            "annual" | "yearly" => Ok(Self::Annual),
            "one-time" | "one_time" | "onetime" | "once" => Ok(Self::OneTime),
            _ => Err(Error::UnrecognizedFrequency {
                value: s.to_string(),
            }),
        }
    }
}

/// Converts an amount recorded at `frequency` into its monthly equivalent.
///
/// No rounding is applied; presentation layers round if they need to.
#[must_use]
pub fn normalize(amount: f64, frequency: Frequency) -> f64 {
    amount * frequency.monthly_factor()
}

/// Parses a stored frequency string and normalizes `amount` against it.
pub fn normalize_str(amount: f64, frequency: &str) -> Result<f64> {
    Ok(normalize(amount, frequency.parse()?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_conversion_table() {
        assert_eq!(normalize(10.0, Frequency::Daily), 300.0);
        assert!((normalize(100.0, Frequency::Weekly) - 433.0).abs() < 1e-9);
        assert_eq!(normalize(1234.56, Frequency::Monthly), 1234.56);
        assert!((normalize(300.0, Frequency::Quarterly) - 100.0).abs() < 1e-9);
        assert!((normalize(600.0, Frequency::Semiannual) - 100.0).abs() < 1e-9);
        assert!((normalize(1200.0, Frequency::Annual) - 100.0).abs() < 1e-9);
        assert_eq!(normalize(5000.0, Frequency::OneTime), 0.0);
    }

    #[test]
    fn test_monthly_is_identity() {
        for amount in [0.0, 0.01, 1.0, 8000.0, 1e15] {
            assert_eq!(normalize(amount, Frequency::Monthly), amount);
        }
    }

    #[test]
    fn test_non_negative_for_non_negative_amounts() {
        for frequency in Frequency::ALL {
            for amount in [0.0, 0.5, 42.0, 1e12, f64::MAX / 100.0] {
                let monthly = normalize(amount, frequency);
                assert!(monthly >= 0.0, "{frequency} produced {monthly}");
                assert!(monthly.is_finite());
            }
        }
    }

    #[test]
    fn test_zero_amount() {
        for frequency in Frequency::ALL {
            assert_eq!(normalize(0.0, frequency), 0.0);
        }
    }

    #[test]
    fn test_parse_accepts_aliases_and_case() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!(" annual ".parse::<Frequency>().unwrap(), Frequency::Annual);
        assert_eq!("yearly".parse::<Frequency>().unwrap(), Frequency::Annual);
        assert_eq!(
            "semi-annual".parse::<Frequency>().unwrap(),
            Frequency::Semiannual
        );
        assert_eq!("one_time".parse::<Frequency>().unwrap(), Frequency::OneTime);
    }

    #[test]
    fn test_parse_round_trips_canonical_names() {
        for frequency in Frequency::ALL {
            assert_eq!(frequency.as_str().parse::<Frequency>().unwrap(), frequency);
        }
    }

    #[test]
    fn test_unknown_frequency_rejected() {
        let err = normalize_str(10.0, "fortnightly").unwrap_err();
        assert!(matches!(
            err,
            Error::UnrecognizedFrequency { ref value } if value == "fortnightly"
        ));
    }
}
