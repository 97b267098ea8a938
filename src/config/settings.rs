//! Engine settings loaded from config.toml
//!
//! Only the tunables that the calculators genuinely need live here; the formulas
//! themselves are fixed. A missing file yields the defaults, a malformed one is an error.

use crate::{
    core::insurance::PolicyOrder,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Assessment tunables
    #[serde(default)]
    pub assessment: AssessmentSettings,
}

/// Tunables for the assessment engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssessmentSettings {
    /// Medical expenses above this amount are considered for cost reduction
    pub cost_reduction_threshold: f64,
    /// Expenses whose insurer-paid share is below this ratio count as poorly covered
    pub low_coverage_ratio: f64,
    /// Order in which several active policies are applied to one expense
    pub policy_order: PolicyOrder,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            cost_reduction_threshold: 100.0,
            low_coverage_ratio: 0.5,
            policy_order: PolicyOrder::PrimaryFirst,
        }
    }
}

impl AssessmentSettings {
    fn validate(&self) -> Result<()> {
        if !self.cost_reduction_threshold.is_finite() || self.cost_reduction_threshold < 0.0 {
            return Err(Error::Config {
                message: format!(
                    "cost_reduction_threshold must be non-negative, got {}",
                    self.cost_reduction_threshold
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.low_coverage_ratio) {
            return Err(Error::Config {
                message: format!(
                    "low_coverage_ratio must be between 0 and 1, got {}",
                    self.low_coverage_ratio
                ),
            });
        }
        Ok(())
    }
}

/// Parses and validates configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.assessment.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A tunable is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from the default location (./config.toml), falling back to
/// defaults when the file does not exist.
pub fn load_default_config() -> Result<Config> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using default assessment settings");
        return Ok(Config::default());
    }
    load_config(path)
}
