//! Unified error type for the assessment engine and its record-keeping layer.

use thiserror::Error;

/// All failures the crate can report to its caller.
///
/// Calculators either succeed completely or return one of these; nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum Error {
    /// A frequency string that is not one of the supported cadences
    #[error("Unrecognized frequency: '{value}'")]
    UnrecognizedFrequency {
        /// The offending value as recorded
        value: String,
    },

    /// A malformed or contradictory financial record reached the engine
    #[error("Invalid finance data: {message}")]
    InvalidFinanceData {
        /// What was wrong with the record
        message: String,
    },

    /// A malformed health profile or condition reached the engine
    #[error("Invalid health data: {message}")]
    InvalidHealthData {
        /// What was wrong with the record
        message: String,
    },

    /// Policy counters changed between read and write-back
    #[error("Insurance policy {policy_id} was updated concurrently")]
    ConcurrentUpdateConflict {
        /// The policy whose version check failed
        policy_id: i64,
    },

    #[error("No health profile for user '{user_id}'")]
    #[allow(missing_docs)]
    ProfileNotFound { user_id: String },

    #[error("User '{user_id}' already has a health profile")]
    #[allow(missing_docs)]
    ProfileExists { user_id: String },

    #[error("Insurance policy not found: {policy_id}")]
    #[allow(missing_docs)]
    PolicyNotFound { policy_id: i64 },

    #[error("Insurance policy number already registered: {policy_number}")]
    #[allow(missing_docs)]
    PolicyExists { policy_number: String },

    /// An income, expense, loan or condition id that does not exist
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// Which record type was looked up
        kind: &'static str,
        /// The id that was requested
        id: i64,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Database error surfaced by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn finance(message: impl Into<String>) -> Self {
        Self::InvalidFinanceData {
            message: message.into(),
        }
    }

    pub(crate) fn health(message: impl Into<String>) -> Self {
        Self::InvalidHealthData {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
