//! Error types for the FinTrack core.
//!
//! Every repository and report operation returns [`FinanceResult`]; the menu
//! and binary layers wrap these in `anyhow` for presentation.

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum FinanceError {
    /// The backing store could not be opened, configured or closed
    #[error("Connection error: {0}")]
    Connection(String),

    /// An existing table conflicts with the expected layout
    #[error("Schema error: {0}")]
    Schema(String),

    /// Malformed amount, date, month, or an empty required field
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    /// A unit of work failed to apply, commit or roll back
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Malformed or non read-only query
    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl FinanceError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn expense_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            id,
        }
    }

    pub(crate) fn category_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Category",
            id,
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Query(err.to_string())
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<csv::Error> for FinanceError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub(crate) type FinanceResult<T> = Result<T, FinanceError>;
