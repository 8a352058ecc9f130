use thiserror::Error;

use crate::import::mapping::TargetField;

/// Errors surfaced by the import pipeline. Per-row validation failures are
/// not errors; they are collected as data and shown with the session.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Malformed CSV input: {0}")]
    MalformedInput(String),

    #[error("Required fields not mapped: {}", format_fields(.0))]
    MissingRequiredMapping(Vec<TargetField>),

    #[error("Unknown source column: {0}")]
    UnknownColumn(String),

    #[error("No accounts available to import into. Create an account first.")]
    NoAccountsAvailable,

    #[error("No valid trades to import")]
    NothingToImport,

    #[error("Account store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Import commit failed: {0}")]
    CommitFailure(String),

    #[error("Action not available in the {actual} step (requires {expected})")]
    InvalidStep {
        expected: &'static str,
        actual: &'static str,
    },
}

fn format_fields(fields: &[TargetField]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from the account store collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No account collection for user {0}")]
    NotFound(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
