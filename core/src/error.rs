use crate::types::Month;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Demand history row for month {month} already written")]
    HistoryOverwrite { month: Month },

    #[error("Hiring batch for month {month} already scheduled")]
    PipelineConflict { month: Month },

    #[error("Invalid month: expected {expected}, got {actual}")]
    MonthMismatch { expected: Month, actual: Month },

    #[error("Month {month} is beyond the {horizon}-month horizon")]
    HorizonExceeded { month: Month, horizon: Month },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn config(field: &str, reason: impl Into<String>) -> Self {
        Self::Config { field: field.to_string(), reason: reason.into() }
    }

    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema(reason.into())
    }
}

pub type SimResult<T> = Result<T, SimError>;
