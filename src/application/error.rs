//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add budget and config concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{what} of {requested} exceeds the configured limit of {limit}")]
    BudgetExceeded {
        what: &'static str,
        requested: String,
        limit: usize,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn budget(what: &'static str, requested: impl ToString, limit: usize) -> Self {
        Self::BudgetExceeded {
            what,
            requested: requested.to_string(),
            limit,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
