//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the exact-arithmetic contracts.
/// Every failing operation returns one of these and no partial sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("arithmetic invariant violated: {message}")]
    ArithmeticInvariantViolated { message: String },

    #[error("degenerate fraction {numerator}/{denominator}: denominator is zero")]
    DegenerateFraction { numerator: i64, denominator: i64 },

    #[error("integer overflow while computing {context}")]
    Overflow { context: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::ArithmeticInvariantViolated {
            message: message.into(),
        }
    }

    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
