//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::BudgetExceeded { .. } => crate::exitcode::USAGE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(d) => match d {
                    DomainError::InvalidInput { .. } => crate::exitcode::USAGE,
                    DomainError::DegenerateFraction { .. } => crate::exitcode::DATAERR,
                    DomainError::ArithmeticInvariantViolated { .. }
                    | DomainError::Overflow { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::InvalidArgs("x".into()), crate::exitcode::USAGE)]
    #[case(DomainError::invalid_input("n").into(), crate::exitcode::USAGE)]
    #[case(DomainError::invariant("d").into(), crate::exitcode::SOFTWARE)]
    #[case(DomainError::overflow("m").into(), crate::exitcode::SOFTWARE)]
    #[case(
        DomainError::DegenerateFraction { numerator: 1, denominator: 0 }.into(),
        crate::exitcode::DATAERR
    )]
    #[case(
        ApplicationError::Config { message: "bad".into() }.into(),
        crate::exitcode::CONFIG
    )]
    #[case(
        CliError::io("write", std::io::Error::new(std::io::ErrorKind::Other, "disk")),
        crate::exitcode::IOERR
    )]
    fn test_exit_code(#[case] err: CliError, #[case] expected: i32) {
        assert_eq!(err.exit_code(), expected);
    }
}
