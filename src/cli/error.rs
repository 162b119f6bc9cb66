//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(InfraError::Application(app)) => match app {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::NoActiveCase | ApplicationError::LoadFailed { .. } => {
                    crate::exitcode::NOINPUT
                }
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let domain: CliError = ApplicationError::from(DomainError::InvalidHorizon(0)).into();
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);

        let missing: CliError = ApplicationError::NoActiveCase.into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let usage = CliError::Usage("no command".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);
    }
}
