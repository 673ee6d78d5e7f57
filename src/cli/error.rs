//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, NodeKind};
use crate::exitcode;
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

    #[error("draft has {0} violation(s)")]
    Violations(usize),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Violations(_) => exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(DomainError::NotFound { kind, .. }) if *kind != NodeKind::File => {
            exitcode::NOINPUT
        }
        ApplicationError::Domain(DomainError::InvalidPath(_)) => exitcode::USAGE,
        ApplicationError::Domain(_) => exitcode::DATAERR,
        ApplicationError::Validation(_) => exitcode::DATAERR,
        ApplicationError::Collaborator { not_found: true, .. } => exitcode::NOINPUT,
        ApplicationError::Collaborator { .. } => exitcode::UNAVAILABLE,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::Document { .. } => exitcode::DATAERR,
        ApplicationError::OperationFailed { .. } => exitcode::IOERR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainError::InvalidPath("x".into()), exitcode::USAGE)]
    #[case(DomainError::NotFound { kind: NodeKind::Module, id: "m".into() }, exitcode::NOINPUT)]
    #[case(DomainError::OptionLimit { question: "q".into(), count: 5 }, exitcode::DATAERR)]
    fn given_domain_error_when_mapping_then_sysexits_code(
        #[case] error: DomainError,
        #[case] expected: i32,
    ) {
        assert_eq!(CliError::from(error).exit_code(), expected);
    }

    #[test]
    fn given_collaborator_failure_when_mapping_then_unavailable() {
        let err = CliError::from(ApplicationError::Collaborator {
            message: "down".into(),
            not_found: false,
        });
        assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    }
}
