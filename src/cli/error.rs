//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{Failure, Message};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => application_exit_code(e),
            CliError::Infra(e) => match e {
                InfraError::Application(e) => application_exit_code(e),
                InfraError::UnknownBean(_)
                | InfraError::UnknownFactory { .. }
                | InfraError::BeanConstruction { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
        ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
    }
}

/// Built-in tool errors are user-correctable: shown as is, exit code kept.
impl From<CliError> for Failure {
    #[track_caller]
    fn from(e: CliError) -> Self {
        let text = e.to_string();
        Failure::client(text.clone(), Message::Literal(text), e.exit_code())
    }
}
