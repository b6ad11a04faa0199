//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::Failure;

/// Infrastructure errors wrap application errors and add container-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("unknown bean: {0}")]
    UnknownBean(String),

    #[error("bean '{bean}' refers to unregistered factory '{factory}'")]
    UnknownFactory { bean: String, factory: String },

    #[error("bean '{bean}' could not be built")]
    BeanConstruction {
        bean: String,
        #[source]
        source: Failure,
    },
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

impl From<InfraError> for Failure {
    #[track_caller]
    fn from(e: InfraError) -> Self {
        Failure::from_error(&e)
    }
}
