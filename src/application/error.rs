//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::domain::{DomainError, Violation};
use crate::infrastructure::traits::PortError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("draft has {} violation(s):\n{}", .0.len(), .0.iter().join("\n"))]
    Validation(Vec<Violation>),

    #[error("course store failed: {message}")]
    Collaborator { message: String, not_found: bool },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid draft document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<PortError> for ApplicationError {
    fn from(e: PortError) -> Self {
        Self::Collaborator {
            not_found: matches!(e, PortError::NotFound(_)),
            message: e.to_string(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
