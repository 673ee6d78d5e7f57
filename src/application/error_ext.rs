//! Error conversion helpers for document I/O
//!
//! Provides extension traits for attaching the offending path to errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(path)
    ///     .with_path_context("read draft", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Same as [`IoResultExt`] for (de)serialization failures, which are reported
/// as a malformed document rather than an I/O problem.
pub trait DocumentResultExt<T> {
    fn with_document_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T, E: std::fmt::Display> DocumentResultExt<T> for Result<T, E> {
    fn with_document_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Document {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
