//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::entities::{MAX_OPTIONS, MIN_OPTIONS};
use crate::domain::ids::NodeId;

/// Kind of node an id is expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Lesson,
    Question,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Module => "module",
            NodeKind::Lesson => "lesson",
            NodeKind::Question => "question",
            NodeKind::File => "file",
        };
        f.write_str(name)
    }
}

/// Domain errors represent rejected edits.
/// A rejected edit never leaves a partially modified tree behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: NodeId },

    #[error("duplicate id: {0}")]
    DuplicateId(NodeId),

    #[error(
        "question {question} has {count} options; multiple choice allows {}..={}",
        MIN_OPTIONS,
        MAX_OPTIONS
    )]
    OptionLimit { question: NodeId, count: usize },

    #[error("option index {index} out of range for question {question} ({count} options)")]
    OptionIndex {
        question: NodeId,
        index: usize,
        count: usize,
    },

    #[error("question {0} is true/false and holds no options")]
    OptionsUnsupported(NodeId),

    #[error("field {path} expects {expected}, got {actual}")]
    FieldType {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid field path: {0}")]
    InvalidPath(String),

    #[error("invalid value for {path}: {message}")]
    InvalidValue { path: String, message: String },

    #[error("assessment of module {0} has no questions")]
    EmptyAssessment(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
