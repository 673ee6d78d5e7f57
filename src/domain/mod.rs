//! Domain layer: the course draft tree and its rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod draft;
pub mod entities;
pub mod error;
pub mod files;
pub mod grading;
pub mod ids;
pub mod path;
pub mod validation;

pub use arena::{DraftArena, DraftNode, NodePayload};
pub use draft::{CourseDraftTree, Edit, EditOutcome};
pub use entities::*;
pub use error::{DomainError, DomainResult, NodeKind};
pub use files::{
    format_file_size, BinaryHandle, FileBatchReport, FileDescriptor, FilePolicy, FileRejection,
    MediaType, RejectionReason, MAX_FILE_SIZE,
};
pub use grading::{AttemptStats, GradeReport, QuizResponse};
pub use ids::{IdGenerator, IdPolicy, NodeId, SequentialIds, UuidGenerator};
pub use path::{CourseField, FieldPath, FieldValue, LessonField, ModuleField, QuestionField};
pub use validation::{validate, validate_at, Violation};
