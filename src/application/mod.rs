//! Application layer: documents, payloads and the authoring service
//!
//! This layer orchestrates domain logic and talks to collaborators through ports.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod payload;
pub mod services;

pub use document::{DocumentFormat, DraftDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{DocumentResultExt, IoResultExt};
pub use payload::{CoursePayload, CourseStatus, PendingUpload, Submission, Submitter};
