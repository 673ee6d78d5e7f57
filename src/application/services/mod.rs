//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the collaborator port (`CourseStore`) but are themselves
//! concrete structs, not traits.

mod authoring;

pub use authoring::{AuthoringService, SubmitOutcome};
