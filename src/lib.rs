//! coursedraft: the course-authoring core of a learning-management system
//!
//! Layers:
//! - `domain`: draft tree, validation, grading (no I/O)
//! - `application`: documents, payloads, authoring service
//! - `infrastructure`: course store port and DI container
//! - `cli`: the `coursedraft` binary

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
