//! Core infrastructure shared across the pipeline
//!
//! Input record types, error types, and logging setup.

pub mod error;
pub mod logging;
pub mod types;

pub use error::GenogramError;
pub use types::{Gender, Person, PersonId};
