//! Validation

pub mod checks;
pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use checks::{Quote, Rejection, ValidationOutcome};
pub use errors::ValidationServiceError;
pub(crate) use repository::PgValidationRepository;
pub use service::*;
