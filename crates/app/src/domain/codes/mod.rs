//! Codes

pub mod data;
pub mod errors;
pub(crate) mod generator;
pub mod records;
mod repositories;
pub mod service;

pub use errors::CodesServiceError;
pub(crate) use repositories::{codes::PgCodesRepository, jobs::PgJobsRepository};
pub use service::*;
