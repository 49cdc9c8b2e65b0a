//! Redemptions

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::RedemptionsServiceError;
pub(crate) use repository::PgRedemptionsRepository;
pub use service::*;
