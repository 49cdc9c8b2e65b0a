//! Campaigns

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::CampaignsServiceError;
pub(crate) use repository::PgCampaignsRepository;
pub use service::*;
