//! Codes

pub(crate) mod errors;
mod handlers;
pub(crate) mod jobs;
pub(crate) mod responses;

pub(crate) use handlers::*;
