//! Code Repositories

pub(crate) mod codes;
pub(crate) mod jobs;
