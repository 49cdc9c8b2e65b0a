//! Validation Handlers

pub(crate) mod validate;
