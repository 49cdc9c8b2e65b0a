//! Code Handlers

pub(crate) mod assign;
pub(crate) mod create;
pub(crate) mod deactivate;
pub(crate) mod export;
pub(crate) mod generate;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod reactivate;
