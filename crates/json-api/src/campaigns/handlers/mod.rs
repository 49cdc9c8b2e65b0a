//! Campaign Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod live;
pub(crate) mod stats;
pub(crate) mod transitions;
pub(crate) mod update;
