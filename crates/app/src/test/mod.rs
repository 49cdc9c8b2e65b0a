//! Test Infrastructure

pub(crate) mod context;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
