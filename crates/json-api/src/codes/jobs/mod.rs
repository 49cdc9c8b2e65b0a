//! Generation Jobs

mod handlers;

pub(crate) use handlers::*;
