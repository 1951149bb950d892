mod axum_helpers;
mod test_env;

pub(crate) use axum_helpers::{AxumResponseTestExt, AxumRouterTestExt};
pub(crate) use test_env::TestEnvironment;
