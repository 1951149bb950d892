mod config;
mod error;
mod handlers;
mod page;
mod routes;
#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use handlers::run_web_server;
