//! Flag Service Library

pub mod config;
pub mod flags;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServiceConfig;
pub use flags::{FlagStore, SqliteFlagStore};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
