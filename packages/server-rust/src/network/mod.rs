//! HTTP surface of the placement server: configuration, middleware,
//! handlers, error mapping, and the server lifecycle.

pub mod config;
pub mod error;
pub mod handlers;
pub mod instrument;
pub mod middleware;
pub mod module;

pub use config::*;
pub use error::ApiError;
pub use handlers::AppState;
pub use module::NetworkModule;
