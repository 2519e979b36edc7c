//! shopfront - customer account REST API
//!
//! Requests pass a gate before reaching any handler logic: declarative
//! schema validation, then bearer-token authentication, then an ownership
//! check on the customer id in the path.

pub mod auth;
pub mod cli;
pub mod customer;
pub mod error;
pub mod http_server;
pub mod logging;
pub mod validation;

use std::sync::Arc;

use axum::Router;

/// Build the full application router over `store`
pub fn app(config: http_server::ServerConfig, store: Arc<dyn customer::CustomerStore>) -> Router {
    http_server::HttpServer::with_store(config, store).router()
}
