//! # HTTP Server Module
//!
//! Axum server for the customer account API.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /customers` - Register
//! - `POST /customers/login` - Log in
//! - `GET /customers/:customer_id` - Own profile
//! - `PUT /customers/:customer_id` - Update profile
//! - `PUT /customers/address/:customer_id` - Update address
//! - `PUT /customers/creditCard/:customer_id` - Update credit card

pub mod config;
pub mod customer_routes;
pub mod gate;
pub mod health_routes;
pub mod response;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use gate::RequestGate;
pub use server::HttpServer;
