//! # Customers
//!
//! Customer records, the persistence collaborator and the account operations
//! behind the HTTP endpoints.

pub mod model;
pub mod service;
pub mod store;

pub use model::{Customer, CustomerProfile};
pub use service::CustomerService;
pub use store::{CustomerStore, InMemoryCustomerStore, StoreError, UniqueField};
