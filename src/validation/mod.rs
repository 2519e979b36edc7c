//! # Request Validation
//!
//! Declarative field rules, the schema evaluator that aggregates them, and
//! the schemas for each customer endpoint.

pub mod customer;
pub mod rule;
pub mod schema;

pub use rule::{Check, Constraint, FieldRule, Normalizer, Presence};
pub use schema::{FieldErrors, NormalizedPayload, Payload, Schema, SchemaResult};
