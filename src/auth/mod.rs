//! # Shopfront Auth Module
//!
//! Password hashing, JWT issuance, the identity gate that verifies bearer
//! credentials, and the ownership check applied to customer resources.

pub mod crypto;
pub mod errors;
pub mod identity;
pub mod jwt;
pub mod ownership;

pub use errors::{AuthError, AuthResult};
pub use identity::{Identity, IdentityGate};
pub use jwt::{JwtClaims, JwtConfig, JwtManager, TokenResponse};
pub use ownership::authorize_owner;
