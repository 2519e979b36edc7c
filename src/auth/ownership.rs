//! # Ownership Authorizer
//!
//! A caller may only act on their own customer record. The check fails
//! closed: an id that does not parse is treated as someone else's.

use super::errors::{AuthError, AuthResult};
use super::identity::Identity;

/// Whether `identity` owns the resource named by `resource_id`
pub fn is_owner(identity: &Identity, resource_id: &str) -> bool {
    resource_id
        .trim()
        .parse::<i64>()
        .map(|id| id == identity.customer_id)
        .unwrap_or(false)
}

/// Grant access to the caller's own record, returning its id
pub fn authorize_owner(identity: &Identity, resource_id: &str) -> AuthResult<i64> {
    if is_owner(identity, resource_id) {
        Ok(identity.customer_id)
    } else {
        tracing::warn!(
            customer_id = identity.customer_id,
            resource_id,
            "ownership check denied"
        );
        Err(AuthError::Forbidden)
    }
}
