//! # Identity Gate
//!
//! Turns an `Authorization: Bearer <token>` header into a verified
//! [`Identity`]. The identity is an ordinary value handed to the next stage;
//! nothing is stashed in shared state.

use chrono::{DateTime, Utc};

use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtClaims, JwtManager};

/// The verified subject behind a bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Always >= 1
    pub customer_id: i64,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<JwtClaims> for Identity {
    type Error = AuthError;

    fn try_from(claims: JwtClaims) -> AuthResult<Self> {
        if claims.customer_id < 1 || claims.sub != claims.customer_id.to_string() {
            return Err(AuthError::MalformedToken);
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(AuthError::MalformedToken)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?;

        Ok(Self {
            customer_id: claims.customer_id,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }
}

/// Verifies bearer credentials
#[derive(Clone)]
pub struct IdentityGate {
    jwt: JwtManager,
}

impl IdentityGate {
    pub fn new(jwt: JwtManager) -> Self {
        Self { jwt }
    }

    /// Authenticate the raw value of an `Authorization` header
    pub fn authenticate(&self, authorization: Option<&str>) -> AuthResult<Identity> {
        let header = authorization
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let token = bearer_token(header).ok_or(AuthError::MalformedToken)?;
        let claims = self.jwt.validate_token(token)?;
        Identity::try_from(claims)
    }
}

/// Extract the token from `Bearer <token>`; the scheme is case-insensitive
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token)
}
