//! # JWT Token Management
//!
//! JSON Web Token issuance and validation.
//!
//! ## Invariants
//! - Stateless validation (no store lookup)
//! - Tokens expire one day after issuance by default
//! - No secrets in token (customer id and email only)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// JWT claims for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (customer id as a string)
    pub sub: String,

    /// Customer id
    pub customer_id: i64,

    /// Customer's email
    pub email: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,

    /// Access token lifetime
    pub access_token_ttl: Duration,

    /// Issuer identifier
    pub issuer: String,

    /// Audience identifier
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string(),
            access_token_ttl: Duration::days(1),
            issuer: "shopfront".to_string(),
            audience: "shopfront".to_string(),
        }
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate an access token for a customer
    pub fn generate_access_token(&self, customer_id: i64, email: &str) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.config.access_token_ttl)
            .ok_or(AuthError::TokenGenerationFailed)?;

        let claims = JwtClaims {
            sub: customer_id.to_string(),
            customer_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate an access token and extract claims
    pub fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Lifetime of newly issued tokens, in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.config.access_token_ttl.num_seconds()
    }
}

/// Token fields returned alongside the customer on register/login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// `Bearer <jwt>`, ready to be sent back in the Authorization header
    #[serde(rename = "accessToken")]
    pub access_token: String,

    /// Lifetime in seconds
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            access_token: format!("Bearer {}", token),
            expires_in,
        }
    }
}
