//! # Auth Errors
//!
//! Error types for credential issuance, the identity gate and the ownership
//! check.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================
    /// Unknown email or wrong password (one message for both)
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    /// No bearer credential on the request
    #[error("Authorization token is required")]
    MissingToken,

    /// Header or token could not be parsed
    #[error("Malformed token")]
    MalformedToken,

    /// Token lifetime elapsed
    #[error("Token expired")]
    TokenExpired,

    /// Token was not signed with our key
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Authorization Errors
    // ==================
    /// Identity does not own the requested resource
    #[error("You are not authorized to perform this action")]
    Forbidden,

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::MissingToken => 401,
            AuthError::MalformedToken => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,

            // 403 Forbidden
            AuthError::Forbidden => 403,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
        }
    }

    /// Returns whether this error was caused by the caller
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
