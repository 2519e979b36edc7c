//! # API Errors
//!
//! Every failure a customer endpoint can return, mapped to its HTTP status
//! and JSON body. Unexpected failures are logged here and surface as a
//! generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::customer::store::{StoreError, UniqueField};
use crate::validation::FieldErrors;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// One or more fields failed validation
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Request body is not a JSON object
    #[error("{0}")]
    BadRequest(String),

    /// Unique field already taken
    #[error("{0}")]
    Conflict(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Auth Errors
    // ==================
    /// Authentication (401) or ownership (403) failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Unexpected failure; the detail is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(auth_err) => StatusCode::from_u16(auth_err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found() -> Self {
        ApiError::NotFound("Customer not found".to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(UniqueField::Email) => {
                ApiError::Conflict("Email already exists".to_string())
            }
            StoreError::Duplicate(UniqueField::ShippingRegionId) => {
                ApiError::Conflict("Shipping Id already exists".to_string())
            }
            StoreError::NotFound(_) => ApiError::not_found(),
            StoreError::Unavailable(detail) => ApiError::Internal(detail),
        }
    }
}

/// `error` member of the response body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Message(String),
    Fields(FieldErrors),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: ErrorBody,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        let error = match err {
            ApiError::Validation(fields) => ErrorBody::Fields(fields),
            _ if status.is_server_error() => ErrorBody::Message("Internal server error".to_string()),
            other => ErrorBody::Message(other.to_string()),
        };

        Self {
            status: status.as_u16(),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(FieldErrors::single("name", "name is required")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("Customer already exists".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_propagation() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::from(AuthError::Forbidden).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(AuthError::HashingFailed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_mapping() {
        assert!(matches!(
            ApiError::from(StoreError::Duplicate(UniqueField::Email)),
            ApiError::Conflict(m) if m == "Email already exists"
        ));
        assert!(matches!(
            ApiError::from(StoreError::Duplicate(UniqueField::ShippingRegionId)),
            ApiError::Conflict(m) if m == "Shipping Id already exists"
        ));
        assert!(matches!(ApiError::from(StoreError::NotFound(9)), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from(StoreError::Unavailable("down".to_string())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_validation_body_is_field_map() {
        let mut fields = FieldErrors::new();
        fields.insert("name", "name is required");
        fields.insert("email", "Email address is required");

        let body = serde_json::to_value(ErrorResponse::from(ApiError::Validation(fields))).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"]["name"], "name is required");
        assert_eq!(body["error"]["email"], "Email address is required");
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let body = serde_json::to_value(ErrorResponse::from(ApiError::Internal(
            "connection refused to db-1".to_string(),
        )))
        .unwrap();

        assert_eq!(body["status"], 500);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_auth_message_passes_through() {
        let body =
            serde_json::to_value(ErrorResponse::from(ApiError::from(AuthError::Forbidden))).unwrap();
        assert_eq!(body["status"], 403);
        assert_eq!(body["error"], "You are not authorized to perform this action");
    }
}
