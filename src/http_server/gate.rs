//! # Request Gate
//!
//! Admits a request to a customer handler. Stages run in a fixed order and
//! the first failing stage decides the response:
//!
//! 1. schema validation (400)
//! 2. bearer authentication (401)
//! 3. ownership of the `customer_id` in the path (403)
//!
//! A request with an invalid path id and no token is therefore a 400, and an
//! expired token on someone else's record is a 401.

use axum::body::Bytes;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde_json::Value;

use crate::auth::{authorize_owner, AuthError, Identity, IdentityGate};
use crate::error::{ApiError, ApiResult};
use crate::validation::{NormalizedPayload, Payload, Schema};

/// Request field that carries the path's resource id
pub const RESOURCE_ID_FIELD: &str = "customer_id";

/// A request that passed every stage
#[derive(Debug, Clone)]
pub struct Admitted {
    pub payload: NormalizedPayload,
    pub identity: Identity,
    /// Id of the record the caller was granted access to
    pub customer_id: i64,
}

/// Validation, authentication and ownership in one place
#[derive(Clone)]
pub struct RequestGate {
    identity: IdentityGate,
}

impl RequestGate {
    pub fn new(identity: IdentityGate) -> Self {
        Self { identity }
    }

    /// Validation only, for the public endpoints
    pub fn validate(&self, schema: &Schema, payload: &Payload) -> ApiResult<NormalizedPayload> {
        let result = schema.evaluate(payload);
        if !result.success() {
            tracing::debug!(
                schema = schema.name(),
                fields = result.errors().len(),
                "request rejected by validation"
            );
        }
        result.into_result().map_err(ApiError::Validation)
    }

    /// Run all three stages for an owner-only endpoint
    pub fn admit(
        &self,
        schema: &Schema,
        payload: &Payload,
        authorization: Option<&str>,
    ) -> ApiResult<Admitted> {
        let payload = self.validate(schema, payload)?;

        let identity = self.identity.authenticate(authorization).map_err(|e| {
            tracing::debug!(error = %e, "request rejected by authentication");
            e
        })?;

        let resource_id = payload
            .get(RESOURCE_ID_FIELD)
            .ok_or(AuthError::Forbidden)?;
        let customer_id = authorize_owner(&identity, resource_id)?;

        Ok(Admitted {
            payload,
            identity,
            customer_id,
        })
    }
}

/// Decode a request body into a field map
///
/// An empty body is an empty map so that every required field gets its own
/// message.
pub fn parse_body(body: &Bytes) -> ApiResult<Payload> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(_) => Err(ApiError::BadRequest("Malformed JSON body".to_string())),
    }
}

/// Decode a body and merge in the path's customer id
///
/// The path wins over a `customer_id` sent in the body.
pub fn payload_with_resource_id(body: &Bytes, customer_id: String) -> ApiResult<Payload> {
    let mut payload = parse_body(body)?;
    payload.insert(RESOURCE_ID_FIELD.to_string(), Value::String(customer_id));
    Ok(payload)
}

/// Raw `Authorization` header, if it is valid text
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}
