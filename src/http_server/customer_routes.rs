//! Customer HTTP Routes
//!
//! Every handler takes the raw body so the request gate decides between
//! 400, 401 and 403 before any business logic runs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::{IdentityGate, JwtManager};
use crate::customer::model::{
    LoginCustomer, RegisterCustomer, UpdateAddress, UpdateCreditCard, UpdateProfile,
};
use crate::customer::{CustomerProfile, CustomerService, CustomerStore};
use crate::error::{ApiError, ApiResult};
use crate::validation::{customer as schemas, NormalizedPayload};

use super::gate::{authorization_header, parse_body, payload_with_resource_id, RequestGate};
use super::response::{AuthenticatedCustomer, SingleResponse, UpdateResponse};

/// Shared customer state
pub struct CustomerState {
    pub service: CustomerService,
    pub gate: RequestGate,
}

impl CustomerState {
    pub fn new(store: Arc<dyn CustomerStore>, jwt_manager: JwtManager) -> Self {
        Self {
            service: CustomerService::new(store, jwt_manager.clone()),
            gate: RequestGate::new(IdentityGate::new(jwt_manager)),
        }
    }
}

/// Customer routes with shared state
pub fn customer_routes(state: Arc<CustomerState>) -> Router {
    Router::new()
        .route("/", post(register_handler))
        .route("/login", post(login_handler))
        .route("/:customer_id", get(get_customer_handler).put(update_profile_handler))
        .route("/address/:customer_id", put(update_address_handler))
        .route("/creditCard/:customer_id", put(update_credit_card_handler))
        .with_state(state)
}

type Registered = (StatusCode, Json<SingleResponse<AuthenticatedCustomer>>);
type Updated = Json<UpdateResponse<CustomerProfile>>;

fn typed<T: serde::de::DeserializeOwned>(payload: &NormalizedPayload) -> ApiResult<T> {
    payload
        .deserialize()
        .map_err(|e| ApiError::Internal(format!("validated payload did not decode: {}", e)))
}

// ==================
// Handlers
// ==================

/// POST /customers
async fn register_handler(
    State(state): State<Arc<CustomerState>>,
    body: Bytes,
) -> ApiResult<Registered> {
    let payload = parse_body(&body)?;
    let payload = state.gate.validate(schemas::create_customer(), &payload)?;

    let (customer, token) = state
        .service
        .register(typed::<RegisterCustomer>(&payload)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SingleResponse::new(AuthenticatedCustomer::new(&customer, token))),
    ))
}

/// POST /customers/login
async fn login_handler(
    State(state): State<Arc<CustomerState>>,
    body: Bytes,
) -> ApiResult<Json<SingleResponse<AuthenticatedCustomer>>> {
    let payload = parse_body(&body)?;
    let payload = state.gate.validate(schemas::login_customer(), &payload)?;

    let (customer, token) = state
        .service
        .login(typed::<LoginCustomer>(&payload)?)
        .await?;

    Ok(Json(SingleResponse::new(AuthenticatedCustomer::new(&customer, token))))
}

/// GET /customers/:customer_id
async fn get_customer_handler(
    State(state): State<Arc<CustomerState>>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<SingleResponse<CustomerProfile>>> {
    let payload = payload_with_resource_id(&Bytes::new(), customer_id)?;
    let admitted = state.gate.admit(
        schemas::get_customer(),
        &payload,
        authorization_header(&headers),
    )?;

    let customer = state.service.profile(admitted.customer_id).await?;
    Ok(Json(SingleResponse::new(CustomerProfile::from(&customer))))
}

/// PUT /customers/:customer_id
async fn update_profile_handler(
    State(state): State<Arc<CustomerState>>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Updated> {
    let payload = payload_with_resource_id(&body, customer_id)?;
    let admitted = state.gate.admit(
        schemas::update_customer_profile(),
        &payload,
        authorization_header(&headers),
    )?;

    let customer = state
        .service
        .update_profile(admitted.customer_id, typed::<UpdateProfile>(&admitted.payload)?)
        .await?;
    Ok(Json(UpdateResponse::new(CustomerProfile::from(&customer))))
}

/// PUT /customers/address/:customer_id
async fn update_address_handler(
    State(state): State<Arc<CustomerState>>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Updated> {
    let payload = payload_with_resource_id(&body, customer_id)?;
    let admitted = state.gate.admit(
        schemas::update_customer_address(),
        &payload,
        authorization_header(&headers),
    )?;

    let customer = state
        .service
        .update_address(admitted.customer_id, typed::<UpdateAddress>(&admitted.payload)?)
        .await?;
    Ok(Json(UpdateResponse::new(CustomerProfile::from(&customer))))
}

/// PUT /customers/creditCard/:customer_id
async fn update_credit_card_handler(
    State(state): State<Arc<CustomerState>>,
    Path(customer_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Updated> {
    let payload = payload_with_resource_id(&body, customer_id)?;
    let admitted = state.gate.admit(
        schemas::update_credit_card(),
        &payload,
        authorization_header(&headers),
    )?;

    let customer = state
        .service
        .update_credit_card(
            admitted.customer_id,
            typed::<UpdateCreditCard>(&admitted.payload)?,
        )
        .await?;
    Ok(Json(UpdateResponse::new(CustomerProfile::from(&customer))))
}
