//! # Response Formatting
//!
//! Success bodies for the customer endpoints.

use serde::Serialize;

use crate::auth::TokenResponse;
use crate::customer::{Customer, CustomerProfile};

/// Single record response
#[derive(Debug, Clone, Serialize)]
pub struct SingleResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Update response
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}

impl<T: Serialize> UpdateResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: "Customer has been updated successfully",
        }
    }
}

/// Customer plus a freshly issued token, for register and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedCustomer {
    #[serde(flatten)]
    pub customer: CustomerProfile,
    #[serde(flatten)]
    pub token: TokenResponse,
}

impl AuthenticatedCustomer {
    pub fn new(customer: &Customer, token: TokenResponse) -> Self {
        Self {
            customer: CustomerProfile::from(customer),
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::model::NewCustomer;

    #[test]
    fn test_authenticated_customer_is_flat() {
        let customer = Customer::from_new(
            1,
            NewCustomer {
                name: "tree".to_string(),
                email: "tree@gmail.com".to_string(),
                password_hash: "$argon2id$secret".to_string(),
            },
        );
        let body = serde_json::to_value(SingleResponse::new(AuthenticatedCustomer::new(
            &customer,
            TokenResponse::bearer("abc".to_string(), 86400),
        )))
        .unwrap();

        assert_eq!(body["data"]["customer_id"], 1);
        assert_eq!(body["data"]["accessToken"], "Bearer abc");
        assert_eq!(body["data"]["expiresIn"], 86400);
        assert!(body["data"].get("password_hash").is_none());
    }

    #[test]
    fn test_update_response_message() {
        let body = serde_json::to_value(UpdateResponse::new(1)).unwrap();
        assert_eq!(body["message"], "Customer has been updated successfully");
    }
}
