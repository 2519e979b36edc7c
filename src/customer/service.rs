//! # Customer Service
//!
//! Business effects of the customer endpoints. Every method receives
//! already-validated input and, for owner-only operations, the customer id
//! granted by the ownership check.

use std::sync::Arc;

use crate::auth::crypto::{hash_password, verify_against_dummy, verify_password};
use crate::auth::{AuthError, JwtManager, TokenResponse};
use crate::error::{ApiError, ApiResult};
use crate::validation::FieldErrors;

use super::model::{
    Customer, CustomerChanges, LoginCustomer, NewCustomer, RegisterCustomer, UpdateAddress,
    UpdateCreditCard, UpdateProfile,
};
use super::store::{CustomerStore, StoreError, UniqueField};

/// Customer account operations
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    jwt_manager: JwtManager,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>, jwt_manager: JwtManager) -> Self {
        Self { store, jwt_manager }
    }

    /// Register a new customer
    pub async fn register(&self, request: RegisterCustomer) -> ApiResult<(Customer, TokenResponse)> {
        let existing = self
            .store
            .find_by_unique_field(UniqueField::Email, &request.email, None)
            .await?;
        if existing.is_some() {
            return Err(customer_exists());
        }

        let password_hash = hash_password(&request.password)?;
        let customer = self
            .store
            .create(NewCustomer {
                name: request.name,
                email: request.email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent registration
                StoreError::Duplicate(UniqueField::Email) => customer_exists(),
                other => other.into(),
            })?;

        tracing::info!(customer_id = customer.customer_id, "customer registered");

        let tokens = self.issue_token(&customer)?;
        Ok((customer, tokens))
    }

    /// Authenticate a customer by email and password
    pub async fn login(&self, request: LoginCustomer) -> ApiResult<(Customer, TokenResponse)> {
        let found = self
            .store
            .find_by_unique_field(UniqueField::Email, &request.email, None)
            .await?;

        let customer = match found {
            Some(customer) => customer,
            None => {
                verify_against_dummy(&request.password);
                tracing::warn!("login rejected: unknown account");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(&request.password, &customer.password_hash)? {
            tracing::warn!(customer_id = customer.customer_id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        tracing::info!(customer_id = customer.customer_id, "customer logged in");

        let tokens = self.issue_token(&customer)?;
        Ok((customer, tokens))
    }

    /// Load the owner's record
    pub async fn profile(&self, customer_id: i64) -> ApiResult<Customer> {
        self.store
            .find_by_id(customer_id)
            .await?
            .ok_or_else(ApiError::not_found)
    }

    /// Update name, email, password and phone numbers
    ///
    /// Optional phone numbers that were not supplied keep their stored value.
    pub async fn update_profile(&self, customer_id: i64, request: UpdateProfile) -> ApiResult<Customer> {
        self.profile(customer_id).await?;

        let taken = self
            .store
            .find_by_unique_field(UniqueField::Email, &request.email, Some(customer_id))
            .await?;
        if taken.is_some() {
            return Err(StoreError::Duplicate(UniqueField::Email).into());
        }

        let password_hash = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let customer = self
            .store
            .update(
                customer_id,
                CustomerChanges {
                    name: Some(request.name),
                    email: Some(request.email),
                    password_hash,
                    day_phone: request.day_phone,
                    eve_phone: request.eve_phone,
                    mob_phone: Some(request.mob_phone),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(customer_id, "customer profile updated");
        Ok(customer)
    }

    /// Update the postal address and shipping region
    ///
    /// Resubmitting the region the customer already has is never a conflict;
    /// every new customer starts on the default region.
    pub async fn update_address(&self, customer_id: i64, request: UpdateAddress) -> ApiResult<Customer> {
        let current = self.profile(customer_id).await?;

        let shipping_region_id = request.shipping_region_id.parse::<i64>().map_err(|_| {
            ApiError::Validation(FieldErrors::single(
                "shipping_region_id",
                "Enter a valid shipping region id",
            ))
        })?;

        if shipping_region_id != current.shipping_region_id {
            let taken = self
                .store
                .find_by_unique_field(
                    UniqueField::ShippingRegionId,
                    &shipping_region_id.to_string(),
                    Some(customer_id),
                )
                .await?;
            if taken.is_some() {
                return Err(StoreError::Duplicate(UniqueField::ShippingRegionId).into());
            }
        }

        let customer = self
            .store
            .update(
                customer_id,
                CustomerChanges {
                    address_1: Some(request.address_1),
                    address_2: request.address_2,
                    city: Some(request.city),
                    region: Some(request.region),
                    postal_code: Some(request.postal_code),
                    country: Some(request.country),
                    shipping_region_id: Some(shipping_region_id),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(customer_id, "customer address updated");
        Ok(customer)
    }

    /// Replace the stored credit card number
    pub async fn update_credit_card(
        &self,
        customer_id: i64,
        request: UpdateCreditCard,
    ) -> ApiResult<Customer> {
        let customer = self
            .store
            .update(
                customer_id,
                CustomerChanges {
                    credit_card: Some(request.credit_card),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(customer_id, "customer credit card updated");
        Ok(customer)
    }

    fn issue_token(&self, customer: &Customer) -> ApiResult<TokenResponse> {
        let token = self
            .jwt_manager
            .generate_access_token(customer.customer_id, &customer.email)?;
        Ok(TokenResponse::bearer(token, self.jwt_manager.ttl_seconds()))
    }
}

fn customer_exists() -> ApiError {
    ApiError::Conflict("Customer already exists".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::customer::model::DEFAULT_SHIPPING_REGION_ID;
    use crate::customer::store::InMemoryCustomerStore;

    fn create_test_service() -> CustomerService {
        CustomerService::new(
            Arc::new(InMemoryCustomerStore::new()),
            JwtManager::new(JwtConfig::default()),
        )
    }

    fn tree() -> RegisterCustomer {
        RegisterCustomer {
            name: "tree".to_string(),
            email: "tree@gmail.com".to_string(),
            password: "qwertyuiop".to_string(),
        }
    }

    fn profile_update(email: &str) -> UpdateProfile {
        UpdateProfile {
            name: "jeff".to_string(),
            email: email.to_string(),
            password: None,
            day_phone: None,
            eve_phone: None,
            mob_phone: "+2341234534267".to_string(),
        }
    }

    fn address(shipping_region_id: &str) -> UpdateAddress {
        UpdateAddress {
            address_1: "12, Allen Avenue".to_string(),
            address_2: None,
            city: "Ikeja".to_string(),
            region: "Lagos".to_string(),
            postal_code: "100001".to_string(),
            country: "Nigeria".to_string(),
            shipping_region_id: shipping_region_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_test_service();

        let (customer, tokens) = service.register(tree()).await.unwrap();

        assert_eq!(customer.customer_id, 1);
        assert_eq!(customer.email, "tree@gmail.com");
        assert_ne!(customer.password_hash, "qwertyuiop");
        assert!(tokens.access_token.starts_with("Bearer "));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_test_service();
        service.register(tree()).await.unwrap();

        let result = service.register(tree()).await;
        assert!(matches!(result, Err(ApiError::Conflict(m)) if m == "Customer already exists"));
    }

    #[tokio::test]
    async fn test_login() {
        let service = create_test_service();
        service.register(tree()).await.unwrap();

        let (customer, tokens) = service
            .login(LoginCustomer {
                email: "tree@gmail.com".to_string(),
                password: "qwertyuiop".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(customer.customer_id, 1);
        assert!(!tokens.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_look_the_same() {
        let service = create_test_service();
        service.register(tree()).await.unwrap();

        let unknown = service
            .login(LoginCustomer {
                email: "jeff@gmail.com".to_string(),
                password: "qwertyuiop".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(LoginCustomer {
                email: "tree@gmail.com".to_string(),
                password: "wrong_password".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(unknown, ApiError::Auth(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, ApiError::Auth(AuthError::InvalidCredentials)));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let service = create_test_service();
        let result = service.profile(90).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_unsent_phones_and_rehashes_password() {
        let service = create_test_service();
        let (customer, _) = service.register(tree()).await.unwrap();

        let mut first = profile_update("jeff@gmail.com");
        first.day_phone = Some("+2341234534260".to_string());
        service.update_profile(customer.customer_id, first).await.unwrap();

        let mut second = profile_update("jeff@gmail.com");
        second.password = Some("newpassword1".to_string());
        let updated = service.update_profile(customer.customer_id, second).await.unwrap();

        assert_eq!(updated.name, "jeff");
        assert_eq!(updated.day_phone.as_deref(), Some("+2341234534260"));
        assert!(verify_password("newpassword1", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict_excludes_self() {
        let service = create_test_service();
        let (tree, _) = service.register(tree()).await.unwrap();
        service
            .register(RegisterCustomer {
                name: "jeff".to_string(),
                email: "jeff@gmail.com".to_string(),
                password: "qwertyuiop".to_string(),
            })
            .await
            .unwrap();

        // Own email is not a conflict
        assert!(service
            .update_profile(tree.customer_id, profile_update("tree@gmail.com"))
            .await
            .is_ok());

        let result = service
            .update_profile(tree.customer_id, profile_update("jeff@gmail.com"))
            .await;
        assert!(matches!(result, Err(ApiError::Conflict(m)) if m == "Email already exists"));
    }

    #[tokio::test]
    async fn test_update_address_shipping_region_conflict() {
        let service = create_test_service();
        let (tree, _) = service.register(tree()).await.unwrap();
        let (jeff, _) = service
            .register(RegisterCustomer {
                name: "jeff".to_string(),
                email: "jeff@gmail.com".to_string(),
                password: "qwertyuiop".to_string(),
            })
            .await
            .unwrap();

        let moved = service.update_address(tree.customer_id, address("3")).await.unwrap();
        assert_eq!(moved.shipping_region_id, 3);
        assert_eq!(moved.city.as_deref(), Some("Ikeja"));

        let result = service.update_address(jeff.customer_id, address("3")).await;
        assert!(matches!(result, Err(ApiError::Conflict(m)) if m == "Shipping Id already exists"));
    }

    #[tokio::test]
    async fn test_update_address_keeps_shared_default_region() {
        let service = create_test_service();
        service.register(tree()).await.unwrap();
        let (jeff, _) = service
            .register(RegisterCustomer {
                name: "jeff".to_string(),
                email: "jeff@gmail.com".to_string(),
                password: "qwertyuiop".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(jeff.shipping_region_id, DEFAULT_SHIPPING_REGION_ID);

        let updated = service
            .update_address(jeff.customer_id, address(&DEFAULT_SHIPPING_REGION_ID.to_string()))
            .await
            .unwrap();
        assert_eq!(updated.shipping_region_id, DEFAULT_SHIPPING_REGION_ID);
        assert_eq!(updated.city.as_deref(), Some("Ikeja"));
    }

    #[tokio::test]
    async fn test_update_credit_card() {
        let service = create_test_service();
        let (customer, _) = service.register(tree()).await.unwrap();

        let updated = service
            .update_credit_card(
                customer.customer_id,
                UpdateCreditCard {
                    credit_card: "4111111111111111".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.credit_card.as_deref(), Some("4111111111111111"));

        let missing = service
            .update_credit_card(
                90,
                UpdateCreditCard {
                    credit_card: "4111111111111111".to_string(),
                },
            )
            .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }
}
