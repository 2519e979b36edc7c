//! # Customer Store
//!
//! The persistence collaborator behind the customer endpoints. Handlers only
//! see the [`CustomerStore`] trait; the in-memory implementation backs the
//! server binary and the tests.
//!
//! ## Invariants
//! - Emails are unique. Implementations enforce this atomically on create
//!   and update, not only through a prior lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use super::model::{Customer, CustomerChanges, NewCustomer};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fields that are looked up as unique keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    ShippingRegionId,
}

impl UniqueField {
    fn matches(&self, customer: &Customer, value: &str) -> bool {
        match self {
            UniqueField::Email => customer.email == value,
            UniqueField::ShippingRegionId => value
                .parse::<i64>()
                .map(|id| customer.shipping_region_id == id)
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => write!(f, "email"),
            UniqueField::ShippingRegionId => write!(f, "shipping_region_id"),
        }
    }
}

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("Duplicate value for {0}")]
    Duplicate(UniqueField),

    /// No record with this id
    #[error("Customer {0} not found")]
    NotFound(i64),

    /// Backend failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Customer persistence
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Find a customer whose `field` equals `value`, ignoring `exclude`
    async fn find_by_unique_field(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Customer>>;

    /// Find a customer by id
    async fn find_by_id(&self, customer_id: i64) -> StoreResult<Option<Customer>>;

    /// Insert a new customer and assign its id
    async fn create(&self, new: NewCustomer) -> StoreResult<Customer>;

    /// Apply `changes` to an existing customer
    async fn update(&self, customer_id: i64, changes: CustomerChanges) -> StoreResult<Customer>;
}

#[derive(Debug)]
struct Records {
    customers: BTreeMap<i64, Customer>,
    next_id: i64,
}

impl Default for Records {
    fn default() -> Self {
        Self {
            customers: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Records {
    fn email_taken(&self, email: &str, exclude: Option<i64>) -> bool {
        self.customers
            .values()
            .any(|c| c.email == email && Some(c.customer_id) != exclude)
    }
}

/// In-memory customer store
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    records: RwLock<Records>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> StoreResult<usize> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.customers.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("Lock poisoned".to_string())
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find_by_unique_field(
        &self,
        field: UniqueField,
        value: &str,
        exclude: Option<i64>,
    ) -> StoreResult<Option<Customer>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .customers
            .values()
            .find(|c| Some(c.customer_id) != exclude && field.matches(c, value))
            .cloned())
    }

    async fn find_by_id(&self, customer_id: i64) -> StoreResult<Option<Customer>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.customers.get(&customer_id).cloned())
    }

    async fn create(&self, new: NewCustomer) -> StoreResult<Customer> {
        let mut records = self.records.write().map_err(poisoned)?;

        if records.email_taken(&new.email, None) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }

        let customer_id = records.next_id;
        records.next_id += 1;

        let customer = Customer::from_new(customer_id, new);
        records.customers.insert(customer_id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer_id: i64, changes: CustomerChanges) -> StoreResult<Customer> {
        let mut records = self.records.write().map_err(poisoned)?;

        if let Some(email) = changes.email.as_deref() {
            if records.email_taken(email, Some(customer_id)) {
                return Err(StoreError::Duplicate(UniqueField::Email));
            }
        }

        let customer = records
            .customers
            .get_mut(&customer_id)
            .ok_or(StoreError::NotFound(customer_id))?;
        customer.apply(changes);
        Ok(customer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "tree".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryCustomerStore::new();

        let first = store.create(new_customer("a@shop.com")).await.unwrap();
        let second = store.create(new_customer("b@shop.com")).await.unwrap();

        assert_eq!(first.customer_id, 1);
        assert_eq!(second.customer_id, 2);
        assert_eq!(store.len(), Ok(2));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = InMemoryCustomerStore::new();
        store.create(new_customer("a@shop.com")).await.unwrap();

        let result = store.create(new_customer("a@shop.com")).await;
        assert_eq!(result, Err(StoreError::Duplicate(UniqueField::Email)));
        assert_eq!(store.len(), Ok(1));
    }

    #[tokio::test]
    async fn test_find_by_unique_field_with_exclusion() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(new_customer("a@shop.com")).await.unwrap();

        let found = store
            .find_by_unique_field(UniqueField::Email, "a@shop.com", None)
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.customer_id), Some(a.customer_id));

        let excluded = store
            .find_by_unique_field(UniqueField::Email, "a@shop.com", Some(a.customer_id))
            .await
            .unwrap();
        assert!(excluded.is_none());

        let by_region = store
            .find_by_unique_field(UniqueField::ShippingRegionId, "1", None)
            .await
            .unwrap();
        assert!(by_region.is_some());
    }

    #[tokio::test]
    async fn test_update_enforces_email_uniqueness_excluding_self() {
        let store = InMemoryCustomerStore::new();
        let a = store.create(new_customer("a@shop.com")).await.unwrap();
        store.create(new_customer("b@shop.com")).await.unwrap();

        // Keeping your own email is fine
        let same = store
            .update(
                a.customer_id,
                CustomerChanges {
                    email: Some("a@shop.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(same.is_ok());

        let taken = store
            .update(
                a.customer_id,
                CustomerChanges {
                    email: Some("b@shop.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(taken, Err(StoreError::Duplicate(UniqueField::Email)));
    }

    #[test]
    fn test_poisoned_lock_is_unavailable() {
        let store = std::sync::Arc::new(InMemoryCustomerStore::new());
        assert_eq!(store.is_empty(), Ok(true));

        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let store = InMemoryCustomerStore::new();
        let result = store.update(90, CustomerChanges::default()).await;
        assert_eq!(result, Err(StoreError::NotFound(90)));
    }
}
