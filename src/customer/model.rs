//! # Customer Model
//!
//! The stored customer record, the change sets applied to it, and the typed
//! requests produced from validated payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shipping region assigned to newly registered customers
pub const DEFAULT_SHIPPING_REGION_ID: i64 = 1;

/// Customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Store-assigned identifier, starting at 1
    pub customer_id: i64,

    pub name: String,

    /// Lower-cased, unique
    pub email: String,

    /// Argon2id password hash (never plaintext)
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub credit_card: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub shipping_region_id: i64,
    pub day_phone: Option<String>,
    pub eve_phone: Option<String>,
    pub mob_phone: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Build the record for a fresh registration
    pub fn from_new(customer_id: i64, new: NewCustomer) -> Self {
        let now = Utc::now();
        Self {
            customer_id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            credit_card: None,
            address_1: None,
            address_2: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
            shipping_region_id: DEFAULT_SHIPPING_REGION_ID,
            day_phone: None,
            eve_phone: None,
            mob_phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a change set; `None` fields keep their current value
    pub fn apply(&mut self, changes: CustomerChanges) {
        let CustomerChanges {
            name,
            email,
            password_hash,
            credit_card,
            address_1,
            address_2,
            city,
            region,
            postal_code,
            country,
            shipping_region_id,
            day_phone,
            eve_phone,
            mob_phone,
        } = changes;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = password_hash {
            self.password_hash = v;
        }
        if let Some(v) = shipping_region_id {
            self.shipping_region_id = v;
        }

        for (slot, value) in [
            (&mut self.credit_card, credit_card),
            (&mut self.address_1, address_1),
            (&mut self.address_2, address_2),
            (&mut self.city, city),
            (&mut self.region, region),
            (&mut self.postal_code, postal_code),
            (&mut self.country, country),
            (&mut self.day_phone, day_phone),
            (&mut self.eve_phone, eve_phone),
            (&mut self.mob_phone, mob_phone),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }

        self.updated_at = Utc::now();
    }
}

/// Fields required to create a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update of a customer record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub credit_card: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub shipping_region_id: Option<i64>,
    pub day_phone: Option<String>,
    pub eve_phone: Option<String>,
    pub mob_phone: Option<String>,
}

// ==================
// Validated Requests
// ==================

/// `POST /customers`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCustomer {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /customers/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCustomer {
    pub email: String,
    pub password: String,
}

/// `PUT /customers/:customer_id`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
    pub day_phone: Option<String>,
    pub eve_phone: Option<String>,
    pub mob_phone: String,
}

/// `PUT /customers/address/:customer_id`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAddress {
    pub address_1: String,
    pub address_2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    /// Validated as an integer >= 1, kept as text until parsed
    pub shipping_region_id: String,
}

/// `PUT /customers/creditCard/:customer_id`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCreditCard {
    pub credit_card: String,
}

// ==================
// Responses
// ==================

/// Customer as returned to its owner
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    /// Masked to the last four digits
    pub credit_card: Option<String>,
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub shipping_region_id: i64,
    pub day_phone: Option<String>,
    pub eve_phone: Option<String>,
    pub mob_phone: Option<String>,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            credit_card: customer.credit_card.as_deref().map(mask_card),
            address_1: customer.address_1.clone(),
            address_2: customer.address_2.clone(),
            city: customer.city.clone(),
            region: customer.region.clone(),
            postal_code: customer.postal_code.clone(),
            country: customer.country.clone(),
            shipping_region_id: customer.shipping_region_id,
            day_phone: customer.day_phone.clone(),
            eve_phone: customer.eve_phone.clone(),
            mob_phone: customer.mob_phone.clone(),
        }
    }
}

/// Replace all but the last four characters with `X`
pub fn mask_card(card: &str) -> String {
    let len = card.chars().count();
    card.chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < len { 'X' } else { c })
        .collect()
}
