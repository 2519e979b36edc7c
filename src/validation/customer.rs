//! Request schemas for the customer endpoints.

use std::sync::LazyLock;

use super::rule::{Check, FieldRule, Normalizer};
use super::schema::Schema;

const NAME_LENGTH: &str = "name should be between 2 to 15 characters";
const NAME_ALPHA: &str = "name should only contain alphabets";
const EMAIL_INVALID: &str = "Enter a valid email address";
const PASSWORD_LENGTH: &str = "Password should be between 8 to 15 characters";
const PHONE_DIGITS: &str = "Phone numbers should contain only numbers";
const PHONE_INVALID: &str = "Enter a valid phone number";

static CREATE_CUSTOMER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "create_customer",
        vec![name("name is required"), email(), password()],
    )
});

static LOGIN_CUSTOMER: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("login_customer", vec![email(), password()]));

static GET_CUSTOMER: LazyLock<Schema> =
    LazyLock::new(|| Schema::new("get_customer", vec![customer_id()]));

static UPDATE_CUSTOMER_PROFILE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "update_customer_profile",
        vec![
            customer_id(),
            name("Name is required"),
            email(),
            FieldRule::optional("password").check(Check::Length { min: 8, max: 15 }, PASSWORD_LENGTH),
            phone(FieldRule::optional("day_phone")),
            phone(FieldRule::optional("eve_phone")),
            phone(FieldRule::required("mob_phone", "mobile_phone is required")),
        ],
    )
});

static UPDATE_CUSTOMER_ADDRESS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "update_customer_address",
        vec![
            customer_id(),
            address_line(FieldRule::required("address_1", "Address 1 is required")),
            address_line(FieldRule::optional("address_2")),
            FieldRule::required("city", "City is required")
                .check(Check::AddressSafe, "Enter a valid city")
                .check(Check::Length { min: 1, max: 100 }, "City should not be more than 100 characters"),
            FieldRule::required("region", "Region is required")
                .check(Check::AddressSafe, "Enter a valid region")
                .check(Check::Length { min: 1, max: 100 }, "Region should not be more than 100 characters"),
            FieldRule::required("postal_code", "Postal code is required")
                .check(Check::PostalCode, "Enter a valid postal code")
                .check(Check::Length { min: 3, max: 10 }, "Postal code should be between 3 to 10 characters"),
            FieldRule::required("country", "Country is required")
                .check(Check::AddressSafe, "Enter a valid country")
                .check(Check::Length { min: 1, max: 100 }, "Country should not be more than 100 characters"),
            FieldRule::required("shipping_region_id", "Shipping region id is required")
                .check(Check::Integer, "Enter a valid shipping region id")
                .check(Check::AtLeast(1), "Shipping region id should not be less than 1"),
        ],
    )
});

static UPDATE_CREDIT_CARD: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(
        "update_credit_card",
        vec![
            customer_id(),
            FieldRule::required("credit_card", "Credit card is required")
                .check(Check::Digits, "Credit card should contain only numbers")
                .check(Check::Length { min: 12, max: 19 }, "Credit card should be between 12 to 19 digits")
                .check(Check::Luhn, "Enter a valid credit card number"),
        ],
    )
});

fn name(required: &'static str) -> FieldRule {
    FieldRule::required("name", required)
        .check(Check::Length { min: 2, max: 15 }, NAME_LENGTH)
        .check(Check::Alphabetic, NAME_ALPHA)
        .normalize(Normalizer::Lowercase)
}

fn email() -> FieldRule {
    FieldRule::required("email", "Email address is required")
        .check(Check::Email, EMAIL_INVALID)
        .normalize(Normalizer::Lowercase)
}

fn password() -> FieldRule {
    FieldRule::required("password", "Password is required")
        .check(Check::Length { min: 8, max: 15 }, PASSWORD_LENGTH)
}

fn customer_id() -> FieldRule {
    FieldRule::required("customer_id", "Enter a valid id")
        .check(Check::Integer, "Enter a valid id")
        .check(Check::AtLeast(1), "Id should not be less than 1")
}

fn phone(rule: FieldRule) -> FieldRule {
    rule.check(Check::Integer, PHONE_DIGITS)
        .check(Check::E164Phone, PHONE_INVALID)
}

fn address_line(rule: FieldRule) -> FieldRule {
    rule.check(Check::AddressSafe, "Enter a valid address")
        .check(Check::Length { min: 1, max: 100 }, "Address should not be more than 100 characters")
}

/// `POST /customers`
pub fn create_customer() -> &'static Schema {
    &CREATE_CUSTOMER
}

/// `POST /customers/login`
pub fn login_customer() -> &'static Schema {
    &LOGIN_CUSTOMER
}

/// `GET /customers/:customer_id`
pub fn get_customer() -> &'static Schema {
    &GET_CUSTOMER
}

/// `PUT /customers/:customer_id`
pub fn update_customer_profile() -> &'static Schema {
    &UPDATE_CUSTOMER_PROFILE
}

/// `PUT /customers/address/:customer_id`
pub fn update_customer_address() -> &'static Schema {
    &UPDATE_CUSTOMER_ADDRESS
}

/// `PUT /customers/creditCard/:customer_id`
pub fn update_credit_card() -> &'static Schema {
    &UPDATE_CREDIT_CARD
}
