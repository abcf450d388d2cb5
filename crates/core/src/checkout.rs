//! Checkout submission validation.
//!
//! A submission is checked in a fixed order, and the first failure wins:
//!
//! 1. at least one line item
//! 2. first name, last name, email, phone and date of birth all present
//! 3. a parseable date of birth
//! 4. the customer is at least [`MINIMUM_AGE`] years old today
//!
//! Validation is pure: the caller supplies "today", and nothing here touches
//! the network. Line prices are taken from the submission as-is; they are
//! not re-checked against the catalog.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, CartItem};
use crate::types::{Price, ProductId};

/// Minimum legal age to place an order.
pub const MINIMUM_AGE: i32 = 21;

/// Reasons a checkout submission is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("items required")]
    ItemsRequired,

    #[error("customer info required")]
    CustomerInfoRequired,

    #[error("invalid date of birth")]
    InvalidDateOfBirth,

    #[error("must be 21 or older")]
    Underage,
}

/// A checkout request as received from the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    #[serde(default)]
    pub items: Option<Vec<SubmittedLine>>,
    #[serde(default)]
    pub customer: Option<CustomerSubmission>,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A line as submitted by the client.
///
/// Extra fields (such as a full product snapshot from the cart) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

impl From<&CartItem> for SubmittedLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Customer fields as submitted; any of them may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSubmission {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

/// Customer details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Date of birth exactly as submitted.
    pub date_of_birth: String,
    pub age: i32,
}

/// A validated order ready to be sent to Flowhub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub lines: Vec<SubmittedLine>,
    pub customer: VerifiedCustomer,
    pub pickup_time: Option<String>,
    pub notes: Option<String>,
}

impl OrderSubmission {
    /// Build a submission from the lines of a cart.
    #[must_use]
    pub fn from_cart(
        cart: &Cart,
        customer: Option<CustomerSubmission>,
        pickup_time: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            items: Some(cart.items().iter().map(SubmittedLine::from).collect()),
            customer,
            pickup_time,
            notes,
        }
    }
}

/// Validate a submission against `today`.
///
/// # Errors
///
/// Returns the first [`OrderValidationError`] that applies.
pub fn validate(
    submission: OrderSubmission,
    today: NaiveDate,
) -> Result<OrderDraft, OrderValidationError> {
    let lines = submission
        .items
        .filter(|items| !items.is_empty())
        .ok_or(OrderValidationError::ItemsRequired)?;

    let customer = submission
        .customer
        .ok_or(OrderValidationError::CustomerInfoRequired)?;
    let customer = verify_customer(customer, today)?;

    Ok(OrderDraft {
        lines,
        customer,
        pickup_time: submission.pickup_time.filter(|s| !s.trim().is_empty()),
        notes: submission.notes.filter(|s| !s.trim().is_empty()),
    })
}

/// Check a customer's identity fields and legal age against `today`.
///
/// Runs steps 2 to 4 of checkout validation; also used when registering a
/// customer with Flowhub outside of an order.
///
/// # Errors
///
/// Returns the first [`OrderValidationError`] that applies.
pub fn verify_customer(
    customer: CustomerSubmission,
    today: NaiveDate,
) -> Result<VerifiedCustomer, OrderValidationError> {
    let first_name = required(customer.first_name)?;
    let last_name = required(customer.last_name)?;
    let email = required(customer.email)?;
    let phone = required(customer.phone)?;
    let date_of_birth = required(customer.date_of_birth)?;

    let birth = parse_date_of_birth(&date_of_birth)?;
    let age = age_on(birth, today);
    if age < MINIMUM_AGE {
        return Err(OrderValidationError::Underage);
    }

    Ok(VerifiedCustomer {
        first_name,
        last_name,
        email,
        phone,
        date_of_birth,
        age,
    })
}

/// Whole years between `birth` and `today`.
///
/// Counts the year difference, then takes one off if this year's birthday
/// has not happened yet. Someone born on Feb 29 turns a year older on Mar 1
/// in non-leap years.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Parse a date of birth given as `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns [`OrderValidationError::InvalidDateOfBirth`] for anything else.
pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, OrderValidationError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| OrderValidationError::InvalidDateOfBirth)
}

fn required(value: Option<String>) -> Result<String, OrderValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(OrderValidationError::CustomerInfoRequired)
}
