//! Customer records held by Flowhub.
//!
//! Customers are registered with the same identity and age rules as a
//! checkout; an under-age or incomplete record never reaches Flowhub.

use chrono::NaiveDate;
use terp_haus_core::CustomerId;
use terp_haus_core::checkout::{CustomerSubmission, verify_customer};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::flowhub::{CustomerCreated, CustomerRecord, FlowhubCustomer, Gateway};
use crate::services::catalog::require;

/// Fetch one customer.
///
/// # Errors
///
/// Returns `Validation` for a blank id, `NotFound` if Flowhub has no such
/// customer and `Gateway` for other failures.
#[instrument(skip(gateway))]
pub async fn get_customer<G: Gateway>(gateway: &G, id: &CustomerId) -> Result<CustomerRecord> {
    if id.is_blank() {
        return Err(AppError::Validation("customer id required".to_string()));
    }
    require(gateway.get_customer(id).await, "customer not found")
}

/// Register a customer with Flowhub.
///
/// # Errors
///
/// Returns `Validation` when a field is missing, the date of birth is
/// unreadable or the customer is under age (no call is made), and `Gateway`
/// if Flowhub rejects the record.
#[instrument(skip_all)]
pub async fn create_customer<G: Gateway>(
    gateway: &G,
    submission: CustomerSubmission,
    today: NaiveDate,
) -> Result<CustomerCreated> {
    let customer = FlowhubCustomer::from(verify_customer(submission, today)?);

    let response = gateway.create_customer(&customer).await;
    if !response.success {
        return Err(AppError::Gateway(format!(
            "customer creation failed: {}",
            response.error_message()
        )));
    }
    let created = response
        .data
        .ok_or_else(|| AppError::Gateway("customer creation returned no record".to_string()))?;

    info!(customer_id = %created.id, "Customer registered");
    Ok(created)
}
