//! Customer commands.

use terp_haus_core::CustomerId;
use terp_haus_core::checkout::CustomerSubmission;
use terp_haus_storefront::services::customers;

use super::{CliError, flowhub_client, print_json};

/// Show one customer.
pub async fn get(id: &str) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let customer = customers::get_customer(&client, &CustomerId::new(id)).await?;
    print_json(&customer)
}

/// Register a customer; the age gate applies against today's local date.
pub async fn create(submission: CustomerSubmission) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let today = chrono::Local::now().date_naive();
    let created = customers::create_customer(&client, submission, today).await?;
    tracing::info!(customer_id = %created.id, "Customer created");
    print_json(&created)
}
