//! Reporting commands.

use chrono::NaiveDate;
use terp_haus_storefront::flowhub::SalesReportQuery;
use terp_haus_storefront::services::reports;

use super::{CliError, flowhub_client, print_json};

/// Print sales totals for an optional date range and category.
pub async fn sales(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    category: Option<String>,
) -> Result<(), CliError> {
    let client = flowhub_client()?;
    let query = SalesReportQuery {
        start_date,
        end_date,
        category,
    };
    let report = reports::sales_report(&client, query).await?;
    print_json(&report)
}
