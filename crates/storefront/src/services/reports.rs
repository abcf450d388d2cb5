//! Sales reporting.

use tracing::instrument;

use crate::error::{AppError, Result};
use crate::flowhub::{Gateway, SalesReport, SalesReportQuery};
use crate::services::catalog::require;

/// Sales totals from Flowhub, optionally bounded by date and category.
///
/// # Errors
///
/// Returns `Validation` when the start date is after the end date (no call
/// is made), and `Gateway` if Flowhub fails.
#[instrument(skip(gateway))]
pub async fn sales_report<G: Gateway>(gateway: &G, mut query: SalesReportQuery) -> Result<SalesReport> {
    if matches!((query.start_date, query.end_date), (Some(start), Some(end)) if start > end) {
        return Err(AppError::Validation(
            "start date must not be after end date".to_string(),
        ));
    }
    query.category = query
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    require(gateway.sales_report(&query).await, "sales report not found")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::flowhub::mock::{MockGateway, flowhub_order};

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, d)
    }

    #[tokio::test]
    async fn test_report_totals_and_filters() {
        let gateway = MockGateway::new()
            .with_orders(vec![flowhub_order("o-1", "picked-up"), flowhub_order("o-2", "ready")]);

        let report = sales_report(
            &gateway,
            SalesReportQuery {
                start_date: date(1),
                end_date: date(30),
                category: Some("  ".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_sales, Decimal::new(4000, 2));

        let sent = gateway.report_queries();
        assert_eq!(sent[0].start_date, date(1));
        assert_eq!(sent[0].category, None);
    }

    #[tokio::test]
    async fn test_inverted_range_makes_no_call() {
        let gateway = MockGateway::new();
        let query = SalesReportQuery {
            start_date: date(30),
            end_date: date(1),
            category: None,
        };

        let result = sales_report(&gateway, query).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_report_gateway_failure() {
        let gateway = MockGateway::new().failing("HTTP 500: report unavailable", Some(500));
        let result = sales_report(&gateway, SalesReportQuery::default()).await;
        assert!(matches!(result, Err(AppError::Gateway(ref msg)) if msg == "HTTP 500: report unavailable"));
    }
}
