//! # Report Commands
//!
//! Summary and breakdowns over a date range. Reports sit behind the
//! admin password.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use khata_core::report::aggregate_by_item;
use khata_core::{DateRange, ItemAggregate, ProductType, Report, Summary};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// Headline figures already formatted for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDisplay {
    pub total_cash_sales: String,
    pub total_credit_sales: String,
    pub total_payments: String,
    pub total_expenses: String,
    pub net_amount: String,
    pub outstanding_credit: String,
    pub collection_rate: String,
}

impl SummaryDisplay {
    fn new(config: &ConfigState, summary: &Summary) -> Self {
        SummaryDisplay {
            total_cash_sales: config.format_currency(summary.total_cash_sales),
            total_credit_sales: config.format_currency(summary.total_credit_sales),
            total_payments: config.format_currency(summary.total_payments),
            total_expenses: config.format_currency(summary.total_expenses),
            net_amount: config.format_currency(summary.net_amount),
            outstanding_credit: config.format_currency(summary.outstanding_credit),
            collection_rate: summary.collection_rate.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub store_name: String,
    #[serde(flatten)]
    pub report: Report,
    pub display: SummaryDisplay,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReportResponse {
    pub product_type: ProductType,
    pub range: Option<DateRange>,
    pub items: BTreeMap<String, ItemAggregate>,
}

pub async fn get_report(
    db: &DbState,
    config: &ConfigState,
    password: &str,
    range: Option<DateRange>,
) -> Result<ReportResponse, ApiError> {
    config.verify_password(password)?;
    debug!(?range, "get_report command");

    let books = db.inner().books().load_all().await;
    let report = Report::build(&books, range);

    Ok(ReportResponse {
        store_name: config.store_name.clone(),
        display: SummaryDisplay::new(config, &report.summary),
        report,
    })
}

/// Per-item totals for one product type.
pub async fn get_item_report(
    db: &DbState,
    config: &ConfigState,
    password: &str,
    product_type: ProductType,
    range: Option<DateRange>,
) -> Result<ItemReportResponse, ApiError> {
    config.verify_password(password)?;
    debug!(%product_type, ?range, "get_item_report command");

    let books = db.inner().books().load_all().await;

    Ok(ItemReportResponse {
        product_type,
        items: aggregate_by_item(&books, Some(product_type), range.as_ref()),
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::creditor::{pay_creditor, CreditorRef};
    use crate::commands::expense::add_expense;
    use crate::commands::sale::{add_sale, delete_sale};
    use crate::error::ErrorCode;
    use chrono::Utc;
    use khata_core::{ExpenseForm, Money, PaymentMethod, SaleForm};

    async fn seeded() -> (DbState, ConfigState) {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();

        let sales = [
            SaleForm::cash(ProductType::Refill, "Tokyo 30ml", "2", "3000", PaymentMethod::Cash),
            SaleForm::cash(ProductType::Refill, "Mango 30ml", "1", "1400", PaymentMethod::Online),
            SaleForm::cash(ProductType::Coil, "Mesh 0.4", "4", "1800", PaymentMethod::Card),
            SaleForm::credit(ProductType::Device, "Xros 3", "1", "6000", "Ali", "0300"),
        ];
        for form in sales {
            add_sale(&db, form).await.unwrap();
        }
        pay_creditor(&db, &config, CreditorRef::Index(0), "1500").await.unwrap();
        add_expense(&db, ExpenseForm::new("Rent", "2000", "rent")).await.unwrap();

        (db, config)
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (db, config) = seeded().await;
        let err = get_report(&db, &config, "guess", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_report_totals() {
        let (db, config) = seeded().await;
        let out = get_report(&db, &config, "admin", None).await.unwrap();
        let summary = out.report.summary;

        assert_eq!(out.store_name, "Khata POS");
        assert_eq!(summary.total_cash_sales, Money::from_major(6200));
        assert_eq!(summary.cash_sale_count, 3);
        assert_eq!(summary.total_credit_sales, Money::from_major(6000));
        assert_eq!(summary.total_payments, Money::from_major(1500));
        assert_eq!(summary.total_expenses, Money::from_major(2000));
        assert_eq!(summary.net_amount, Money::from_major(5700));
        assert_eq!(summary.outstanding_credit, Money::from_major(4500));
        assert_eq!(out.display.collection_rate, "25.00%");
        assert_eq!(out.display.net_amount, "Rs 5700.00");
        assert_eq!(out.report.by_type[&ProductType::Refill].quantity, 3);
    }

    #[tokio::test]
    async fn test_deleted_sales_excluded() {
        let (db, config) = seeded().await;
        delete_sale(&db, 0).await.unwrap();

        let out = get_report(&db, &config, "admin", None).await.unwrap();
        assert_eq!(out.report.summary.total_cash_sales, Money::from_major(3200));
        assert!(!out.report.by_item.contains_key("Tokyo 30ml"));
    }

    #[tokio::test]
    async fn test_item_report_and_range() {
        let (db, config) = seeded().await;

        let out = get_item_report(&db, &config, "admin", ProductType::Refill, None)
            .await
            .unwrap();
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items["Tokyo 30ml"].amount, Money::from_major(3000));

        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        let out = get_report(&db, &config, "admin", Some(DateRange::day(yesterday)))
            .await
            .unwrap();
        assert_eq!(out.report.summary.cash_sale_count, 0);
        assert_eq!(out.report.summary.outstanding_credit, Money::from_major(4500));
    }
}
