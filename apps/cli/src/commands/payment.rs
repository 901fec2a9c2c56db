//! # Payment Commands

use serde::Serialize;

use khata_core::Payment;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub amount_display: String,
}

/// The payment log, oldest first, optionally for one phone number.
pub async fn list_payments(
    db: &DbState,
    config: &ConfigState,
    phone: Option<&str>,
) -> Result<Vec<PaymentRow>, ApiError> {
    let books = db.inner().books().load_all().await;
    let phone = phone.map(str::trim);

    Ok(books
        .payments
        .into_iter()
        .filter(|p| phone.map_or(true, |ph| p.creditor_phone == ph))
        .map(|payment| PaymentRow {
            amount_display: config.format_currency(payment.amount),
            payment,
        })
        .collect())
}
