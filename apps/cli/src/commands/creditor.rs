//! # Creditor Commands
//!
//! Listing, lookup by phone, and recording a payment against a balance.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use khata_core::{record_payment, Books, Creditor, Money, PaymentReceipt};

use super::{saved, Saved};
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// A creditor with its ledger index and formatted balance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditorRow {
    pub index: usize,
    pub creditor: Creditor,
    pub owed_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditorList {
    pub creditors: Vec<CreditorRow>,
    pub total_owed: Money,
    pub total_owed_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(flatten)]
    pub receipt: PaymentReceipt,
    pub remaining_display: String,
}

/// Which creditor a payment is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditorRef {
    Index(usize),
    Phone(String),
}

impl CreditorRef {
    fn resolve(&self, books: &Books) -> Result<usize, ApiError> {
        match self {
            CreditorRef::Index(index) => Ok(*index),
            CreditorRef::Phone(phone) => books
                .creditors
                .position_by_phone(phone.trim())
                .ok_or_else(|| ApiError::not_found("Creditor", phone)),
        }
    }
}

pub async fn list_creditors(db: &DbState, config: &ConfigState) -> Result<CreditorList, ApiError> {
    let books = db.inner().books().load_all().await;
    let total_owed = books.creditors.total_owed();

    Ok(CreditorList {
        creditors: books
            .creditors
            .iter()
            .enumerate()
            .map(|(index, creditor)| row(config, index, creditor))
            .collect(),
        total_owed,
        total_owed_display: config.format_currency(total_owed),
    })
}

pub async fn find_creditor(
    db: &DbState,
    config: &ConfigState,
    phone: &str,
) -> Result<CreditorRow, ApiError> {
    let books = db.inner().books().load_all().await;
    let phone = phone.trim();

    let index = books
        .creditors
        .position_by_phone(phone)
        .ok_or_else(|| ApiError::not_found("Creditor", phone))?;
    let creditor = books
        .creditors
        .get(index)
        .ok_or_else(|| ApiError::not_found("Creditor", phone))?;

    Ok(row(config, index, creditor))
}

/// Records a payment. Over-limit and malformed amounts change nothing.
pub async fn pay_creditor(
    db: &DbState,
    config: &ConfigState,
    target: CreditorRef,
    amount: &str,
) -> Result<Saved<PaymentResponse>, ApiError> {
    debug!(?target, amount = %amount, "pay_creditor command");

    let mut books = db.inner().books().load_all().await;
    let index = target.resolve(&books)?;
    let receipt = record_payment(&mut books, index, amount, Utc::now())?;

    info!(
        phone = %receipt.payment.creditor_phone,
        amount = %receipt.payment.amount,
        remaining = %receipt.remaining,
        settled = receipt.settled,
        sales_marked = receipt.sales_marked,
        "Payment recorded"
    );

    let remaining_display = config.format_currency(receipt.remaining);
    Ok(saved(
        db,
        &books,
        PaymentResponse {
            receipt,
            remaining_display,
        },
    )
    .await)
}

fn row(config: &ConfigState, index: usize, creditor: &Creditor) -> CreditorRow {
    CreditorRow {
        index,
        creditor: creditor.clone(),
        owed_display: config.format_currency(creditor.amount_owed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::{add_sale, list_sales};
    use crate::error::ErrorCode;
    use khata_core::{ProductType, SaleForm};

    async fn with_credit(db: &DbState, name: &str, phone: &str, amount: &str) {
        let form = SaleForm::credit(ProductType::Puff, "Elf 5000", "1", amount, name, phone);
        add_sale(db, form).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_and_find() {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();
        with_credit(&db, "Ali", "0300", "500").await;
        with_credit(&db, "Sara", "0345", "300").await;
        with_credit(&db, "Ali", "0300", "250").await;

        let list = list_creditors(&db, &config).await.unwrap();
        assert_eq!(list.creditors.len(), 2);
        assert_eq!(list.total_owed, Money::from_major(1050));
        assert_eq!(list.total_owed_display, "Rs 1050.00");

        let sara = find_creditor(&db, &config, " 0345 ").await.unwrap();
        assert_eq!(sara.index, 1);
        assert_eq!(sara.owed_display, "Rs 300.00");

        let err = find_creditor(&db, &config, "0999").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_partial_then_full_payment() {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();
        with_credit(&db, "Ali", "0300", "1000").await;

        let out = pay_creditor(&db, &config, CreditorRef::Index(0), "400").await.unwrap();
        assert!(out.durable);
        assert_eq!(out.data.receipt.remaining, Money::from_major(600));
        assert!(!out.data.receipt.settled);
        assert_eq!(out.data.remaining_display, "Rs 600.00");

        let out = pay_creditor(&db, &config, CreditorRef::Phone("0300".into()), "600")
            .await
            .unwrap();
        assert!(out.data.receipt.settled);

        let books = db.inner().books().load_all().await;
        assert!(books.creditors.is_empty());
        assert_eq!(books.payments.len(), 2);
    }

    #[tokio::test]
    async fn test_over_limit_payment_changes_nothing() {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();
        with_credit(&db, "Ali", "0300", "800").await;

        let err = pay_creditor(&db, &config, CreditorRef::Index(0), "900")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);

        let books = db.inner().books().load_all().await;
        assert_eq!(books.creditors.total_owed(), Money::from_major(800));
        assert!(books.payments.is_empty());
        assert!(list_sales(&db, None).await.unwrap().iter().all(|r| !r.sale.is_paid));
    }

    #[tokio::test]
    async fn test_bad_amount_and_unknown_creditor() {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();
        with_credit(&db, "Ali", "0300", "800").await;

        let err = pay_creditor(&db, &config, CreditorRef::Index(0), "abc")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = pay_creditor(&db, &config, CreditorRef::Index(3), "10")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = pay_creditor(&db, &config, CreditorRef::Phone("0999".into()), "10")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
