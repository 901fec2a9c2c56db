//! # Sale Commands
//!
//! Sales are addressed by their position in the active list, the same
//! numbering `khata sale list` prints. Deleted sales keep their place in
//! storage but drop out of that numbering.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use khata_core::{sales, ProductType, Sale, SaleForm};

use super::{saved, Saved};
use crate::error::ApiError;
use crate::state::DbState;

/// A sale with its active-list index.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub index: usize,
    pub sale: Sale,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

pub async fn add_sale(db: &DbState, form: SaleForm) -> Result<Saved<SaleRow>, ApiError> {
    debug!(item = %form.item_name, credit = form.is_credit, "add_sale command");

    let mut books = db.inner().books().load_all().await;
    let sale = sales::create_sale(&mut books, &form, Utc::now())?;
    let index = books.active_sale_count() - 1;

    info!(index, amount = %sale.amount, credit = sale.is_credit, "Sale recorded");
    Ok(saved(db, &books, SaleRow { index, sale }).await)
}

pub async fn edit_sale(
    db: &DbState,
    index: usize,
    form: SaleForm,
) -> Result<Saved<SaleRow>, ApiError> {
    debug!(index, "edit_sale command");

    let mut books = db.inner().books().load_all().await;
    let sale = sales::edit_sale(&mut books, index, &form)?;

    info!(index, amount = %sale.amount, credit = sale.is_credit, "Sale edited");
    Ok(saved(db, &books, SaleRow { index, sale }).await)
}

pub async fn delete_sale(db: &DbState, index: usize) -> Result<Saved<SaleRow>, ApiError> {
    debug!(index, "delete_sale command");

    let mut books = db.inner().books().load_all().await;
    let sale = sales::soft_delete_sale(&mut books, index, Utc::now())?;

    info!(index, "Sale deleted");
    Ok(saved(db, &books, SaleRow { index, sale }).await)
}

pub async fn delete_all_sales(db: &DbState) -> Result<Saved<DeleteAllResponse>, ApiError> {
    debug!("delete_all_sales command");

    let mut books = db.inner().books().load_all().await;
    let deleted = sales::delete_all_sales(&mut books, Utc::now());

    info!(deleted, "All sales deleted");
    Ok(saved(db, &books, DeleteAllResponse { deleted }).await)
}

/// Active sales, optionally of one product type. Indexes are always the
/// unfiltered active-list positions.
pub async fn list_sales(
    db: &DbState,
    product_type: Option<ProductType>,
) -> Result<Vec<SaleRow>, ApiError> {
    let books = db.inner().books().load_all().await;

    Ok(books
        .active_sales()
        .map(|(_, sale)| sale)
        .enumerate()
        .filter(|(_, sale)| product_type.map_or(true, |t| sale.product_type == t))
        .map(|(index, sale)| SaleRow {
            index,
            sale: sale.clone(),
        })
        .collect())
}
