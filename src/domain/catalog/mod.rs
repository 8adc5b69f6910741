//! Catalog domain - products, sales and the price history log

mod history;
mod product;
mod sale;

pub use history::PriceHistoryEntry;
pub use product::{Product, RECOMMENDATION_MARKUP_PERCENT};
pub use sale::SaleRecord;

use rust_decimal::Decimal;

use crate::shared::errors::ValidationError;
use crate::shared::types::FIELD_SEPARATOR;

/// A SKU identifies a product for its whole life, so it must survive a save and reload
pub fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    if sku.trim().is_empty() {
        return Err(ValidationError::EmptySku);
    }
    if sku.contains(FIELD_SEPARATOR) {
        return Err(ValidationError::SeparatorInSku(sku.to_string()));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}
