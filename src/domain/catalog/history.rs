//! Price history log entries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{non_negative, validate_sku};
use crate::domain::pricing::StrategyKind;
use crate::shared::errors::ValidationError;

/// One executed price change. Created once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistoryEntry {
    pub id: u64,
    pub product_sku: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub strategy: StrategyKind,
    pub changed_at: DateTime<Utc>,
}

impl PriceHistoryEntry {
    pub fn new(
        id: u64,
        product_sku: impl Into<String>,
        old_price: Decimal,
        new_price: Decimal,
        strategy: StrategyKind,
        changed_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let product_sku = product_sku.into();
        validate_sku(&product_sku)?;
        non_negative("old price", old_price)?;
        non_negative("new price", new_price)?;

        Ok(Self {
            id,
            product_sku,
            old_price,
            new_price,
            strategy,
            changed_at,
        })
    }

    pub fn price_change(&self) -> Decimal {
        self.new_price - self.old_price
    }
}
