//! Sale records

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validate_sku;
use crate::shared::errors::ValidationError;

/// One sale of a catalog product. Read-only input for analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub id: u64,
    pub product_sku: String,
    pub quantity: u32,
    pub sold_at: DateTime<Utc>,
}

impl SaleRecord {
    pub fn new(
        id: u64,
        product_sku: impl Into<String>,
        quantity: u32,
        sold_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let product_sku = product_sku.into();
        validate_sku(&product_sku)?;
        if quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity(quantity));
        }

        Ok(Self {
            id,
            product_sku,
            quantity,
            sold_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_requires_positive_quantity() {
        assert_eq!(
            SaleRecord::new(1, "WB-1", 0, Utc::now()),
            Err(ValidationError::NonPositiveQuantity(0))
        );
        assert!(SaleRecord::new(1, "WB-1", 2, Utc::now()).is_ok());
        assert!(SaleRecord::new(1, "WB;1", 2, Utc::now()).is_err());
    }
}
