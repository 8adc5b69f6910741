//! Catalog product and its derived price figures

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{non_negative, validate_sku};
use crate::shared::errors::ValidationError;
use crate::shared::utils::{percent_factor, round_money};

/// Percentage range (inclusive) the advisory recommendation marks up over cost
pub const RECOMMENDATION_MARKUP_PERCENT: std::ops::RangeInclusive<u32> = 5..=15;

/// Product in the catalog.
///
/// The SKU never changes after creation. `min_price <= max_price` always
/// holds; the current price may sit outside that corridor until the next
/// repricing run clamps it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    sku: String,
    name: String,
    cost_price: Decimal,
    price: Decimal,
    stock: u32,
    min_price: Decimal,
    max_price: Decimal,
}

impl Product {
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        cost_price: Decimal,
        price: Decimal,
        stock: u32,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Self, ValidationError> {
        let sku = sku.into();
        validate_sku(&sku)?;
        non_negative("cost price", cost_price)?;
        non_negative("price", price)?;
        non_negative("min price", min_price)?;
        if min_price > max_price {
            return Err(ValidationError::MinAboveMax {
                min: min_price,
                max: max_price,
            });
        }

        Ok(Self {
            sku,
            name: name.into(),
            cost_price,
            price,
            stock,
            min_price,
            max_price,
        })
    }

    /// New product with the catalog's default figures
    pub fn with_defaults(
        sku: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            sku,
            name,
            Decimal::from(500),
            Decimal::from(1000),
            10,
            Decimal::from(800),
            Decimal::from(1200),
        )
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost_price(&self) -> Decimal {
        self.cost_price
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn min_price(&self) -> Decimal {
        self.min_price
    }

    pub fn max_price(&self) -> Decimal {
        self.max_price
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Profit over cost in percent, rounded to 2 decimals; 0 when cost is 0
    pub fn margin_percent(&self) -> Decimal {
        if self.cost_price.is_zero() {
            return Decimal::ZERO;
        }
        (self.price - self.cost_price)
            .checked_div(self.cost_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(round_money)
            .unwrap_or(Decimal::ZERO)
    }

    /// Restrict a value to `[min_price, max_price]`
    pub fn clamp_to_bounds(&self, value: Decimal) -> Decimal {
        value.max(self.min_price).min(self.max_price)
    }

    /// Advisory price: cost marked up by a random 5..=15 percent, clamped and rounded.
    ///
    /// Pass a seeded rng to reproduce a value.
    pub fn recommended_price<R: Rng + ?Sized>(&self, rng: &mut R) -> Decimal {
        let markup = Decimal::from(rng.gen_range(RECOMMENDATION_MARKUP_PERCENT));
        let raw = percent_factor(markup)
            .and_then(|factor| self.cost_price.checked_mul(factor))
            .unwrap_or(self.max_price);
        round_money(self.clamp_to_bounds(raw))
    }

    pub(crate) fn set_price(&mut self, price: Decimal) {
        self.price = price;
    }

    pub(crate) fn set_stock(&mut self, stock: u32) {
        self.stock = stock;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_cost_price(&mut self, cost_price: Decimal) -> Result<(), ValidationError> {
        non_negative("cost price", cost_price)?;
        self.cost_price = cost_price;
        Ok(())
    }

    pub fn set_bounds(&mut self, min_price: Decimal, max_price: Decimal) -> Result<(), ValidationError> {
        non_negative("min price", min_price)?;
        if min_price > max_price {
            return Err(ValidationError::MinAboveMax {
                min: min_price,
                max: max_price,
            });
        }
        self.min_price = min_price;
        self.max_price = max_price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn product(cost: Decimal, price: Decimal, min: Decimal, max: Decimal) -> Product {
        Product::new("WB-1", "Kettle", cost, price, 3, min, max).unwrap()
    }

    #[test]
    fn test_product_rejects_inverted_corridor() {
        let err = Product::new("WB-1", "Kettle", dec!(1), dec!(1), 0, dec!(10), dec!(5)).unwrap_err();
        assert_eq!(err, ValidationError::MinAboveMax { min: dec!(10), max: dec!(5) });
    }

    #[test]
    fn test_product_rejects_negative_money_and_empty_sku() {
        assert!(matches!(
            Product::new("WB-1", "Kettle", dec!(-1), dec!(1), 0, dec!(0), dec!(5)),
            Err(ValidationError::Negative { field: "cost price", .. })
        ));
        assert_eq!(
            Product::new("  ", "Kettle", dec!(1), dec!(1), 0, dec!(0), dec!(5)),
            Err(ValidationError::EmptySku)
        );
        assert_eq!(
            Product::new("A;1", "Kettle", dec!(1), dec!(1), 0, dec!(0), dec!(5)),
            Err(ValidationError::SeparatorInSku("A;1".to_string()))
        );
    }

    #[test]
    fn test_price_may_start_outside_corridor() {
        let p = product(dec!(100), dec!(5000), dec!(120), dec!(200));
        assert_eq!(p.price(), dec!(5000));
    }

    #[test]
    fn test_margin_percent() {
        assert_eq!(product(dec!(100), dec!(125), dec!(0), dec!(500)).margin_percent(), dec!(25));
        assert_eq!(product(dec!(300), dec!(400), dec!(0), dec!(500)).margin_percent(), dec!(33.33));
        assert_eq!(product(dec!(200), dec!(150), dec!(0), dec!(500)).margin_percent(), dec!(-25));
    }

    #[test]
    fn test_margin_is_zero_for_free_product() {
        assert_eq!(product(dec!(0), dec!(125), dec!(0), dec!(500)).margin_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_defaults() {
        let p = Product::with_defaults("WB-9", "Mug").unwrap();
        assert_eq!(p.cost_price(), dec!(500));
        assert_eq!(p.price(), dec!(1000));
        assert_eq!(p.stock(), 10);
        assert_eq!((p.min_price(), p.max_price()), (dec!(800), dec!(1200)));
    }

    #[test]
    fn test_recommended_price_stays_in_markup_range() {
        let p = product(dec!(1000), dec!(1000), dec!(0), dec!(100000));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let recommended = p.recommended_price(&mut rng);
            assert!(recommended >= dec!(1050) && recommended <= dec!(1150), "{recommended}");
            assert_eq!(recommended, round_money(recommended));
        }
    }

    #[test]
    fn test_recommended_price_is_clamped() {
        let mut rng = StdRng::seed_from_u64(42);
        let capped = product(dec!(1000), dec!(1000), dec!(0), dec!(1020));
        assert_eq!(capped.recommended_price(&mut rng), dec!(1020));

        let floored = product(dec!(10), dec!(10), dec!(99.99), dec!(500));
        assert_eq!(floored.recommended_price(&mut rng), dec!(99.99));
    }

    #[test]
    fn test_recommended_price_is_reproducible_with_same_seed() {
        let p = product(dec!(333.33), dec!(400), dec!(0), dec!(1000));
        let a = p.recommended_price(&mut StdRng::seed_from_u64(3));
        let b = p.recommended_price(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
