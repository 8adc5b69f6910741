//! Advisory price monitoring

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::catalog::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceMonitorConfig {
    /// Absolute gap between current and recommended price that flags a product
    pub deviation_threshold: Decimal,
}

impl Default for PriceMonitorConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: Decimal::from(50),
        }
    }
}

/// Current vs. recommended price of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSuggestion {
    pub sku: String,
    pub name: String,
    pub current_price: Decimal,
    pub recommended_price: Decimal,
    pub deviation: Decimal,
    pub flagged: bool,
}

/// Compares every product with its randomized recommendation; never touches the catalog
pub struct PriceMonitor {
    config: PriceMonitorConfig,
}

impl PriceMonitor {
    pub fn new(config: PriceMonitorConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> Decimal {
        self.config.deviation_threshold
    }

    pub fn scan<R: Rng + ?Sized>(&self, products: &[Product], rng: &mut R) -> Vec<PriceSuggestion> {
        let suggestions: Vec<PriceSuggestion> = products
            .iter()
            .map(|product| {
                let recommended_price = product.recommended_price(rng);
                let deviation = (product.price() - recommended_price).abs();
                let flagged = deviation > self.config.deviation_threshold;
                debug!(
                    "{}: current {}, recommended {}, deviation {}",
                    product.sku(),
                    product.price(),
                    recommended_price,
                    deviation
                );
                PriceSuggestion {
                    sku: product.sku().to_string(),
                    name: product.name().to_string(),
                    current_price: product.price(),
                    recommended_price,
                    deviation,
                    flagged,
                }
            })
            .collect();

        info!(
            "Price monitor: {} of {} products deviate by more than {}",
            suggestions.iter().filter(|s| s.flagged).count(),
            suggestions.len(),
            self.config.deviation_threshold
        );
        suggestions
    }
}
