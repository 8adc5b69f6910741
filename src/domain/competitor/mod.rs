//! Competitor domain - observed competitor prices and their aggregation

mod competitor_analyzer;

pub use competitor_analyzer::CompetitorAnalyzer;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::catalog::validate_sku;
use crate::shared::errors::ValidationError;

/// One observed competitor price for an equivalent of our product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorQuote {
    pub product_sku: String,
    pub competitor: String,
    pub competitor_sku: String,
    pub price: Decimal,
    pub observed_at: Option<DateTime<Utc>>,
}

impl CompetitorQuote {
    pub fn new(
        product_sku: impl Into<String>,
        competitor: impl Into<String>,
        competitor_sku: impl Into<String>,
        price: Decimal,
        observed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let product_sku = product_sku.into();
        validate_sku(&product_sku)?;
        if price < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "competitor price",
                value: price,
            });
        }

        Ok(Self {
            product_sku,
            competitor: competitor.into(),
            competitor_sku: competitor_sku.into(),
            price,
            observed_at,
        })
    }
}

/// Statistics over all quotes of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorStats {
    pub count: usize,
    pub min_price: Decimal,
    pub average_price: Decimal,
    /// Competitor holding the lowest price
    pub cheapest_competitor: String,
}

/// Result of aggregating a product's quotes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CompetitorSummary {
    /// No quote references the product
    NoData,
    Available(CompetitorStats),
}

impl CompetitorSummary {
    pub fn count(&self) -> usize {
        match self {
            CompetitorSummary::NoData => 0,
            CompetitorSummary::Available(stats) => stats.count,
        }
    }

    pub fn stats(&self) -> Option<&CompetitorStats> {
        match self {
            CompetitorSummary::NoData => None,
            CompetitorSummary::Available(stats) => Some(stats),
        }
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.stats().map(|stats| stats.min_price)
    }
}
