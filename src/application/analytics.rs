//! Sales analytics and dashboard figures

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::catalog::{Product, SaleRecord};
use crate::shared::utils::round_money;

/// Thresholds for the analytics watch lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Products below this margin (percent) are listed as low-margin
    pub low_margin_percent: Decimal,
    /// Products with fewer units than this are listed as low-stock
    pub low_stock_threshold: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            low_margin_percent: Decimal::from(10),
            low_stock_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSeller {
    pub sku: String,
    pub units_sold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFlag {
    pub sku: String,
    pub name: String,
    pub margin_percent: Decimal,
    pub stock: u32,
}

impl From<&Product> for ProductFlag {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            margin_percent: product.margin_percent(),
            stock: product.stock(),
        }
    }
}

/// Key catalog metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_products: usize,
    pub total_units_sold: u64,
    pub out_of_stock: usize,
    pub average_margin_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub total_revenue: Decimal,
    pub top_seller: Option<TopSeller>,
    pub low_margin: Vec<ProductFlag>,
    pub low_stock: Vec<ProductFlag>,
    pub dashboard: Dashboard,
}

pub struct SalesAnalytics {
    config: AnalyticsConfig,
}

impl SalesAnalytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, products: &[Product], sales: &[SaleRecord]) -> AnalyticsReport {
        AnalyticsReport {
            total_revenue: total_revenue(products, sales),
            top_seller: top_seller(sales),
            low_margin: products
                .iter()
                .filter(|p| p.margin_percent() < self.config.low_margin_percent)
                .map(ProductFlag::from)
                .collect(),
            low_stock: products
                .iter()
                .filter(|p| p.stock() < self.config.low_stock_threshold)
                .map(ProductFlag::from)
                .collect(),
            dashboard: dashboard(products, sales),
        }
    }
}

/// Units sold times the product's current price; sales of unknown products are ignored
pub fn total_revenue(products: &[Product], sales: &[SaleRecord]) -> Decimal {
    let prices: HashMap<&str, Decimal> = products.iter().map(|p| (p.sku(), p.price())).collect();
    sales
        .iter()
        .filter_map(|sale| {
            prices
                .get(sale.product_sku.as_str())
                .map(|price| *price * Decimal::from(sale.quantity))
        })
        .sum()
}

/// Product with the most units sold; ties go to the one sold first
pub fn top_seller(sales: &[SaleRecord]) -> Option<TopSeller> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for sale in sales {
        match totals.iter_mut().find(|(sku, _)| *sku == sale.product_sku) {
            Some((_, units)) => *units += u64::from(sale.quantity),
            None => totals.push((sale.product_sku.as_str(), u64::from(sale.quantity))),
        }
    }

    let mut best: Option<(&str, u64)> = None;
    for (sku, units) in totals {
        if best.map_or(true, |(_, top)| units > top) {
            best = Some((sku, units));
        }
    }
    best.map(|(sku, units_sold)| TopSeller {
        sku: sku.to_string(),
        units_sold,
    })
}

pub fn dashboard(products: &[Product], sales: &[SaleRecord]) -> Dashboard {
    let average_margin_percent = if products.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = products.iter().map(Product::margin_percent).sum();
        round_money(total / Decimal::from(products.len()))
    };

    Dashboard {
        total_products: products.len(),
        total_units_sold: sales.iter().map(|s| u64::from(s.quantity)).sum(),
        out_of_stock: products.iter().filter(|p| !p.is_in_stock()).count(),
        average_margin_percent,
    }
}
