//! Boundary contracts between the repricing engine and its data owners

use crate::domain::catalog::{PriceHistoryEntry, Product};
use crate::domain::competitor::CompetitorQuote;
use crate::shared::errors::StoreError;

/// Ordered product catalog. Order is stable for the lifetime of the provider.
pub trait CatalogProvider {
    fn get_all(&self) -> &[Product];

    fn get_by_id(&self, sku: &str) -> Option<&Product>;

    fn get_by_id_mut(&mut self, sku: &str) -> Option<&mut Product>;
}

/// Read access to competitor observations
pub trait CompetitorProvider {
    fn get_by_product_id(&self, sku: &str) -> Vec<&CompetitorQuote>;
}

/// Append-only price history log
pub trait HistorySink {
    /// Reserve the id for the next entry
    fn next_history_id(&mut self) -> Result<u64, StoreError>;

    fn append(&mut self, entry: PriceHistoryEntry);

    /// Every entry in append order
    fn history(&self) -> &[PriceHistoryEntry];
}
