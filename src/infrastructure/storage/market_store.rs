//! In-memory marketplace store

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::catalog::{PriceHistoryEntry, Product, SaleRecord};
use crate::domain::competitor::CompetitorQuote;
use crate::domain::ports::{CatalogProvider, CompetitorProvider, HistorySink};
use crate::shared::errors::StoreError;
use crate::shared::types::IdSequence;

/// Owns the catalog, competitor quotes, sales and price history of one marketplace account
#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    products: Vec<Product>,
    quotes: Vec<CompetitorQuote>,
    sales: Vec<SaleRecord>,
    history: Vec<PriceHistoryEntry>,
    sale_ids: IdSequence,
    history_ids: IdSequence,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product at the end of the catalog
    pub fn add_product(&mut self, product: Product) -> Result<&Product, StoreError> {
        if self.get_by_id(product.sku()).is_some() {
            return Err(StoreError::DuplicateSku(product.sku().to_string()));
        }
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    pub fn add_quote(&mut self, quote: CompetitorQuote) {
        self.quotes.push(quote);
    }

    pub fn quotes(&self) -> &[CompetitorQuote] {
        &self.quotes
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    /// Sell `quantity` units of a product, taking them out of stock
    pub fn record_sale(&mut self, sku: &str, quantity: u32, sold_at: DateTime<Utc>) -> Result<&SaleRecord, StoreError> {
        let id = self.sale_ids.peek().ok_or(StoreError::IdsExhausted("sale"))?;
        let sale = SaleRecord::new(id, sku, quantity, sold_at)?;

        let product = self
            .get_by_id_mut(sku)
            .ok_or_else(|| StoreError::ProductNotFound(sku.to_string()))?;
        if product.stock() < quantity {
            return Err(StoreError::InsufficientStock {
                sku: sku.to_string(),
                requested: quantity,
                available: product.stock(),
            });
        }
        product.set_stock(product.stock() - quantity);

        self.sale_ids.next_id();
        debug!("Recorded sale #{} of {} x {}", sale.id, sale.quantity, sale.product_sku);
        self.sales.push(sale);
        Ok(&self.sales[self.sales.len() - 1])
    }

    /// Insert a sale read back from storage, keeping its id
    pub fn restore_sale(&mut self, sale: SaleRecord) {
        self.sale_ids.observe(sale.id);
        self.sales.push(sale);
    }

    /// Insert a history entry read back from storage, keeping its id
    pub fn restore_history(&mut self, entry: PriceHistoryEntry) {
        self.history_ids.observe(entry.id);
        self.history.push(entry);
    }

    pub fn next_sale_id(&self) -> Option<u64> {
        self.sale_ids.peek()
    }

    /// History entries of one product, oldest first
    pub fn history_for(&self, sku: &str) -> Vec<&PriceHistoryEntry> {
        self.history.iter().filter(|e| e.product_sku == sku).collect()
    }
}

impl CatalogProvider for MarketStore {
    fn get_all(&self) -> &[Product] {
        &self.products
    }

    fn get_by_id(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku() == sku)
    }

    fn get_by_id_mut(&mut self, sku: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.sku() == sku)
    }
}

impl CompetitorProvider for MarketStore {
    fn get_by_product_id(&self, sku: &str) -> Vec<&CompetitorQuote> {
        self.quotes.iter().filter(|q| q.product_sku == sku).collect()
    }
}

impl HistorySink for MarketStore {
    fn next_history_id(&mut self) -> Result<u64, StoreError> {
        self.history_ids.next_id().ok_or(StoreError::IdsExhausted("history"))
    }

    fn append(&mut self, entry: PriceHistoryEntry) {
        self.history_ids.observe(entry.id);
        self.history.push(entry);
    }

    fn history(&self) -> &[PriceHistoryEntry] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::StrategyKind;
    use rust_decimal_macros::dec;

    fn store_with_kettle() -> MarketStore {
        let mut store = MarketStore::new();
        store
            .add_product(Product::new("WB-1", "Kettle", dec!(500), dec!(1000), 3, dec!(800), dec!(1200)).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn test_duplicate_sku_is_rejected() {
        let mut store = store_with_kettle();
        let err = store.add_product(Product::with_defaults("WB-1", "Another").unwrap()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSku(sku) if sku == "WB-1"));
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn test_catalog_keeps_insertion_order() {
        let mut store = MarketStore::new();
        for sku in ["C", "A", "B"] {
            store.add_product(Product::with_defaults(sku, sku).unwrap()).unwrap();
        }
        let order: Vec<&str> = store.get_all().iter().map(|p| p.sku()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_record_sale_takes_stock_and_allocates_ids() {
        let mut store = store_with_kettle();
        let first = store.record_sale("WB-1", 2, Utc::now()).unwrap().id;
        let second = store.record_sale("WB-1", 1, Utc::now()).unwrap().id;

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.get_by_id("WB-1").unwrap().stock(), 0);
    }

    #[test]
    fn test_record_sale_rejects_oversell_and_unknown_product() {
        let mut store = store_with_kettle();
        assert!(matches!(
            store.record_sale("WB-1", 4, Utc::now()),
            Err(StoreError::InsufficientStock { requested: 4, available: 3, .. })
        ));
        assert!(matches!(
            store.record_sale("WB-404", 1, Utc::now()),
            Err(StoreError::ProductNotFound(_))
        ));
        assert!(matches!(store.record_sale("WB-1", 0, Utc::now()), Err(StoreError::Validation(_))));
        assert!(store.sales().is_empty());
        assert_eq!(store.next_sale_id(), Some(1));
    }

    #[test]
    fn test_restored_sale_ids_are_never_reused() {
        let mut store = store_with_kettle();
        store.restore_sale(SaleRecord::new(41, "WB-1", 1, Utc::now()).unwrap());
        store.restore_sale(SaleRecord::new(7, "WB-1", 1, Utc::now()).unwrap());

        let sale = store.record_sale("WB-1", 1, Utc::now()).unwrap();
        assert_eq!(sale.id, 42);
    }

    #[test]
    fn test_sale_after_max_id_is_rejected_without_touching_stock() {
        let mut store = store_with_kettle();
        store.restore_sale(SaleRecord::new(u64::MAX, "WB-1", 1, Utc::now()).unwrap());

        assert!(matches!(
            store.record_sale("WB-1", 1, Utc::now()),
            Err(StoreError::IdsExhausted("sale"))
        ));
        assert_eq!(store.get_by_id("WB-1").unwrap().stock(), 3);
        assert_eq!(store.sales().len(), 1);
        assert_eq!(store.next_sale_id(), None);
    }

    #[test]
    fn test_history_ids_follow_restored_entries() {
        let mut store = store_with_kettle();
        store.restore_history(PriceHistoryEntry {
            id: 9,
            product_sku: "WB-1".to_string(),
            old_price: dec!(1000),
            new_price: dec!(950),
            strategy: StrategyKind::UndercutByPercent,
            changed_at: Utc::now(),
        });
        assert_eq!(store.next_history_id().unwrap(), 10);
        assert_eq!(store.history_for("WB-1").len(), 1);
        assert!(store.history_for("WB-2").is_empty());
    }

    #[test]
    fn test_quotes_are_filtered_by_product() {
        let mut store = store_with_kettle();
        store.add_quote(CompetitorQuote::new("WB-1", "Ozon", "OZ-1", dec!(990), None).unwrap());
        store.add_quote(CompetitorQuote::new("WB-2", "Ozon", "OZ-2", dec!(10), None).unwrap());
        assert_eq!(store.get_by_product_id("WB-1").len(), 1);
        assert_eq!(store.quotes().len(), 2);
    }
}
