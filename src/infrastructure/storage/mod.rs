//! Storage - the explicit market store and its flat-file persistence

mod flat_file_storage;
mod market_store;
pub mod record_parser;

pub use flat_file_storage::{
    FlatFileStorage, LoadSummary, COMPETITORS_FILE, HISTORY_FILE, PRODUCTS_FILE, SALES_FILE,
};
pub use market_store::MarketStore;
