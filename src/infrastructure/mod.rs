//! Infrastructure layer - persistence of the market store

pub mod storage;

pub use storage::{FlatFileStorage, LoadSummary, MarketStore};
