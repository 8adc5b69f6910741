//! Repricer - marketplace repricing engine
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::RepricingService;
pub use domain::catalog::Product;
pub use domain::pricing::{PricingStrategy, RepricingConfig, StrategyKind};
pub use infrastructure::{FlatFileStorage, MarketStore};
pub use report::RepricingReport;
