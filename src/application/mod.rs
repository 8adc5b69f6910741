//! Application layer - use cases and services

pub mod analytics;
pub mod commands;
pub mod price_monitor;
pub mod repricing_service;

pub use analytics::{AnalyticsConfig, AnalyticsReport, SalesAnalytics};
pub use commands::{Cli, CommandExecutor, Commands};
pub use price_monitor::{PriceMonitor, PriceMonitorConfig, PriceSuggestion};
pub use repricing_service::{ClampKind, RepricingOutcome, RepricingResult, RepricingService};
