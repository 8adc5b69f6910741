//! CLI commands and handlers
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::application::analytics::{AnalyticsReport, SalesAnalytics};
use crate::application::price_monitor::PriceMonitor;
use crate::application::repricing_service::RepricingService;
use crate::config::Config;
use crate::domain::catalog::Product;
use crate::domain::competitor::{CompetitorAnalyzer, CompetitorQuote};
use crate::domain::ports::{CatalogProvider, CompetitorProvider, HistorySink};
use crate::domain::pricing::{RepricingConfig, StrategyKind};
use crate::infrastructure::{FlatFileStorage, MarketStore};
use crate::report::RepricingReport;
use crate::shared::errors::{AppError, StoreError};
use crate::shared::types::format_timestamp;

#[derive(Parser)]
#[command(name = "repricer")]
#[command(version, about = "Marketplace repricing engine")]
pub struct Cli {
    /// Path to config file (Config.toml is used when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory with the store files (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `repricer=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reprice the whole catalog with one strategy
    Reprice(RepriceArgs),

    /// Compare current prices with randomized recommendations
    Monitor {
        /// Deviation above which a product is flagged (overrides config)
        #[arg(short, long)]
        threshold: Option<Decimal>,

        /// Seed for reproducible recommendations
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Sales analytics and dashboard
    Analytics {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show price history
    History {
        /// Only entries of this product
        #[arg(long)]
        sku: Option<String>,
    },

    /// Add a product; omitted figures take the catalog defaults
    AddProduct {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cost: Option<Decimal>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        stock: Option<u32>,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
    },

    /// Edit name, cost or price corridor of a product
    EditProduct {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cost: Option<Decimal>,
        #[arg(long)]
        min_price: Option<Decimal>,
        #[arg(long)]
        max_price: Option<Decimal>,
    },

    /// Record a sale
    Sell {
        #[arg(long)]
        sku: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Record a competitor price observation
    Quote {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        competitor: String,
        #[arg(long)]
        competitor_sku: String,
        #[arg(long)]
        price: Decimal,
    },

    /// List the catalog
    Products,
}

#[derive(Args)]
pub struct RepriceArgs {
    /// Strategy name, e.g. undercut_by_percent (overrides config)
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    #[arg(long)]
    pub undercut_percent: Option<Decimal>,

    #[arg(long)]
    pub undercut_amount: Option<Decimal>,

    #[arg(long)]
    pub min_margin_percent: Option<Decimal>,

    #[arg(long)]
    pub premium_percent: Option<Decimal>,

    /// Show the decisions without saving them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RepriceArgs {
    /// Layer the CLI flags over the configured run parameters
    pub fn apply(&self, base: &RepricingConfig) -> RepricingConfig {
        RepricingConfig {
            strategy: self.strategy.unwrap_or(base.strategy),
            undercut_percent: self.undercut_percent.unwrap_or(base.undercut_percent),
            undercut_amount: self.undercut_amount.unwrap_or(base.undercut_amount),
            min_margin_percent: self.min_margin_percent.unwrap_or(base.min_margin_percent),
            premium_percent: self.premium_percent.unwrap_or(base.premium_percent),
        }
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub fn execute(command: Commands, config: Config) -> Result<(), AppError> {
        let storage = FlatFileStorage::new(&config.storage.data_dir);
        match command {
            Commands::Reprice(args) => Self::execute_reprice_command(&args, &config, &storage),
            Commands::Monitor { threshold, seed } => Self::execute_monitor_command(threshold, seed, config, &storage),
            Commands::Analytics { json } => Self::execute_analytics_command(json, config, &storage),
            Commands::History { sku } => Self::execute_history_command(sku, &storage),
            Commands::AddProduct {
                sku,
                name,
                cost,
                price,
                stock,
                min_price,
                max_price,
            } => {
                let defaults = Product::with_defaults(&sku, &name)?;
                let product = Product::new(
                    sku,
                    name,
                    cost.unwrap_or(defaults.cost_price()),
                    price.unwrap_or(defaults.price()),
                    stock.unwrap_or(defaults.stock()),
                    min_price.unwrap_or(defaults.min_price()),
                    max_price.unwrap_or(defaults.max_price()),
                )?;
                Self::with_store(&storage, |store| {
                    let added = store.add_product(product)?;
                    info!("Added product {} ({})", added.sku(), added.name());
                    Ok(())
                })
            }
            Commands::EditProduct {
                sku,
                name,
                cost,
                min_price,
                max_price,
            } => Self::with_store(&storage, |store| {
                let product = store
                    .get_by_id_mut(&sku)
                    .ok_or_else(|| StoreError::ProductNotFound(sku.clone()))?;
                if let Some(name) = name {
                    product.set_name(name);
                }
                if let Some(cost) = cost {
                    product.set_cost_price(cost)?;
                }
                if min_price.is_some() || max_price.is_some() {
                    let min = min_price.unwrap_or(product.min_price());
                    let max = max_price.unwrap_or(product.max_price());
                    product.set_bounds(min, max)?;
                }
                info!("Updated product {}", sku);
                Ok(())
            }),
            Commands::Sell { sku, quantity } => Self::with_store(&storage, |store| {
                let sale = store.record_sale(&sku, quantity, Utc::now())?;
                info!("Recorded sale #{}: {} x {}", sale.id, sale.quantity, sale.product_sku);
                Ok(())
            }),
            Commands::Quote {
                sku,
                competitor,
                competitor_sku,
                price,
            } => Self::with_store(&storage, |store| {
                if store.get_by_id(&sku).is_none() {
                    return Err(StoreError::ProductNotFound(sku.clone()).into());
                }
                store.add_quote(CompetitorQuote::new(&sku, competitor, competitor_sku, price, Some(Utc::now()))?);
                info!("Recorded competitor price {} for {}", price, sku);
                Ok(())
            }),
            Commands::Products => Self::execute_products_command(&storage),
        }
    }

    /// Load the store, apply a mutation and save it back
    fn with_store<F>(storage: &FlatFileStorage, mutate: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut MarketStore) -> Result<(), AppError>,
    {
        let (mut store, _) = storage.load()?;
        mutate(&mut store)?;
        storage.save(&store)?;
        Ok(())
    }

    /// Execute reprice command
    fn execute_reprice_command(args: &RepriceArgs, config: &Config, storage: &FlatFileStorage) -> Result<(), AppError> {
        let repricing = args.apply(&config.repricing);
        repricing.validate()?;

        let (mut store, _) = storage.load()?;
        let service = RepricingService::new();

        let report = if args.dry_run {
            RepricingReport::new(repricing.strategy, service.preview(&store, &repricing)).as_dry_run()
        } else {
            let results = service.execute_bulk_repricing(&mut store, &repricing);
            let report = RepricingReport::new(repricing.strategy, results);
            if report.changed().next().is_some() {
                storage.save(&store)?;
            }
            report
        };

        if args.json {
            println!("{}", report.to_json()?);
            return Ok(());
        }

        println!(
            "Repricing with {}{} (run {})",
            repricing.strategy.display_name(),
            if report.dry_run { ", dry run" } else { "" },
            report.run_id
        );
        for result in &report.results {
            println!("  {}", result);
        }
        let counts = report.counts;
        println!(
            "Processed: {}, changed: {}, unchanged: {}, skipped: {}, failed: {}",
            counts.processed, counts.changed, counts.unchanged, counts.skipped, counts.failed
        );
        Ok(())
    }

    /// Execute monitor command
    fn execute_monitor_command(
        threshold: Option<Decimal>,
        seed: Option<u64>,
        mut config: Config,
        storage: &FlatFileStorage,
    ) -> Result<(), AppError> {
        if let Some(threshold) = threshold {
            if threshold < Decimal::ZERO {
                return Err(AppError::Config(format!("threshold must not be negative, got {}", threshold)));
            }
            config.monitor.deviation_threshold = threshold;
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (store, _) = storage.load()?;
        let monitor = PriceMonitor::new(config.monitor);
        for suggestion in monitor.scan(store.get_all(), &mut rng) {
            println!(
                "  {} {} ({}): current {}, recommended {}{}",
                if suggestion.flagged { "!" } else { " " },
                suggestion.sku,
                suggestion.name,
                suggestion.current_price,
                suggestion.recommended_price,
                if suggestion.flagged {
                    format!(" - deviation {} exceeds {}", suggestion.deviation, monitor.threshold())
                } else {
                    String::new()
                }
            );
        }
        Ok(())
    }

    /// Execute analytics command
    fn execute_analytics_command(json: bool, config: Config, storage: &FlatFileStorage) -> Result<(), AppError> {
        let (store, _) = storage.load()?;
        let report = SalesAnalytics::new(config.analytics).analyze(store.get_all(), store.sales());

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_analytics(&report);
        }
        Ok(())
    }

    /// Execute history command
    fn execute_history_command(sku: Option<String>, storage: &FlatFileStorage) -> Result<(), AppError> {
        let (store, _) = storage.load()?;
        let entries = match &sku {
            Some(sku) => store.history_for(sku),
            None => store.history().iter().collect(),
        };
        if entries.is_empty() {
            warn!("No price history{}", sku.map(|s| format!(" for {}", s)).unwrap_or_default());
            return Ok(());
        }

        for entry in entries {
            println!(
                "  #{} {} {}: {} -> {} ({:+}) via {}",
                entry.id,
                format_timestamp(&entry.changed_at),
                entry.product_sku,
                entry.old_price,
                entry.new_price,
                entry.price_change(),
                entry.strategy.display_name()
            );
        }
        Ok(())
    }

    /// Execute products command
    fn execute_products_command(storage: &FlatFileStorage) -> Result<(), AppError> {
        let (store, _) = storage.load()?;
        let analyzer = CompetitorAnalyzer;

        for product in store.get_all() {
            let gap = analyzer
                .summarize(product.sku(), store.get_by_product_id(product.sku()))
                .ok()
                .and_then(|summary| analyzer.price_gap_percent(product.price(), &summary))
                .map(|gap| format!("{:+}% vs lowest", gap))
                .unwrap_or_else(|| "no competitors".to_string());
            println!(
                "  {} {}: price {} [{} - {}], cost {}, margin {}%, stock {}, {}",
                product.sku(),
                product.name(),
                product.price(),
                product.min_price(),
                product.max_price(),
                product.cost_price(),
                product.margin_percent(),
                product.stock(),
                gap
            );
        }
        Ok(())
    }
}

fn print_analytics(report: &AnalyticsReport) {
    let dashboard = &report.dashboard;
    println!("Total revenue: {}", report.total_revenue);
    match &report.top_seller {
        Some(top) => println!("Top seller: {} ({} units)", top.sku, top.units_sold),
        None => println!("Top seller: no sales yet"),
    }
    println!(
        "Products: {}, units sold: {}, out of stock: {}, average margin: {}%",
        dashboard.total_products, dashboard.total_units_sold, dashboard.out_of_stock, dashboard.average_margin_percent
    );
    println!("Low margin:");
    for flag in &report.low_margin {
        println!("  {} {}: {}%", flag.sku, flag.name, flag.margin_percent);
    }
    println!("Low stock:");
    for flag in &report.low_stock {
        println!("  {} {}: {} left", flag.sku, flag.name, flag.stock);
    }
}
