//! Bulk repricing orchestration

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::domain::catalog::{PriceHistoryEntry, Product};
use crate::domain::competitor::{CompetitorAnalyzer, CompetitorQuote};
use crate::domain::ports::{CatalogProvider, CompetitorProvider, HistorySink};
use crate::domain::pricing::{PricingStrategy, RepricingConfig};
use crate::shared::errors::{PricingError, StoreError};
use crate::shared::utils::{calculate_percentage_change, round_money};

/// Which corridor bound, if any, the raw candidate was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampKind {
    None,
    Minimum,
    Maximum,
}

/// How a product fared in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepricingOutcome {
    Changed,
    Unchanged,
    NoCompetitorData,
    Failed,
}

/// Outcome of repricing one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepricingResult {
    pub sku: String,
    pub name: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub price_changed: bool,
    pub outcome: RepricingOutcome,
    pub clamp: ClampKind,
    pub competitor_count: usize,
    pub message: String,
}

impl RepricingResult {
    /// Absolute change, negative when the price went down
    pub fn price_change(&self) -> Decimal {
        self.new_price - self.old_price
    }

    /// Change in percent of the old price; 0 when the old price was 0
    pub fn price_change_percent(&self) -> Decimal {
        calculate_percentage_change(self.old_price, self.new_price)
    }

    fn unchanged(product: &Product, outcome: RepricingOutcome, competitor_count: usize, message: String) -> Self {
        Self {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            old_price: product.price(),
            new_price: product.price(),
            price_changed: false,
            outcome,
            clamp: ClampKind::None,
            competitor_count,
            message,
        }
    }
}

impl fmt::Display for RepricingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {} -> {}", self.sku, self.name, self.old_price, self.new_price)?;
        if self.price_changed {
            write!(f, " [{:+} / {:+}%]", self.price_change(), self.price_change_percent())?;
        }
        write!(f, " - {}", self.message)
    }
}

/// Runs one strategy over the whole catalog
pub struct RepricingService {
    analyzer: CompetitorAnalyzer,
}

impl RepricingService {
    pub fn new() -> Self {
        Self {
            analyzer: CompetitorAnalyzer,
        }
    }

    /// Reprice every product in catalog order.
    ///
    /// Changed products get their new price and one history entry each.
    /// Every product yields exactly one result; a product that fails to
    /// compute is reported and left untouched.
    pub fn execute_bulk_repricing<S>(&self, store: &mut S, config: &RepricingConfig) -> Vec<RepricingResult>
    where
        S: CatalogProvider + CompetitorProvider + HistorySink,
    {
        let strategy = config.pricing_strategy();
        let now = Utc::now();
        let count = store.get_all().len();

        let mut results = Vec::with_capacity(count);
        for index in 0..count {
            let Some(product) = store.get_all().get(index) else {
                break;
            };
            let mut result = self.evaluate_product(product, store.get_by_product_id(product.sku()), &strategy);

            if result.price_changed {
                if let Err(err) = self.apply_change(store, &result, &strategy, now) {
                    warn!("Failed to apply new price for {}: {}", result.sku, err);
                    result.new_price = result.old_price;
                    result.price_changed = false;
                    result.outcome = RepricingOutcome::Failed;
                    result.message = format!("skipped: {}", err);
                }
            }
            results.push(result);
        }

        log_summary(&strategy, &results);
        results
    }

    /// Compute what a run would do without touching the catalog or history
    pub fn preview<S>(&self, store: &S, config: &RepricingConfig) -> Vec<RepricingResult>
    where
        S: CatalogProvider + CompetitorProvider,
    {
        let strategy = config.pricing_strategy();
        store
            .get_all()
            .iter()
            .map(|product| self.evaluate_product(product, store.get_by_product_id(product.sku()), &strategy))
            .collect()
    }

    fn evaluate_product(
        &self,
        product: &Product,
        quotes: Vec<&CompetitorQuote>,
        strategy: &PricingStrategy,
    ) -> RepricingResult {
        match self.decide(product, quotes, strategy) {
            Ok(result) => result,
            Err((PricingError::NoCompetitorData, count)) => {
                debug!("{}: no competitor data, price kept at {}", product.sku(), product.price());
                RepricingResult::unchanged(
                    product,
                    RepricingOutcome::NoCompetitorData,
                    count,
                    PricingError::NoCompetitorData.to_string(),
                )
            }
            Err((err, count)) => {
                warn!("{}: repricing skipped: {}", product.sku(), err);
                RepricingResult::unchanged(product, RepricingOutcome::Failed, count, format!("skipped: {}", err))
            }
        }
    }

    fn decide(
        &self,
        product: &Product,
        quotes: Vec<&CompetitorQuote>,
        strategy: &PricingStrategy,
    ) -> Result<RepricingResult, (PricingError, usize)> {
        let summary = self
            .analyzer
            .summarize(product.sku(), quotes)
            .map_err(|err| (err, 0))?;
        let competitor_count = summary.count();

        if strategy.requires_competitors() && competitor_count == 0 {
            return Err((PricingError::NoCompetitorData, 0));
        }
        if product.min_price() > product.max_price() {
            return Err((
                PricingError::InvalidBounds {
                    min: product.min_price(),
                    max: product.max_price(),
                },
                competitor_count,
            ));
        }

        let candidate = strategy
            .candidate_price(product, &summary)
            .map_err(|err| (err, competitor_count))?;

        let clamp = if candidate < product.min_price() {
            ClampKind::Minimum
        } else if candidate > product.max_price() {
            ClampKind::Maximum
        } else {
            ClampKind::None
        };
        // Bounds with more than two decimals stay authoritative after rounding.
        let new_price = product.clamp_to_bounds(round_money(product.clamp_to_bounds(candidate)));
        let price_changed = new_price != round_money(product.price());

        debug!(
            "{}: candidate {} -> final {} (clamp {:?}, competitors {})",
            product.sku(),
            candidate,
            new_price,
            clamp,
            competitor_count
        );

        let clamp_note = match clamp {
            ClampKind::None => None,
            ClampKind::Minimum => Some("clamped to minimum"),
            ClampKind::Maximum => Some("clamped to maximum"),
        };
        let (outcome, message) = match (price_changed, clamp_note) {
            (true, None) => (RepricingOutcome::Changed, "price updated".to_string()),
            (true, Some(note)) => (RepricingOutcome::Changed, format!("price updated ({})", note)),
            (false, None) => (RepricingOutcome::Unchanged, "no change".to_string()),
            (false, Some(note)) => (RepricingOutcome::Unchanged, format!("no change ({})", note)),
        };

        Ok(RepricingResult {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            old_price: product.price(),
            new_price: if price_changed { new_price } else { product.price() },
            price_changed,
            outcome,
            clamp,
            competitor_count,
            message,
        })
    }

    fn apply_change<S>(
        &self,
        store: &mut S,
        result: &RepricingResult,
        strategy: &PricingStrategy,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>
    where
        S: CatalogProvider + HistorySink,
    {
        let id = store.next_history_id()?;
        let entry = PriceHistoryEntry::new(
            id,
            result.sku.as_str(),
            result.old_price,
            result.new_price,
            strategy.kind(),
            now,
        )?;
        let product = store
            .get_by_id_mut(&result.sku)
            .ok_or_else(|| StoreError::ProductNotFound(result.sku.clone()))?;
        product.set_price(result.new_price);
        store.append(entry);
        Ok(())
    }
}

impl Default for RepricingService {
    fn default() -> Self {
        Self::new()
    }
}

fn log_summary(strategy: &PricingStrategy, results: &[RepricingResult]) {
    let count = |outcome: RepricingOutcome| results.iter().filter(|r| r.outcome == outcome).count();
    info!(
        "Repricing with {} finished: {} processed, {} changed, {} unchanged, {} without competitors, {} failed",
        strategy.kind().display_name(),
        results.len(),
        count(RepricingOutcome::Changed),
        count(RepricingOutcome::Unchanged),
        count(RepricingOutcome::NoCompetitorData),
        count(RepricingOutcome::Failed),
    );
}
