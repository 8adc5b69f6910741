// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::repricing_service::{RepricingOutcome, RepricingResult};
use crate::domain::pricing::StrategyKind;
use crate::shared::utils::generate_id;

#[derive(Debug, Serialize)]
pub struct RepricingReport {
    pub run_id: String,
    pub strategy: StrategyKind,
    pub dry_run: bool,
    pub timestamp: DateTime<Utc>,

    pub counts: RunCounts,
    pub results: Vec<RepricingResult>,
}

/// Aggregate outcome counts of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub processed: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Products without competitor data
    pub skipped: usize,
    pub failed: usize,
}

impl RunCounts {
    pub fn from_results(results: &[RepricingResult]) -> Self {
        results.iter().fold(
            Self {
                processed: results.len(),
                ..Self::default()
            },
            |mut counts, result| {
                match result.outcome {
                    RepricingOutcome::Changed => counts.changed += 1,
                    RepricingOutcome::Unchanged => counts.unchanged += 1,
                    RepricingOutcome::NoCompetitorData => counts.skipped += 1,
                    RepricingOutcome::Failed => counts.failed += 1,
                }
                counts
            },
        )
    }
}

impl RepricingReport {
    pub fn new(strategy: StrategyKind, results: Vec<RepricingResult>) -> Self {
        Self {
            run_id: generate_id(),
            strategy,
            dry_run: false,
            timestamp: Utc::now(),
            counts: RunCounts::from_results(&results),
            results,
        }
    }

    pub fn as_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn changed(&self) -> impl Iterator<Item = &RepricingResult> {
        self.results.iter().filter(|r| r.price_changed)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
