//! Pricing domain - repricing strategies and their configuration

pub mod pricing_strategy;

pub use pricing_strategy::PricingStrategy;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::ValidationError;

/// Closed set of repricing strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MatchLowest,
    UndercutByPercent,
    UndercutByAmount,
    MaintainMargin,
    PremiumPricing,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::MatchLowest,
        StrategyKind::UndercutByPercent,
        StrategyKind::UndercutByAmount,
        StrategyKind::MaintainMargin,
        StrategyKind::PremiumPricing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MatchLowest => "match_lowest",
            StrategyKind::UndercutByPercent => "undercut_by_percent",
            StrategyKind::UndercutByAmount => "undercut_by_amount",
            StrategyKind::MaintainMargin => "maintain_margin",
            StrategyKind::PremiumPricing => "premium_pricing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::MatchLowest => "Match Lowest",
            StrategyKind::UndercutByPercent => "Undercut by Percent",
            StrategyKind::UndercutByAmount => "Undercut by Amount",
            StrategyKind::MaintainMargin => "Maintain Margin",
            StrategyKind::PremiumPricing => "Premium Pricing",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ValidationError;

    /// Accepts `undercut_by_percent`, `undercut-by-percent` and `UndercutByPercent`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == normalized)
            .ok_or_else(|| ValidationError::UnknownStrategy(s.to_string()))
    }
}

/// Parameters of one bulk repricing run.
///
/// Only the field used by `strategy` matters; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepricingConfig {
    pub strategy: StrategyKind,
    pub undercut_percent: Decimal,
    pub undercut_amount: Decimal,
    pub min_margin_percent: Decimal,
    pub premium_percent: Decimal,
}

impl Default for RepricingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::MatchLowest,
            undercut_percent: Decimal::from(5),
            undercut_amount: Decimal::from(50),
            min_margin_percent: Decimal::from(15),
            premium_percent: Decimal::from(10),
        }
    }
}

impl RepricingConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Boundary check: the parameter of the selected strategy must not be negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        let (field, value) = match self.strategy {
            StrategyKind::MatchLowest => return Ok(()),
            StrategyKind::UndercutByPercent => ("undercut percent", self.undercut_percent),
            StrategyKind::UndercutByAmount => ("undercut amount", self.undercut_amount),
            StrategyKind::MaintainMargin => ("min margin percent", self.min_margin_percent),
            StrategyKind::PremiumPricing => ("premium percent", self.premium_percent),
        };
        if value < Decimal::ZERO {
            return Err(ValidationError::Negative { field, value });
        }
        Ok(())
    }

    /// Strategy variant carrying only its own parameter
    pub fn pricing_strategy(&self) -> PricingStrategy {
        match self.strategy {
            StrategyKind::MatchLowest => PricingStrategy::MatchLowest,
            StrategyKind::UndercutByPercent => PricingStrategy::UndercutByPercent {
                percent: self.undercut_percent,
            },
            StrategyKind::UndercutByAmount => PricingStrategy::UndercutByAmount {
                amount: self.undercut_amount,
            },
            StrategyKind::MaintainMargin => PricingStrategy::MaintainMargin {
                min_margin_percent: self.min_margin_percent,
            },
            StrategyKind::PremiumPricing => PricingStrategy::PremiumPricing {
                premium_percent: self.premium_percent,
            },
        }
    }
}
