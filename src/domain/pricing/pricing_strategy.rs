//! Repricing strategies and their candidate price formulas

use rust_decimal::Decimal;
use serde::Serialize;

use super::StrategyKind;
use crate::domain::catalog::Product;
use crate::domain::competitor::CompetitorSummary;
use crate::shared::errors::PricingError;
use crate::shared::utils::percent_factor;

/// A repricing strategy with its parameter.
///
/// Each variant maps a product and its competitor summary to a raw candidate
/// price. The candidate is not clamped or rounded here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PricingStrategy {
    /// Candidate = lowest competitor price
    MatchLowest,
    /// Candidate = lowest competitor price lowered by `percent`
    UndercutByPercent { percent: Decimal },
    /// Candidate = lowest competitor price minus `amount`, may go negative
    UndercutByAmount { amount: Decimal },
    /// Candidate = cost raised by `min_margin_percent`, ignores competitors
    MaintainMargin { min_margin_percent: Decimal },
    /// Candidate = lowest competitor price raised by `premium_percent`
    PremiumPricing { premium_percent: Decimal },
}

impl PricingStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            PricingStrategy::MatchLowest => StrategyKind::MatchLowest,
            PricingStrategy::UndercutByPercent { .. } => StrategyKind::UndercutByPercent,
            PricingStrategy::UndercutByAmount { .. } => StrategyKind::UndercutByAmount,
            PricingStrategy::MaintainMargin { .. } => StrategyKind::MaintainMargin,
            PricingStrategy::PremiumPricing { .. } => StrategyKind::PremiumPricing,
        }
    }

    pub fn requires_competitors(&self) -> bool {
        !matches!(self, PricingStrategy::MaintainMargin { .. })
    }

    pub fn candidate_price(
        &self,
        product: &Product,
        competitors: &CompetitorSummary,
    ) -> Result<Decimal, PricingError> {
        match self {
            PricingStrategy::MaintainMargin { min_margin_percent } => percent_factor(*min_margin_percent)
                .and_then(|factor| product.cost_price().checked_mul(factor))
                .ok_or(PricingError::Overflow("margin price")),
            PricingStrategy::MatchLowest => lowest(competitors),
            PricingStrategy::UndercutByPercent { percent } => {
                let min_price = lowest(competitors)?;
                let percent = (*percent).max(Decimal::ZERO);
                percent_factor(-percent)
                    .and_then(|factor| min_price.checked_mul(factor))
                    .ok_or(PricingError::Overflow("percent undercut"))
            }
            PricingStrategy::UndercutByAmount { amount } => lowest(competitors)?
                .checked_sub(*amount)
                .ok_or(PricingError::Overflow("amount undercut")),
            PricingStrategy::PremiumPricing { premium_percent } => {
                let min_price = lowest(competitors)?;
                percent_factor(*premium_percent)
                    .and_then(|factor| min_price.checked_mul(factor))
                    .ok_or(PricingError::Overflow("premium price"))
            }
        }
    }
}

fn lowest(competitors: &CompetitorSummary) -> Result<Decimal, PricingError> {
    competitors.min_price().ok_or(PricingError::NoCompetitorData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::competitor::CompetitorStats;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn product(cost: Decimal) -> Product {
        Product::new("WB-1", "Kettle", cost, dec!(1000), 5, dec!(0), dec!(100000)).unwrap()
    }

    fn competitors(min_price: Decimal) -> CompetitorSummary {
        CompetitorSummary::Available(CompetitorStats {
            count: 1,
            min_price,
            average_price: min_price,
            cheapest_competitor: "Ozon".to_string(),
        })
    }

    #[rstest]
    #[case::match_lowest(PricingStrategy::MatchLowest, dec!(1000), dec!(1000))]
    #[case::undercut_percent(PricingStrategy::UndercutByPercent { percent: dec!(5) }, dec!(1000), dec!(950))]
    #[case::undercut_amount(PricingStrategy::UndercutByAmount { amount: dec!(50) }, dec!(500), dec!(450))]
    #[case::undercut_amount_below_zero(PricingStrategy::UndercutByAmount { amount: dec!(50) }, dec!(20), dec!(-30))]
    #[case::premium(PricingStrategy::PremiumPricing { premium_percent: dec!(10) }, dec!(1000), dec!(1100))]
    fn test_competitor_relative_candidates(
        #[case] strategy: PricingStrategy,
        #[case] competitor_min: Decimal,
        #[case] expected: Decimal,
    ) {
        let candidate = strategy
            .candidate_price(&product(dec!(100)), &competitors(competitor_min))
            .unwrap();
        assert_eq!(candidate, expected);
    }

    #[test]
    fn test_maintain_margin_ignores_competitors() {
        let strategy = PricingStrategy::MaintainMargin { min_margin_percent: dec!(25) };
        assert!(!strategy.requires_competitors());
        assert_eq!(
            strategy.candidate_price(&product(dec!(100)), &CompetitorSummary::NoData),
            Ok(dec!(125))
        );
        assert_eq!(
            strategy.candidate_price(&product(dec!(100)), &competitors(dec!(1))),
            Ok(dec!(125))
        );
    }

    #[test]
    fn test_negative_undercut_percent_is_floored_at_zero() {
        let strategy = PricingStrategy::UndercutByPercent { percent: dec!(-10) };
        assert_eq!(
            strategy.candidate_price(&product(dec!(100)), &competitors(dec!(1000))),
            Ok(dec!(1000))
        );
    }

    #[rstest]
    #[case(PricingStrategy::MatchLowest)]
    #[case(PricingStrategy::UndercutByPercent { percent: dec!(5) })]
    #[case(PricingStrategy::UndercutByAmount { amount: dec!(5) })]
    #[case(PricingStrategy::PremiumPricing { premium_percent: dec!(5) })]
    fn test_competitor_strategies_need_data(#[case] strategy: PricingStrategy) {
        assert!(strategy.requires_competitors());
        assert_eq!(
            strategy.candidate_price(&product(dec!(100)), &CompetitorSummary::NoData),
            Err(PricingError::NoCompetitorData)
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let strategy = PricingStrategy::PremiumPricing { premium_percent: dec!(100) };
        let result = strategy.candidate_price(&product(dec!(100)), &competitors(Decimal::MAX));
        assert_eq!(result, Err(PricingError::Overflow("premium price")));
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            PricingStrategy::UndercutByAmount { amount: dec!(1) }.kind(),
            StrategyKind::UndercutByAmount
        );
    }
}
