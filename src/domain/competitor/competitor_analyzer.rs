//! Competitor price aggregation

use rust_decimal::Decimal;

use super::{CompetitorQuote, CompetitorStats, CompetitorSummary};
use crate::shared::errors::PricingError;
use crate::shared::utils::{calculate_percentage_change, round_money};

/// Aggregates competitor quotes into per-product statistics
pub struct CompetitorAnalyzer;

impl CompetitorAnalyzer {
    /// Summarize the quotes that reference `product_sku`; others are ignored.
    pub fn summarize<'a, I>(&self, product_sku: &str, quotes: I) -> Result<CompetitorSummary, PricingError>
    where
        I: IntoIterator<Item = &'a CompetitorQuote>,
    {
        let mut count = 0usize;
        let mut total = Decimal::ZERO;
        let mut cheapest: Option<&CompetitorQuote> = None;

        for quote in quotes.into_iter().filter(|q| q.product_sku == product_sku) {
            count += 1;
            total = total
                .checked_add(quote.price)
                .ok_or(PricingError::Overflow("competitor total"))?;
            if cheapest.map_or(true, |current| quote.price < current.price) {
                cheapest = Some(quote);
            }
        }

        let Some(cheapest) = cheapest else {
            return Ok(CompetitorSummary::NoData);
        };

        let average_price = total
            .checked_div(Decimal::from(count))
            .map(round_money)
            .ok_or(PricingError::Overflow("competitor average"))?;

        Ok(CompetitorSummary::Available(CompetitorStats {
            count,
            min_price: cheapest.price,
            average_price,
            cheapest_competitor: cheapest.competitor.clone(),
        }))
    }

    /// Spread between the cheapest competitor and our price, in percent of ours
    pub fn price_gap_percent(&self, our_price: Decimal, summary: &CompetitorSummary) -> Option<Decimal> {
        let min_price = summary.min_price()?;
        Some(calculate_percentage_change(our_price, min_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn quote(sku: &str, competitor: &str, price: Decimal) -> CompetitorQuote {
        CompetitorQuote::new(sku, competitor, format!("{competitor}-{sku}"), price, None).unwrap()
    }

    #[test]
    fn test_summary_min_and_average() {
        let quotes = vec![
            quote("A", "Ozon", dec!(1000)),
            quote("B", "Ozon", dec!(10)),
            quote("A", "YM", dec!(950.50)),
            quote("A", "Mega", dec!(1100)),
        ];

        let summary = CompetitorAnalyzer.summarize("A", &quotes).unwrap();
        let stats = summary.stats().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_price, dec!(950.50));
        assert_eq!(stats.cheapest_competitor, "YM");
        assert_eq!(stats.average_price, dec!(1016.83));
    }

    #[test]
    fn test_average_keeps_fractional_part() {
        let quotes = vec![quote("A", "X", dec!(1)), quote("A", "Y", dec!(2))];
        let summary = CompetitorAnalyzer.summarize("A", &quotes).unwrap();
        assert_eq!(summary.stats().unwrap().average_price, dec!(1.50));
    }

    #[test]
    fn test_no_quotes_yields_no_data() {
        let quotes = vec![quote("B", "Ozon", dec!(10))];
        let summary = CompetitorAnalyzer.summarize("A", &quotes).unwrap();
        assert_eq!(summary, CompetitorSummary::NoData);
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.min_price(), None);
    }

    #[test]
    fn test_price_gap_percent() {
        let quotes = vec![quote("A", "X", dec!(900))];
        let summary = CompetitorAnalyzer.summarize("A", &quotes).unwrap();
        assert_eq!(CompetitorAnalyzer.price_gap_percent(dec!(1000), &summary), Some(dec!(-10)));
        assert_eq!(CompetitorAnalyzer.price_gap_percent(dec!(1000), &CompetitorSummary::NoData), None);
    }
}
