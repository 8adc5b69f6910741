use std::fs;
use std::path::PathBuf;

use repricer::domain::ports::{CatalogProvider, HistorySink};
use repricer::infrastructure::storage::{COMPETITORS_FILE, PRODUCTS_FILE};
use repricer::{FlatFileStorage, RepricingConfig, RepricingReport, RepricingService, StrategyKind};
use rust_decimal_macros::dec;

fn data_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("repricer-it-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(PRODUCTS_FILE),
        "Article;Name;CostPrice;Price;Stock;MinPrice;MaxPrice\n\
         WB-1;Kettle;500;1000;10;800;1200\n\
         WB-2;Mug;100;150;3;120;200\n\
         WB-3;Pan;300;450;0;300;700\n\
         WB-4;broken\n",
    )
    .unwrap();
    fs::write(
        dir.join(COMPETITORS_FILE),
        "ProductArticle;Name;CompetitorArticle;LastPrice;ObservedAt\n\
         WB-1;Ozon;OZ-1;1000;2024-05-01 10:00:00\n\
         WB-1;Yandex;YM-1;1100;\n\
         Ozon;WB-2;90\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_run_persists_prices_and_history() {
    let dir = data_dir();
    let storage = FlatFileStorage::new(&dir);
    let (mut store, summary) = storage.load().unwrap();
    assert_eq!(summary.products, 3);
    assert_eq!(summary.quotes, 3);
    assert_eq!(summary.skipped, 1);

    let config = RepricingConfig::new(StrategyKind::UndercutByPercent);
    config.validate().unwrap();
    let results = RepricingService::new().execute_bulk_repricing(&mut store, &config);
    let report = RepricingReport::new(config.strategy, results);

    // WB-1: 1000 * 0.95; WB-2: 90 * 0.95 clamped to 120; WB-3 has no quotes
    assert_eq!(report.counts.processed, 3);
    assert_eq!(report.counts.changed, 2);
    assert_eq!(report.counts.skipped, 1);
    assert_eq!(report.results[0].new_price, dec!(950));
    assert_eq!(report.results[1].new_price, dec!(120));
    assert_eq!(report.results[1].message, "price updated (clamped to minimum)");
    storage.save(&store).unwrap();

    let (reloaded, _) = storage.load().unwrap();
    assert_eq!(reloaded.get_by_id("WB-1").unwrap().price(), dec!(950));
    assert_eq!(reloaded.get_by_id("WB-3").unwrap().price(), dec!(450));
    let history = reloaded.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].id, 2);
    assert_eq!(history[1].strategy, StrategyKind::UndercutByPercent);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_rerun_after_reload_is_stable() {
    let dir = data_dir();
    let storage = FlatFileStorage::new(&dir);
    let config = RepricingConfig::new(StrategyKind::MatchLowest);
    let service = RepricingService::new();

    let (mut store, _) = storage.load().unwrap();
    service.execute_bulk_repricing(&mut store, &config);
    storage.save(&store).unwrap();

    let (mut reloaded, _) = storage.load().unwrap();
    let second = service.execute_bulk_repricing(&mut reloaded, &config);
    assert!(second.iter().all(|r| !r.price_changed));
    assert_eq!(reloaded.history().len(), store.history().len());

    fs::remove_dir_all(dir).ok();
}
