//! `;`-separated flat record codec for the store files

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::domain::catalog::{PriceHistoryEntry, Product, SaleRecord};
use crate::domain::competitor::CompetitorQuote;
use crate::domain::pricing::StrategyKind;
use crate::shared::errors::RecordError;
use crate::shared::types::{format_timestamp, parse_timestamp, FIELD_SEPARATOR};

pub const PRODUCTS_HEADER: &str = "Article;Name;CostPrice;Price;Stock;MinPrice;MaxPrice";
pub const SALES_HEADER: &str = "SaleId;ProductArticle;SaleDate;Quantity";
pub const COMPETITORS_HEADER: &str = "ProductArticle;Name;CompetitorArticle;LastPrice;ObservedAt";
pub const HISTORY_HEADER: &str = "Id;ProductArticle;OldPrice;NewPrice;Strategy;ChangedAt";

pub fn parse_product(line: &str) -> Result<Product, RecordError> {
    let fields = split(line, &[7], "7")?;
    Ok(Product::new(
        fields[0],
        fields[1],
        decimal("cost price", fields[2])?,
        decimal("price", fields[3])?,
        number("stock", fields[4])?,
        decimal("min price", fields[5])?,
        decimal("max price", fields[6])?,
    )?)
}

pub fn format_product(product: &Product) -> String {
    join(&[
        product.sku().to_string(),
        product.name().to_string(),
        product.cost_price().to_string(),
        product.price().to_string(),
        product.stock().to_string(),
        product.min_price().to_string(),
        product.max_price().to_string(),
    ])
}

pub fn parse_sale(line: &str) -> Result<SaleRecord, RecordError> {
    let fields = split(line, &[4], "4")?;
    Ok(SaleRecord::new(
        number("sale id", fields[0])?,
        fields[1],
        number("quantity", fields[3])?,
        timestamp("sale date", fields[2])?,
    )?)
}

pub fn format_sale(sale: &SaleRecord) -> String {
    join(&[
        sale.id.to_string(),
        sale.product_sku.clone(),
        format_timestamp(&sale.sold_at),
        sale.quantity.to_string(),
    ])
}

/// Reads the current 5-field layout and the legacy `Name;CompetitorArticle;LastPrice`
/// layout, whose competitor article doubles as our article.
pub fn parse_quote(line: &str) -> Result<CompetitorQuote, RecordError> {
    let fields = split(line, &[3, 5], "3 or 5")?;
    if fields.len() == 3 {
        return Ok(CompetitorQuote::new(
            fields[1],
            fields[0],
            fields[1],
            decimal("last price", fields[2])?,
            None,
        )?);
    }

    let observed_at = match fields[4].trim() {
        "" => None,
        value => Some(timestamp("observed at", value)?),
    };
    Ok(CompetitorQuote::new(
        fields[0],
        fields[1],
        fields[2],
        decimal("last price", fields[3])?,
        observed_at,
    )?)
}

pub fn format_quote(quote: &CompetitorQuote) -> String {
    join(&[
        quote.product_sku.clone(),
        quote.competitor.clone(),
        quote.competitor_sku.clone(),
        quote.price.to_string(),
        quote.observed_at.as_ref().map(format_timestamp).unwrap_or_default(),
    ])
}

pub fn parse_history(line: &str) -> Result<PriceHistoryEntry, RecordError> {
    let fields = split(line, &[6], "6")?;
    Ok(PriceHistoryEntry::new(
        number("history id", fields[0])?,
        fields[1],
        decimal("old price", fields[2])?,
        decimal("new price", fields[3])?,
        StrategyKind::from_str(fields[4])?,
        timestamp("changed at", fields[5])?,
    )?)
}

pub fn format_history(entry: &PriceHistoryEntry) -> String {
    join(&[
        entry.id.to_string(),
        entry.product_sku.clone(),
        entry.old_price.to_string(),
        entry.new_price.to_string(),
        entry.strategy.as_str().to_string(),
        format_timestamp(&entry.changed_at),
    ])
}

fn split<'a>(line: &'a str, allowed: &[usize], expected: &'static str) -> Result<Vec<&'a str>, RecordError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if !allowed.contains(&fields.len()) {
        return Err(RecordError::FieldCount {
            expected,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

/// SKUs never contain the separator; free-text fields such as names lose it
fn join(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| f.replace(FIELD_SEPARATOR, ","))
        .collect::<Vec<_>>()
        .join(";")
}

fn decimal(field: &'static str, value: &str) -> Result<Decimal, RecordError> {
    Decimal::from_str(value.trim()).map_err(|_| invalid(field, value))
}

fn number<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value.trim().parse().map_err(|_| invalid(field, value))
}

fn timestamp(field: &'static str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, RecordError> {
    parse_timestamp(value).ok_or_else(|| invalid(field, value))
}

fn invalid(field: &'static str, value: &str) -> RecordError {
    RecordError::InvalidField {
        field,
        value: value.to_string(),
    }
}
