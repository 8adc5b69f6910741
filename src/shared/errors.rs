//! Error handling for the application

use rust_decimal::Decimal;
use thiserror::Error;

/// Pricing errors raised while computing a single product's new price
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("no competitor data available")]
    NoCompetitorData,

    #[error("invalid price corridor: min {min} > max {max}")]
    InvalidBounds { min: Decimal, max: Decimal },

    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Domain value validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("SKU must not be empty")]
    EmptySku,

    #[error("SKU must not contain ';': {0:?}")]
    SeparatorInSku(String),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("min price {min} exceeds max price {max}")]
    MinAboveMax { min: Decimal, max: Decimal },

    #[error("sale quantity must be positive, got {0}")]
    NonPositiveQuantity(u32),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Store-related errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product already exists: {0}")]
    DuplicateSku(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("No {0} ids left")]
    IdsExhausted(&'static str),

    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        requested: u32,
        available: u32,
    },

    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Malformed flat record, recovered at the persistence boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: &'static str, actual: usize },

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
