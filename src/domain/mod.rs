//! Domain layer - core business logic and entities

pub mod catalog;
pub mod competitor;
pub mod ports;
pub mod pricing;
