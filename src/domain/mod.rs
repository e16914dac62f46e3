//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod snapshot;
pub mod regime;
pub mod holdings;
pub mod rebalance;
pub mod sentiment;
pub mod engine;
pub mod config_validation;
pub mod error;
