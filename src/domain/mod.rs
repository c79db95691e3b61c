//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod evaluator;
pub mod indicator;
pub mod ohlcv;
pub mod order;
pub mod runner;
pub mod strategy;
