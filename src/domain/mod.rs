//! Core domain types and logic: indicators, signals, the learned filter,
//! risk sizing, trade proposals and the challenge reward.

pub mod ohlcv;
pub mod indicator;
pub mod filters;
pub mod signal;
pub mod classifier;
pub mod risk;
pub mod execution;
pub mod pipeline;
pub mod reward;
pub mod config_validation;
pub mod error;
