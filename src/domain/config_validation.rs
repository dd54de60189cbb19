//! Configuration validation.
//!
//! Every key is optional; a value that is present must be in range. Checks
//! run against the value the pipeline would actually use, so a missing key
//! is validated through its default.

use crate::domain::error::ScalperError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScalperError> {
    validate_strategy_config(config)?;
    validate_risk_config(config)?;
    validate_filter_config(config)?;
    validate_reward_config(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), ScalperError> {
    let ema_fast = positive_int(config, "strategy", "ema_fast", 5)?;
    let ema_slow = positive_int(config, "strategy", "ema_slow", 10)?;
    if ema_fast >= ema_slow {
        return Err(ScalperError::invalid(
            "strategy",
            "ema_fast",
            "ema_fast must be less than ema_slow",
        ));
    }
    positive_int(config, "strategy", "rsi_period", 14)?;
    positive_int(config, "strategy", "atr_period", 14)?;

    let rsi_lo = config.get_double("strategy", "rsi_lo", 30.0);
    let rsi_hi = config.get_double("strategy", "rsi_hi", 70.0);
    if !(0.0..=100.0).contains(&rsi_lo) {
        return Err(ScalperError::invalid(
            "strategy",
            "rsi_lo",
            "rsi_lo must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&rsi_hi) {
        return Err(ScalperError::invalid(
            "strategy",
            "rsi_hi",
            "rsi_hi must be between 0 and 100",
        ));
    }
    if rsi_lo > rsi_hi {
        return Err(ScalperError::invalid(
            "strategy",
            "rsi_lo",
            "rsi_lo must not exceed rsi_hi",
        ));
    }
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), ScalperError> {
    positive_double(config, "risk", "atr_sl_mult", 2.0)?;
    positive_double(config, "risk", "atr_tp_mult", 3.0)?;
    positive_double(config, "risk", "equity", 10_000.0)?;
    positive_double(config, "risk", "start_equity", 10_000.0)?;
    positive_double(config, "risk", "pip_value", 10.0)?;

    let risk = config.get_double("risk", "risk_per_trade", 0.5);
    if risk <= 0.0 || risk > 100.0 {
        return Err(ScalperError::invalid(
            "risk",
            "risk_per_trade",
            "risk_per_trade must be in (0, 100]",
        ));
    }
    positive_int(config, "risk", "max_trades", 5)?;
    unit_fraction(config, "risk", "max_dd", 0.03)?;
    Ok(())
}

pub fn validate_filter_config(config: &dyn ConfigPort) -> Result<(), ScalperError> {
    positive_int(config, "filter", "train_size", 50)?;
    positive_int(config, "filter", "n_estimators", 10)?;
    positive_int(config, "filter", "max_depth", 8)?;
    if config.get_int("filter", "random_state", 42) < 0 {
        return Err(ScalperError::invalid(
            "filter",
            "random_state",
            "random_state must be non-negative",
        ));
    }
    Ok(())
}

pub fn validate_reward_config(config: &dyn ConfigPort) -> Result<(), ScalperError> {
    positive_int(config, "reward", "min_trades", 35)?;
    positive_int(config, "reward", "min_days", 5)?;
    if config.get_double("reward", "min_profit_pct", 10.0) < 0.0 {
        return Err(ScalperError::invalid(
            "reward",
            "min_profit_pct",
            "min_profit_pct must be non-negative",
        ));
    }
    unit_fraction(config, "reward", "max_dd", 0.06)?;
    unit_fraction(config, "reward", "max_daily_dd", 0.03)?;
    positive_double(config, "reward", "default_start_equity", 10_000.0)?;
    Ok(())
}

pub(crate) fn positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<usize, ScalperError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(ScalperError::invalid(
            section,
            key,
            format!("{} must be positive", key),
        ));
    }
    usize::try_from(value).map_err(|_| ScalperError::invalid(section, key, "value out of range"))
}

fn positive_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, ScalperError> {
    let value = config.get_double(section, key, default);
    if !(value > 0.0 && value.is_finite()) {
        return Err(ScalperError::invalid(
            section,
            key,
            format!("{} must be positive", key),
        ));
    }
    Ok(value)
}

fn unit_fraction(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, ScalperError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 || value >= 1.0 {
        return Err(ScalperError::invalid(
            section,
            key,
            format!("{} must be between 0 and 1", key),
        ));
    }
    Ok(value)
}
