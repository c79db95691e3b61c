//! Configuration validation.
//!
//! Validates all config fields before a run starts.

use crate::domain::error::SmacrossError;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_data_config(config)?;
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    validate_volatility_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_non_empty("data", "prices") {
        Some(_) => Ok(()),
        None => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "prices".to_string(),
        }),
    }
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let defaults = StrategyParams::default();
    let fast = parse_int(config, "strategy", "fast_period", defaults.fast_period)?;
    let slow = parse_int(config, "strategy", "slow_period", defaults.slow_period)?;
    let hold = parse_int(config, "strategy", "hold_bars", defaults.hold_bars)?;

    if fast <= 0 {
        return Err(invalid("strategy", "fast_period", "fast_period must be positive"));
    }
    if slow <= 0 {
        return Err(invalid("strategy", "slow_period", "slow_period must be positive"));
    }
    if fast >= slow {
        return Err(invalid(
            "strategy",
            "fast_period",
            "fast_period must be less than slow_period",
        ));
    }
    if hold <= 0 {
        return Err(invalid("strategy", "hold_bars", "hold_bars must be positive"));
    }
    if let Some(Err(raw)) = config.get_parsed_bool("strategy", "submit_close") {
        return Err(invalid(
            "strategy",
            "submit_close",
            &format!("'{raw}' is not a boolean"),
        ));
    }
    Ok(())
}

pub fn validate_volatility_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let defaults = StrategyParams::default();
    if parse_int(config, "volatility", "window", defaults.volatility_window)? <= 1 {
        return Err(invalid("volatility", "window", "window must be greater than 1"));
    }
    let threshold = match config.get_parsed_double("volatility", "threshold") {
        None => defaults.volatility_threshold,
        Some(Ok(value)) => value,
        Some(Err(raw)) => {
            return Err(invalid(
                "volatility",
                "threshold",
                &format!("'{raw}' is not a number"),
            ));
        }
    };
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(invalid(
            "volatility",
            "threshold",
            "threshold must be a non-negative number",
        ));
    }
    Ok(())
}

fn parse_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<i64, SmacrossError> {
    match config.get_parsed_int(section, key) {
        None => Ok(default as i64),
        Some(Ok(value)) => Ok(value),
        Some(Err(raw)) => Err(invalid(section, key, &format!("'{raw}' is not an integer"))),
    }
}

fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<Option<NaiveDate>, SmacrossError> {
    match config.get_date("backtest", field) {
        None => Ok(None),
        Some(Ok(date)) => Ok(Some(date)),
        Some(Err(_)) => Err(invalid(
            "backtest",
            field,
            &format!("invalid {} format, expected YYYY-MM-DD", field),
        )),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> SmacrossError {
    SmacrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
