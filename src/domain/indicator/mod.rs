//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values aligned 1:1 with bars

pub mod sma;
pub mod stddev;
pub mod trends_volatility;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    TrendsVolatility { window: usize, threshold_x100: u32 },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Value at `index + offset` (0 = current bar, -1 = previous bar).
    ///
    /// `None` when the target falls outside the series or on a warmup point.
    pub fn lookback(&self, index: usize, offset: isize) -> Option<f64> {
        let target = index.checked_add_signed(offset)?;
        self.values
            .get(target)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::TrendsVolatility {
                window,
                threshold_x100,
            } => {
                let threshold = *threshold_x100 as f64 / 100.0;
                write!(f, "TVI({},{})", window, threshold)
            }
        }
    }
}
