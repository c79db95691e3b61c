//! Trends volatility indicator.
//!
//! Computed on the secondary (trends) feed and aligned to the price bars
//! as-of date. For each trend point with a full trailing window of `window`
//! values (current included):
//!
//! TVI[i] = 1 if X[i] > mean(window) + threshold * stddev(window), else 0
//!
//! Warmup: first (window-1) trend points are invalid. Bars dated before the
//! first trend point, or aligned to a warmup point, are invalid.

use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{OhlcvBar, TrendPoint, align_trends};

/// Flag values on the trends feed's own clock; `None` marks warmup points.
pub fn trend_flags(trends: &[TrendPoint], window: usize, threshold: f64) -> Vec<Option<f64>> {
    let values: Vec<f64> = trends.iter().map(|t| t.value).collect();

    values
        .iter()
        .zip(calculate_stddev(&values, window))
        .map(|(&x, band)| {
            let (mean, sd) = band?;
            Some(if x > mean + threshold * sd { 1.0 } else { 0.0 })
        })
        .collect()
}

pub fn calculate_trends_volatility(
    bars: &[OhlcvBar],
    trends: &[TrendPoint],
    window: usize,
    threshold: f64,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::TrendsVolatility {
        window,
        threshold_x100: (threshold * 100.0).round() as u32,
    };

    if window == 0 || bars.is_empty() {
        return IndicatorSeries::empty(indicator_type);
    }

    let flags = trend_flags(trends, window, threshold);
    let values = bars
        .iter()
        .zip(align_trends(bars, trends))
        .map(|(bar, idx)| {
            let flag = idx.and_then(|i| flags[i]);
            IndicatorPoint {
                date: bar.date,
                valid: flag.is_some(),
                value: flag.unwrap_or(0.0),
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
