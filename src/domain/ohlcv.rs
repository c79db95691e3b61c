//! OHLCV bar and secondary-feed point representations.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One observation of the trends feed the volatility flag is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Align `trends` to `bars` as-of date: each bar gets the index of the latest
/// trend point dated on or before it. Bars preceding the first trend point get
/// `None`.
///
/// Both inputs must be sorted by date.
pub fn align_trends(bars: &[OhlcvBar], trends: &[TrendPoint]) -> Vec<Option<usize>> {
    let mut aligned = Vec::with_capacity(bars.len());
    let mut cursor = 0;
    let mut current: Option<usize> = None;

    for bar in bars {
        while cursor < trends.len() && trends[cursor].date <= bar.date {
            current = Some(cursor);
            cursor += 1;
        }
        aligned.push(current);
    }

    aligned
}
