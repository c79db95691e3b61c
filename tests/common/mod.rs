#![allow(dead_code)]

use chrono::NaiveDate;
use smacross::domain::error::SmacrossError;
pub use smacross::domain::ohlcv::{OhlcvBar, TrendPoint};
use smacross::domain::order::{
    OrderHandle, OrderIntent, OrderNotification, OrderSide, OrderStatus,
};
use smacross::domain::strategy::StrategyParams;
use smacross::ports::data_port::DataPort;
use smacross::ports::order_port::OrderPort;

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub trends: Option<Vec<TrendPoint>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars,
            trends: None,
            error: None,
        }
    }

    pub fn with_trends(mut self, trends: Vec<TrendPoint>) -> Self {
        self.trends = Some(trends);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmacrossError> {
        if let Some(reason) = &self.error {
            return Err(SmacrossError::Data {
                source_name: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect())
    }

    fn fetch_trends(&self) -> Result<Option<Vec<TrendPoint>>, SmacrossError> {
        Ok(self.trends.clone())
    }
}

/// Order port that answers every order on the following bar with `status`.
pub struct ScriptedBroker {
    pub status: OrderStatus,
    pub submitted: Vec<(OrderHandle, OrderIntent, usize)>,
    queue: Vec<(OrderHandle, OrderIntent, usize)>,
}

impl ScriptedBroker {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            submitted: Vec::new(),
            queue: Vec::new(),
        }
    }
}

impl OrderPort for ScriptedBroker {
    fn submit(
        &mut self,
        intent: OrderIntent,
        bar_index: usize,
        _date: NaiveDate,
    ) -> Result<OrderHandle, SmacrossError> {
        let handle = OrderHandle(self.submitted.len() as u64 + 1);
        self.submitted.push((handle, intent, bar_index));
        self.queue.push((handle, intent, bar_index));
        Ok(handle)
    }

    fn process_bar(&mut self, bar_index: usize, bar: &OhlcvBar) -> Vec<OrderNotification> {
        let due: Vec<_> = self.queue.drain(..).collect();
        let mut out = Vec::new();
        for (handle, intent, placed) in due {
            if placed >= bar_index {
                self.queue.push((handle, intent, placed));
                continue;
            }
            let side = match intent {
                OrderIntent::Buy => OrderSide::Buy,
                OrderIntent::Sell | OrderIntent::Close => OrderSide::Sell,
            };
            for status in [OrderStatus::Submitted, self.status] {
                out.push(OrderNotification {
                    handle,
                    status,
                    side,
                    executed_price: bar.open,
                    bar_index,
                    date: bar.date,
                });
            }
        }
        out
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily bars from 2024-01-01 with `open = close - 1`.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Daily trend points from 2024-01-01.
pub fn trends_from_values(values: &[f64]) -> Vec<TrendPoint> {
    let start = date(2024, 1, 1);
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| TrendPoint {
            date: start + chrono::Duration::days(i as i64),
            value,
        })
        .collect()
}

/// Six flat bars, then a steady climb: SMA(2) crosses above SMA(4) on bar 7.
pub fn golden_cross_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 6];
    closes.extend((1..=9).map(|i| 100.0 + 10.0 * i as f64));
    closes
}

/// Six flat bars, then a steady decline: SMA(2) crosses below SMA(4) on bar 7.
pub fn death_cross_closes() -> Vec<f64> {
    let mut closes = vec![200.0; 6];
    closes.extend((1..=9).map(|i| 200.0 - 10.0 * i as f64));
    closes
}

pub fn small_params() -> StrategyParams {
    StrategyParams {
        name: "Test".into(),
        fast_period: 2,
        slow_period: 4,
        hold_bars: 5,
        submit_close: false,
        volatility_window: 3,
        volatility_threshold: 1.0,
    }
}
