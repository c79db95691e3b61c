//! Bar-by-bar strategy loop.
//!
//! On every bar the order port is advanced first and its notifications are
//! delivered to the evaluator; then, once all indicator lookbacks are
//! available, the evaluator runs. Bar indices are 1-based.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::domain::evaluator::{Lookback, SignalEvaluator, SignalInputs};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::trends_volatility::calculate_trends_volatility;
use crate::domain::indicator::{IndicatorPoint, IndicatorType};
use crate::domain::ohlcv::{OhlcvBar, TrendPoint};
use crate::domain::order::{OrderFailure, OrderIntent, OrderSide, OrderStatus};
use crate::domain::strategy::StrategyParams;
use crate::ports::order_port::OrderPort;

#[derive(Debug, Clone)]
pub struct StrategyIndicators {
    pub fast_ma: IndicatorSeries,
    pub slow_ma: IndicatorSeries,
    pub volatility: IndicatorSeries,
}

/// Compute the strategy's indicators over `bars`.
///
/// Without a trends feed the volatility flag is a constant, valid 0.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    trends: Option<&[TrendPoint]>,
    params: &StrategyParams,
) -> StrategyIndicators {
    let volatility = match trends {
        Some(trends) => calculate_trends_volatility(
            bars,
            trends,
            params.volatility_window,
            params.volatility_threshold,
        ),
        None => IndicatorSeries {
            indicator_type: IndicatorType::TrendsVolatility {
                window: 0,
                threshold_x100: 0,
            },
            values: bars
                .iter()
                .map(|b| IndicatorPoint {
                    date: b.date,
                    valid: true,
                    value: 0.0,
                })
                .collect(),
        },
    };

    StrategyIndicators {
        fast_ma: calculate_sma(bars, params.fast_period),
        slow_ma: calculate_sma(bars, params.slow_period),
        volatility,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentRecord {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub intent: OrderIntent,
    pub close: f64,
    pub submitted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FillRecord {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub side: OrderSide,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub failure: OrderFailure,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub bars: usize,
    pub evaluated: usize,
    pub intents: Vec<IntentRecord>,
    pub fills: Vec<FillRecord>,
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    pub fn count(&self, intent: OrderIntent) -> usize {
        self.intents.iter().filter(|r| r.intent == intent).count()
    }
}

/// Build the evaluator inputs for bar `i` (0-based), or `None` while any
/// lookback is still warming up.
pub fn signal_inputs(
    i: usize,
    bar: &OhlcvBar,
    indicators: &StrategyIndicators,
) -> Option<SignalInputs> {
    let fast_ma = Lookback::new(
        indicators.fast_ma.lookback(i, -1)?,
        indicators.fast_ma.lookback(i, 0)?,
    );
    let slow_ma = Lookback::new(
        indicators.slow_ma.lookback(i, -1)?,
        indicators.slow_ma.lookback(i, 0)?,
    );
    let volatility_flag = indicators.volatility.lookback(i, 0)?;

    Some(SignalInputs {
        bar_index: i + 1,
        date: bar.date,
        fast_ma,
        slow_ma,
        volatility_flag,
        close: bar.close,
    })
}

pub fn run_strategy(
    bars: &[OhlcvBar],
    indicators: &StrategyIndicators,
    evaluator: &mut SignalEvaluator,
    orders: &mut dyn OrderPort,
) -> RunReport {
    let mut report = RunReport {
        bars: bars.len(),
        ..RunReport::default()
    };

    for (i, bar) in bars.iter().enumerate() {
        let bar_index = i + 1;

        for notification in orders.process_bar(bar_index, bar) {
            match notification.status {
                OrderStatus::Completed => report.fills.push(FillRecord {
                    bar_index: notification.bar_index,
                    date: notification.date,
                    side: notification.side,
                    price: notification.executed_price,
                }),
                status => {
                    if let Some(failure) = status.failure() {
                        report.failures.push(FailureRecord {
                            bar_index: notification.bar_index,
                            date: notification.date,
                            failure,
                        });
                    }
                }
            }
            evaluator.on_order_notification(&notification);
        }

        let Some(inputs) = signal_inputs(i, bar, indicators) else {
            trace!("{} warming up", bar.date);
            continue;
        };
        report.evaluated += 1;

        if let Some(intent) = evaluator.evaluate(&inputs, orders) {
            report.intents.push(IntentRecord {
                bar_index,
                date: bar.date,
                intent,
                close: bar.close,
                submitted: evaluator.pending_order().is_some(),
            });
        }
    }

    debug!(
        "run complete: {} bars, {} evaluated, {} intents, {} fills, {} failures",
        report.bars,
        report.evaluated,
        report.intents.len(),
        report.fills.len(),
        report.failures.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    fn small_params() -> StrategyParams {
        StrategyParams {
            fast_period: 2,
            slow_period: 3,
            volatility_window: 2,
            ..StrategyParams::default()
        }
    }

    #[test]
    fn inputs_wait_for_slow_lookback() {
        let bars = make_bars(&[10.0, 10.0, 10.0, 10.0, 10.0]);
        let ind = compute_indicators(&bars, None, &small_params());

        // slow SMA(3) valid from index 2; previous value needed too
        assert!(signal_inputs(2, &bars[2], &ind).is_none());
        let inputs = signal_inputs(3, &bars[3], &ind).unwrap();
        assert_eq!(inputs.bar_index, 4);
        assert_eq!(inputs.volatility_flag, 0.0);
    }

    #[test]
    fn missing_trends_means_calm() {
        let bars = make_bars(&[10.0, 11.0]);
        let ind = compute_indicators(&bars, None, &small_params());
        assert!(ind.volatility.values.iter().all(|p| p.valid && p.value == 0.0));
    }

    #[test]
    fn inputs_carry_lookbacks() {
        let bars = make_bars(&[10.0, 10.0, 10.0, 16.0]);
        let ind = compute_indicators(&bars, None, &small_params());
        let inputs = signal_inputs(3, &bars[3], &ind).unwrap();

        assert_eq!(inputs.fast_ma, Lookback::new(10.0, 13.0));
        assert_eq!(inputs.slow_ma, Lookback::new(10.0, 12.0));
        assert_eq!(inputs.close, 16.0);
    }

    #[test]
    fn report_counts_by_intent() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let record = |intent| IntentRecord {
            bar_index: 1,
            date: start,
            intent,
            close: 1.0,
            submitted: true,
        };
        let report = RunReport {
            intents: vec![
                record(OrderIntent::Buy),
                record(OrderIntent::Close),
                record(OrderIntent::Close),
            ],
            ..RunReport::default()
        };
        assert_eq!(report.count(OrderIntent::Buy), 1);
        assert_eq!(report.count(OrderIntent::Sell), 0);
        assert_eq!(report.count(OrderIntent::Close), 2);
    }
}
