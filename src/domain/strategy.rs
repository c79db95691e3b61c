//! Strategy parameters.

use crate::domain::evaluator::{DEFAULT_HOLD_BARS, EvaluatorConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub name: String,
    pub fast_period: usize,
    pub slow_period: usize,
    pub hold_bars: usize,
    pub submit_close: bool,
    pub volatility_window: usize,
    pub volatility_threshold: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            name: "SMA Crossover".into(),
            fast_period: 50,
            slow_period: 200,
            hold_bars: DEFAULT_HOLD_BARS,
            submit_close: false,
            volatility_window: 20,
            volatility_threshold: 2.0,
        }
    }
}

impl StrategyParams {
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            hold_bars: self.hold_bars,
            submit_close: self.submit_close,
        }
    }

    /// Bars needed before the first crossover can be evaluated: the slow
    /// average's warmup plus one for the previous-bar lookback.
    pub fn required_bars(&self) -> usize {
        self.fast_period.max(self.slow_period) + 1
    }
}
