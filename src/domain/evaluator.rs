//! Signal evaluation and order-state tracking.
//!
//! While flat, a volatility flag of 1 asks for a SELL and an edge-triggered
//! moving-average crossover asks for a BUY (upward) or SELL (downward). When
//! both fire on the same bar the crossover wins. While in the market, a CLOSE
//! is raised once the position has been held for `hold_bars` bars; it is only
//! sent to the order port when `submit_close` is set.
//!
//! Only one order may be in flight: nothing is evaluated while an order is
//! pending, and the position flag changes only on `Completed` notifications.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::order::{OrderHandle, OrderIntent, OrderNotification, OrderSide, OrderStatus};
use crate::ports::order_port::OrderPort;

pub const DEFAULT_HOLD_BARS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    pub hold_bars: usize,
    pub submit_close: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            hold_bars: DEFAULT_HOLD_BARS,
            submit_close: false,
        }
    }
}

/// Indicator value at offsets 0 and -1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookback {
    pub current: f64,
    pub previous: f64,
}

impl Lookback {
    pub fn new(previous: f64, current: f64) -> Self {
        Self { current, previous }
    }
}

/// Snapshot of everything a single evaluation reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInputs {
    pub bar_index: usize,
    pub date: NaiveDate,
    pub fast_ma: Lookback,
    pub slow_ma: Lookback,
    pub volatility_flag: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOrder {
    pub handle: OrderHandle,
    pub intent: OrderIntent,
}

#[derive(Debug, Default)]
pub struct SignalEvaluator {
    config: EvaluatorConfig,
    pending_order: Option<PendingOrder>,
    in_position: bool,
    bar_opened: Option<usize>,
}

pub fn crossed_above(fast: Lookback, slow: Lookback) -> bool {
    fast.current > slow.current && fast.previous <= slow.previous
}

pub fn crossed_below(fast: Lookback, slow: Lookback) -> bool {
    fast.current < slow.current && fast.previous >= slow.previous
}

impl SignalEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn pending_order(&self) -> Option<PendingOrder> {
        self.pending_order
    }

    pub fn in_position(&self) -> bool {
        self.in_position
    }

    pub fn bar_opened(&self) -> Option<usize> {
        self.bar_opened
    }

    /// The intent the rules produce for `inputs`, without side effects.
    pub fn decide(&self, inputs: &SignalInputs) -> Option<OrderIntent> {
        if self.pending_order.is_some() {
            return None;
        }

        if self.in_position {
            let opened = self.bar_opened?;
            return (inputs.bar_index >= opened + self.config.hold_bars)
                .then_some(OrderIntent::Close);
        }

        let mut intent = None;

        if inputs.volatility_flag == 1.0 {
            intent = Some(OrderIntent::Sell);
        }

        if crossed_above(inputs.fast_ma, inputs.slow_ma) {
            intent = Some(OrderIntent::Buy);
        } else if crossed_below(inputs.fast_ma, inputs.slow_ma) {
            intent = Some(OrderIntent::Sell);
        }

        intent
    }

    /// The crossover intent that replaced a volatility SELL on this bar, if
    /// both fired while flat.
    pub fn overridden_volatility_sell(&self, inputs: &SignalInputs) -> Option<OrderIntent> {
        if self.pending_order.is_some() || self.in_position || inputs.volatility_flag != 1.0 {
            return None;
        }
        if crossed_above(inputs.fast_ma, inputs.slow_ma) {
            Some(OrderIntent::Buy)
        } else if crossed_below(inputs.fast_ma, inputs.slow_ma) {
            Some(OrderIntent::Sell)
        } else {
            None
        }
    }

    /// Evaluate one bar and submit the resulting order, if any.
    ///
    /// Returns the intent the rules produced. A CLOSE is returned even when
    /// it is not submitted; an entry whose submission failed is not.
    pub fn evaluate(
        &mut self,
        inputs: &SignalInputs,
        orders: &mut dyn OrderPort,
    ) -> Option<OrderIntent> {
        if self.pending_order.is_some() {
            return None;
        }

        let date = inputs.date;
        debug!("{date} Volatile?: {}", inputs.volatility_flag);

        let intent = self.decide(inputs)?;

        if let Some(crossover) = self.overridden_volatility_sell(inputs) {
            debug!("{date} volatility SELL superseded by {crossover} crossover");
        }

        info!("{date} {intent} CREATE {:.2}", inputs.close);

        if intent == OrderIntent::Close && !self.config.submit_close {
            return Some(intent);
        }

        match orders.submit(intent, inputs.bar_index, date) {
            Ok(handle) => {
                self.pending_order = Some(PendingOrder { handle, intent });
                Some(intent)
            }
            Err(e) => {
                warn!("{date} {intent} not submitted: {e}");
                None
            }
        }
    }

    pub fn on_order_notification(&mut self, notification: &OrderNotification) {
        let date = notification.date;

        let pending = match self.pending_order {
            Some(p) if p.handle == notification.handle => p,
            _ => {
                warn!(
                    "{date} ignoring {:?} for unknown order {}",
                    notification.status, notification.handle
                );
                return;
            }
        };

        match notification.status {
            OrderStatus::Submitted | OrderStatus::Accepted => {}
            OrderStatus::Completed => {
                let price = notification.executed_price;
                match notification.side {
                    OrderSide::Buy => info!("{date} BUY EXECUTED, {price:.2}"),
                    OrderSide::Sell => info!("{date} SELL EXECUTED, {price:.2}"),
                }
                if pending.intent.is_entry() {
                    self.in_position = true;
                    self.bar_opened = Some(notification.bar_index);
                } else {
                    self.in_position = false;
                    self.bar_opened = None;
                }
                self.pending_order = None;
            }
            OrderStatus::Canceled | OrderStatus::Margin | OrderStatus::Rejected => {
                info!("{date} Order Canceled/Margin/Rejected");
                self.pending_order = None;
            }
        }
    }
}
