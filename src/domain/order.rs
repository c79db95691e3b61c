//! Order intents, handles, statuses and notifications.

use chrono::NaiveDate;
use std::fmt;

/// What the evaluator wants done on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderIntent {
    Buy,
    Sell,
    /// Flatten the open position.
    Close,
}

impl OrderIntent {
    /// Whether the intent opens a position (as opposed to closing one).
    pub fn is_entry(self) -> bool {
        matches!(self, OrderIntent::Buy | OrderIntent::Sell)
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderIntent::Buy => "BUY",
            OrderIntent::Sell => "SELL",
            OrderIntent::Close => "CLOSE",
        }
    }
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Side of an executed order as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("BUY"),
            OrderSide::Sell => f.write_str("SELL"),
        }
    }
}

/// Opaque identifier issued by an order port on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderHandle(pub u64);

impl fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Submitted,
    Accepted,
    Completed,
    Canceled,
    Margin,
    Rejected,
}

impl OrderStatus {
    /// Completed, Canceled, Margin and Rejected end an order's life.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Submitted | OrderStatus::Accepted)
    }

    /// The failure this status represents, if any.
    pub fn failure(self) -> Option<OrderFailure> {
        match self {
            OrderStatus::Canceled => Some(OrderFailure::Canceled),
            OrderStatus::Margin => Some(OrderFailure::Margin),
            OrderStatus::Rejected => Some(OrderFailure::Rejected),
            OrderStatus::Submitted | OrderStatus::Accepted | OrderStatus::Completed => None,
        }
    }
}

/// Non-fatal order outcomes. Pending state is cleared and the position is
/// left untouched; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrderFailure {
    #[error("order canceled")]
    Canceled,
    #[error("order rejected: insufficient margin")]
    Margin,
    #[error("order rejected")]
    Rejected,
}

/// Status update for a previously submitted order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderNotification {
    pub handle: OrderHandle,
    pub status: OrderStatus,
    pub side: OrderSide,
    /// Fill price; meaningful only for `Completed`.
    pub executed_price: f64,
    /// 1-based index of the bar on which the status was reached.
    pub bar_index: usize,
    pub date: NaiveDate,
}
