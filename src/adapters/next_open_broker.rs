//! Order port that fills every order at the next bar's open.
//!
//! No cash, fee, or slippage model: an order placed on bar `n` reports
//! Submitted, Accepted and Completed on bar `n + 1` at that bar's open. A
//! CLOSE fills on the side opposite the open position, and is rejected when
//! there is nothing to close.

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::order::{OrderHandle, OrderIntent, OrderNotification, OrderSide, OrderStatus};
use crate::ports::order_port::OrderPort;

#[derive(Debug, Clone)]
struct QueuedOrder {
    handle: OrderHandle,
    intent: OrderIntent,
    placed_bar: usize,
}

#[derive(Debug, Default)]
pub struct NextOpenBroker {
    next_id: u64,
    queue: Vec<QueuedOrder>,
    open_side: Option<OrderSide>,
}

impl NextOpenBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side of the currently open position, if any.
    pub fn open_side(&self) -> Option<OrderSide> {
        self.open_side
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn fill_side(&self, intent: OrderIntent) -> Option<OrderSide> {
        match intent {
            OrderIntent::Buy => Some(OrderSide::Buy),
            OrderIntent::Sell => Some(OrderSide::Sell),
            OrderIntent::Close => match self.open_side? {
                OrderSide::Buy => Some(OrderSide::Sell),
                OrderSide::Sell => Some(OrderSide::Buy),
            },
        }
    }
}

impl OrderPort for NextOpenBroker {
    fn submit(
        &mut self,
        intent: OrderIntent,
        bar_index: usize,
        _date: NaiveDate,
    ) -> Result<OrderHandle, SmacrossError> {
        self.next_id += 1;
        let handle = OrderHandle(self.next_id);
        self.queue.push(QueuedOrder {
            handle,
            intent,
            placed_bar: bar_index,
        });
        Ok(handle)
    }

    fn process_bar(&mut self, bar_index: usize, bar: &OhlcvBar) -> Vec<OrderNotification> {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|o| o.placed_bar < bar_index);
        self.queue = waiting;

        let mut notifications = Vec::with_capacity(due.len() * 3);
        for order in due {
            let notify = |status: OrderStatus, side: OrderSide| OrderNotification {
                handle: order.handle,
                status,
                side,
                executed_price: if status == OrderStatus::Completed {
                    bar.open
                } else {
                    0.0
                },
                bar_index,
                date: bar.date,
            };

            let Some(side) = self.fill_side(order.intent) else {
                notifications.push(notify(OrderStatus::Submitted, OrderSide::Sell));
                notifications.push(notify(OrderStatus::Rejected, OrderSide::Sell));
                continue;
            };

            notifications.push(notify(OrderStatus::Submitted, side));
            notifications.push(notify(OrderStatus::Accepted, side));
            notifications.push(notify(OrderStatus::Completed, side));

            self.open_side = if order.intent.is_entry() {
                Some(side)
            } else {
                None
            };
        }

        notifications
    }
}
