//! Order submission port trait.

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::order::{OrderHandle, OrderIntent, OrderNotification};

pub trait OrderPort {
    /// Submit an order for `intent`, placed on bar `bar_index`.
    fn submit(
        &mut self,
        intent: OrderIntent,
        bar_index: usize,
        date: NaiveDate,
    ) -> Result<OrderHandle, SmacrossError>;

    /// Advance to bar `bar_index` and return the status changes it produced,
    /// in the order they happened.
    fn process_bar(&mut self, bar_index: usize, bar: &OhlcvBar) -> Vec<OrderNotification>;
}
