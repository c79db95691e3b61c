//! Market data access port trait.

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::{OhlcvBar, TrendPoint};
use chrono::NaiveDate;

pub trait DataPort {
    /// Price bars sorted by date, restricted to `[start_date, end_date]` where
    /// either bound is given.
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmacrossError>;

    /// The secondary feed sorted by date, or `None` when none is configured.
    fn fetch_trends(&self) -> Result<Option<Vec<TrendPoint>>, SmacrossError>;
}
