//! CSV file data adapter.
//!
//! Prices: `date,open,high,low,close,volume`. Trends: `date,value`.
//! Dates are `YYYY-MM-DD`; both files carry a header row.

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::{OhlcvBar, TrendPoint};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    prices_path: PathBuf,
    trends_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new(prices_path: PathBuf, trends_path: Option<PathBuf>) -> Self {
        Self {
            prices_path,
            trends_path,
        }
    }

    fn read_records(path: &Path) -> Result<Vec<csv::StringRecord>, SmacrossError> {
        let content = fs::read_to_string(path)
            .map_err(|e| data_error(path, format!("failed to read: {}", e)))?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        rdr.records()
            .map(|r| r.map_err(|e| data_error(path, format!("CSV parse error: {}", e))))
            .collect()
    }
}

fn data_error(path: &Path, reason: String) -> SmacrossError {
    SmacrossError::Data {
        source_name: path.display().to_string(),
        reason,
    }
}

fn parse_date(record: &csv::StringRecord, path: &Path) -> Result<NaiveDate, SmacrossError> {
    let raw = record
        .get(0)
        .ok_or_else(|| data_error(path, "missing date column".into()))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| data_error(path, format!("invalid date format '{}': {}", raw, e)))
}

fn parse_field<T>(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
) -> Result<T, SmacrossError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    record
        .get(idx)
        .ok_or_else(|| data_error(path, format!("missing {} column", name)))?
        .parse()
        .map_err(|e| data_error(path, format!("invalid {} value: {}", name, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmacrossError> {
        let path = self.prices_path.as_path();
        let mut bars = Vec::new();

        for record in Self::read_records(path)? {
            let date = parse_date(&record, path)?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_field(&record, 1, "open", path)?,
                high: parse_field(&record, 2, "high", path)?,
                low: parse_field(&record, 3, "low", path)?,
                close: parse_field(&record, 4, "close", path)?,
                volume: parse_field(&record, 5, "volume", path)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_trends(&self) -> Result<Option<Vec<TrendPoint>>, SmacrossError> {
        let Some(path) = self.trends_path.as_deref() else {
            return Ok(None);
        };

        let mut points = Self::read_records(path)?
            .iter()
            .map(|record| -> Result<TrendPoint, SmacrossError> {
                Ok(TrendPoint {
                    date: parse_date(record, path)?,
                    value: parse_field(record, 1, "value", path)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        points.sort_by_key(|p| p.date);
        Ok(Some(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let prices = dir.path().join("SPX.csv");
        let trends = dir.path().join("SPX_trends.csv");

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(&prices, csv_content).unwrap();
        fs::write(&trends, "date,value\n2024-01-14,42\n2024-01-07,30.5\n").unwrap();

        (dir, prices, trends)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn fetch_ohlcv_returns_sorted_data() {
        let (_dir, prices, _) = setup_test_data();
        let adapter = CsvAdapter::new(prices, None);

        let bars = adapter.fetch_ohlcv(None, None).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000.0);
        assert_eq!(bars[2].date, date(17));
    }

    #[test]
    fn fetch_ohlcv_filters_by_date() {
        let (_dir, prices, _) = setup_test_data();
        let adapter = CsvAdapter::new(prices, None);

        let bars = adapter.fetch_ohlcv(Some(date(16)), Some(date(16))).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(16));

        let bars = adapter.fetch_ohlcv(Some(date(16)), None).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn fetch_ohlcv_missing_file_is_error() {
        let (dir, _, _) = setup_test_data();
        let adapter = CsvAdapter::new(dir.path().join("nope.csv"), None);

        let err = adapter.fetch_ohlcv(None, None).unwrap_err();
        assert!(matches!(err, SmacrossError::Data { .. }));
    }

    #[test]
    fn fetch_ohlcv_bad_number_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n2024-01-15,100.0,110.0,90.0,abc,50000\n",
        )
        .unwrap();

        let err = CsvAdapter::new(path, None).fetch_ohlcv(None, None).unwrap_err();
        assert!(err.to_string().contains("invalid close value"));
    }

    #[test]
    fn fetch_ohlcv_bad_date_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n15/01/2024,100.0,110.0,90.0,100.0,50000\n",
        )
        .unwrap();

        let err = CsvAdapter::new(path, None).fetch_ohlcv(None, None).unwrap_err();
        assert!(err.to_string().contains("invalid date format"));
    }

    #[test]
    fn fetch_ohlcv_accepts_fractional_volume() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spx.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n2024-01-15,100.0,110.0,90.0,105.0,1234.5\n",
        )
        .unwrap();

        let bars = CsvAdapter::new(path, None).fetch_ohlcv(None, None).unwrap();
        assert_eq!(bars[0].volume, 1234.5);
    }

    #[test]
    fn fetch_trends_sorted() {
        let (_dir, prices, trends) = setup_test_data();
        let adapter = CsvAdapter::new(prices, Some(trends));

        let points = adapter.fetch_trends().unwrap().unwrap();
        assert_eq!(
            points,
            vec![
                TrendPoint {
                    date: date(7),
                    value: 30.5
                },
                TrendPoint {
                    date: date(14),
                    value: 42.0
                },
            ]
        );
    }

    #[test]
    fn fetch_trends_not_configured() {
        let (_dir, prices, _) = setup_test_data();
        let adapter = CsvAdapter::new(prices, None);
        assert_eq!(adapter.fetch_trends().unwrap(), None);
    }
}
