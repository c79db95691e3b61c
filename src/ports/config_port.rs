//! Configuration access port trait.

use chrono::NaiveDate;

/// Read access to a sectioned key/value configuration.
///
/// Implementors only supply raw string lookup. The `get_parsed_*` getters
/// return `Some(Err(raw))` for values that are present but malformed; the
/// plain getters fall back to `default` in that case and when the key is
/// absent.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Non-empty string value, trimmed.
    fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn get_parsed_int(&self, section: &str, key: &str) -> Option<Result<i64, String>> {
        self.get_non_empty(section, key)
            .map(|raw| raw.parse().map_err(|_| raw))
    }

    fn get_parsed_double(&self, section: &str, key: &str) -> Option<Result<f64, String>> {
        self.get_non_empty(section, key)
            .map(|raw| raw.parse().map_err(|_| raw))
    }

    fn get_parsed_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>> {
        self.get_non_empty(section, key)
            .map(|raw| parse_bool(&raw).ok_or(raw))
    }

    /// `YYYY-MM-DD` date. `Some(Err(raw))` when present but malformed.
    fn get_date(&self, section: &str, key: &str) -> Option<Result<NaiveDate, String>> {
        self.get_non_empty(section, key)
            .map(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| raw))
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_parsed_int(section, key)
            .and_then(Result::ok)
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_parsed_double(section, key)
            .and_then(Result::ok)
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_parsed_bool(section, key)
            .and_then(Result::ok)
            .unwrap_or(default)
    }
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
