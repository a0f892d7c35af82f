//! Configuration validation.
//!
//! Checks every config field before the first network request.

use crate::domain::date_range::{min_start_date, parse_date};
use crate::domain::error::StockboardError;
use crate::domain::symbol::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const PROVIDERS: &[&str] = &["yahoo", "csv"];

/// Configured dates must not be after `today`.
pub fn validate_dashboard_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(), StockboardError> {
    validate_directory(config)?;
    validate_provider(config)?;
    validate_positive_int(config, "directory", "cache_ttl_secs")?;
    validate_positive_int(config, "prices", "timeout_secs")?;
    validate_dates(config, today)?;
    validate_symbols(config)?;
    validate_output(config)?;
    Ok(())
}

fn validate_directory(config: &dyn ConfigPort) -> Result<(), StockboardError> {
    if let Some(source) = config.get_string("directory", "source") {
        if source.trim().is_empty() {
            return Err(StockboardError::config_invalid(
                "directory",
                "source",
                "source must not be empty (set [directory] enabled = false instead)",
            ));
        }
    }
    if let Some(column) = config.get_string("directory", "symbol_column") {
        if column.trim().is_empty() {
            return Err(StockboardError::config_invalid(
                "directory",
                "symbol_column",
                "symbol_column must not be empty",
            ));
        }
    }
    Ok(())
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), StockboardError> {
    let provider = config
        .get_string("prices", "provider")
        .map(|p| p.trim().to_lowercase())
        .unwrap_or_else(|| "yahoo".to_string());

    if !PROVIDERS.contains(&provider.as_str()) {
        return Err(StockboardError::config_invalid(
            "prices",
            "provider",
            format!("unknown provider '{}', expected one of {}", provider, PROVIDERS.join(", ")),
        ));
    }

    if provider == "csv" {
        match config.get_string("prices", "data_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            _ => {
                return Err(StockboardError::ConfigMissing {
                    section: "prices".to_string(),
                    key: "data_dir".to_string(),
                })
            }
        }
    }
    Ok(())
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), StockboardError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => Ok(()),
        _ => Err(StockboardError::config_invalid(
            section,
            key,
            format!("{} must be a positive integer", key),
        )),
    }
}

fn validate_dates(config: &dyn ConfigPort, today: NaiveDate) -> Result<(), StockboardError> {
    let start = optional_date(config, "start_date")?;
    let end = optional_date(config, "end_date")?;

    for (key, date) in [("start_date", start), ("end_date", end)] {
        if let Some(date) = date.filter(|d| *d > today) {
            return Err(StockboardError::config_invalid(
                "dashboard",
                key,
                format!("{} {} is in the future (today is {})", key, date, today),
            ));
        }
    }

    if let Some(start) = start {
        if start < min_start_date() {
            return Err(StockboardError::config_invalid(
                "dashboard",
                "start_date",
                format!("start_date must not be before {}", min_start_date()),
            ));
        }
    }

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(StockboardError::config_invalid(
                "dashboard",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn optional_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, StockboardError> {
    match config.get_string("dashboard", key) {
        None => Ok(None),
        Some(s) => parse_date(&s).map(Some).ok_or_else(|| {
            StockboardError::config_invalid(
                "dashboard",
                key,
                format!("invalid {} format, expected YYYY-MM-DD", key),
            )
        }),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), StockboardError> {
    if let Some(symbols) = config.get_string("dashboard", "symbols") {
        parse_symbols(&symbols).map_err(|e| {
            StockboardError::config_invalid("dashboard", "symbols", e.to_string())
        })?;
    }
    Ok(())
}

fn validate_output(config: &dyn ConfigPort) -> Result<(), StockboardError> {
    match config.get_string("report", "output") {
        Some(s) if s.trim().is_empty() => Err(StockboardError::config_invalid(
            "report",
            "output",
            "output must not be empty",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        values: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                values: HashMap::new(),
            }
        }

        fn set(mut self, section: &str, key: &str, value: &str) -> Self {
            self.values
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn assert_invalid(config: &MockConfig, expected_key: &str) {
        match validate_dashboard_config(config, today()) {
            Err(StockboardError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_dashboard_config(&MockConfig::new(), today()).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let config = MockConfig::new()
            .set("directory", "source", "constituents.csv")
            .set("directory", "cache_ttl_secs", "3600")
            .set("prices", "provider", "csv")
            .set("prices", "data_dir", "data")
            .set("prices", "timeout_secs", "10")
            .set("dashboard", "symbols", "AAPL,MSFT")
            .set("dashboard", "start_date", "2015-01-01")
            .set("dashboard", "end_date", "2020-01-01")
            .set("report", "output", "out.html");
        assert!(validate_dashboard_config(&config, today()).is_ok());
    }

    #[test]
    fn unknown_provider() {
        assert_invalid(&MockConfig::new().set("prices", "provider", "bloomberg"), "provider");
    }

    #[test]
    fn provider_is_case_insensitive() {
        let config = MockConfig::new().set("prices", "provider", "Yahoo");
        assert!(validate_dashboard_config(&config, today()).is_ok());
    }

    #[test]
    fn csv_provider_requires_data_dir() {
        let config = MockConfig::new().set("prices", "provider", "csv");
        assert!(matches!(
            validate_dashboard_config(&config, today()),
            Err(StockboardError::ConfigMissing { key, .. }) if key == "data_dir"
        ));
    }

    #[test]
    fn non_positive_ttl() {
        assert_invalid(&MockConfig::new().set("directory", "cache_ttl_secs", "0"), "cache_ttl_secs");
        assert_invalid(&MockConfig::new().set("directory", "cache_ttl_secs", "soon"), "cache_ttl_secs");
    }

    #[test]
    fn non_positive_timeout() {
        assert_invalid(&MockConfig::new().set("prices", "timeout_secs", "-5"), "timeout_secs");
    }

    #[test]
    fn bad_date_format() {
        assert_invalid(&MockConfig::new().set("dashboard", "start_date", "2020/01/01"), "start_date");
        assert_invalid(&MockConfig::new().set("dashboard", "end_date", "yesterday"), "end_date");
    }

    #[test]
    fn start_before_floor() {
        assert_invalid(&MockConfig::new().set("dashboard", "start_date", "1985-06-01"), "start_date");
    }

    #[test]
    fn start_after_end() {
        let config = MockConfig::new()
            .set("dashboard", "start_date", "2021-01-01")
            .set("dashboard", "end_date", "2020-01-01");
        assert_invalid(&config, "start_date");
    }

    #[test]
    fn equal_start_and_end_is_valid() {
        let config = MockConfig::new()
            .set("dashboard", "start_date", "2021-01-01")
            .set("dashboard", "end_date", "2021-01-01");
        assert!(validate_dashboard_config(&config, today()).is_ok());
    }

    #[test]
    fn future_end_date() {
        assert_invalid(&MockConfig::new().set("dashboard", "end_date", "2030-01-01"), "end_date");
    }

    #[test]
    fn future_start_date() {
        assert_invalid(&MockConfig::new().set("dashboard", "start_date", "2024-06-02"), "start_date");
    }

    #[test]
    fn end_date_today_is_valid() {
        let config = MockConfig::new().set("dashboard", "end_date", "2024-06-01");
        assert!(validate_dashboard_config(&config, today()).is_ok());
    }

    #[test]
    fn duplicate_symbols() {
        assert_invalid(&MockConfig::new().set("dashboard", "symbols", "AAPL,aapl"), "symbols");
    }

    #[test]
    fn empty_symbol_column() {
        assert_invalid(&MockConfig::new().set("directory", "symbol_column", " "), "symbol_column");
    }

    #[test]
    fn empty_output() {
        assert_invalid(&MockConfig::new().set("report", "output", ""), "output");
    }
}
