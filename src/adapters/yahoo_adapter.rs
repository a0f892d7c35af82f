//! Yahoo Finance chart API price adapter.

use crate::adapters::http_client;
use crate::domain::date_range::DateRange;
use crate::domain::error::StockboardError;
use crate::domain::price_table::{PricePoint, PriceSeries};
use crate::domain::symbol::Symbol;
use crate::ports::price_port::PricePort;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration;

const SECONDS_PER_DAY: i64 = 86_400;

pub struct YahooAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl YahooAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StockboardError> {
        let client = http_client(timeout).map_err(|reason| StockboardError::Fetch {
            symbol: "*".to_string(),
            reason,
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn chart_url(&self, symbol: &Symbol) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

// Minimal response structs (only what we read)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

impl ChartError {
    fn is_no_data(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.contains("No data found"))
    }
}

/// True when a 404 body is the chart API's own "no data" answer. Any other
/// 404 (wrong base URL, proxy page) is a fetch failure.
pub fn is_unknown_symbol_body(body: &str) -> bool {
    serde_json::from_str::<ChartResponse>(body)
        .ok()
        .and_then(|r| r.chart.error)
        .is_some_and(|e| e.is_no_data())
}

/// Unix seconds for `[start 00:00 UTC, end + 1 day 00:00 UTC)`.
pub fn period_bounds(range: &DateRange) -> (i64, i64) {
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc().timestamp();
    (midnight(range.start()), midnight(range.end()) + SECONDS_PER_DAY)
}

/// Parse a chart API body into a series restricted to `range`.
///
/// Adjusted closes are preferred; quote closes are used when the response
/// carries no `adjclose` block. Null and non-finite values are skipped. A
/// "not found" error body is an empty series.
pub fn parse_chart_response(body: &str, range: &DateRange) -> Result<PriceSeries, String> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| format!("invalid chart response: {}", e))?;

    if let Some(error) = response.chart.error {
        if error.is_no_data() {
            return Ok(PriceSeries::default());
        }
        return Err(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        ));
    }

    let Some(result) = response.chart.result.and_then(|mut r| r.pop()) else {
        return Ok(PriceSeries::default());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let prices = match result.indicators.adjclose.into_iter().next() {
        Some(adj) if !adj.adjclose.is_empty() => adj.adjclose,
        _ => result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default(),
    };

    // timestamp aligns with the price list by index
    let mut points = Vec::with_capacity(result.timestamp.len());
    for (ts, price) in result.timestamp.iter().zip(prices) {
        let Some(price) = price.filter(|p| p.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| format!("bad timestamp {}", ts))?
            .date_naive();
        if range.contains(date) {
            points.push(PricePoint::new(date, price));
        }
    }

    Ok(PriceSeries::new(points))
}

impl PricePort for YahooAdapter {
    fn fetch_series(
        &self,
        symbol: &Symbol,
        range: &DateRange,
    ) -> Result<PriceSeries, StockboardError> {
        let fetch_err = |reason: String| StockboardError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let (period1, period2) = period_bounds(range);
        let url = self.chart_url(symbol);
        tracing::debug!(%url, period1, period2, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,splits".to_string()),
            ])
            .send()
            .map_err(|e| fetch_err(format!("request failed: {}", e)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let body = resp.text().unwrap_or_default();
            if is_unknown_symbol_body(&body) {
                tracing::warn!(%symbol, "symbol not known to price source");
                return Ok(PriceSeries::default());
            }
            return Err(fetch_err(format!("HTTP {} from {}", status, url)));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(fetch_err("rate limited by price source".to_string()));
        }
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status)));
        }

        let body = resp
            .text()
            .map_err(|e| fetch_err(format!("failed to read body: {}", e)))?;
        parse_chart_response(&body, range).map_err(fetch_err)
    }
}
