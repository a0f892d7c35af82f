//! Offline price adapter over a directory of per-symbol CSV files.
//!
//! Each file is `{data_dir}/{SYMBOL}.csv` with a header row holding a `date`
//! column and an `adj_close` (preferred) or `close` column. Other columns
//! are ignored.

use crate::domain::date_range::{parse_date, DateRange};
use crate::domain::error::StockboardError;
use crate::domain::price_table::{PricePoint, PriceSeries};
use crate::domain::symbol::Symbol;
use crate::ports::price_port::PricePort;
use std::fs;
use std::io;
use std::path::PathBuf;

const DATE_COLUMN: &str = "date";
const PRICE_COLUMNS: &[&str] = &["adj_close", "adjclose", "adj close", "close"];

pub struct CsvAdapter {
    data_dir: PathBuf,
}

impl CsvAdapter {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn csv_path(&self, symbol: &Symbol) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }
}

impl PricePort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &Symbol,
        range: &DateRange,
    ) -> Result<PriceSeries, StockboardError> {
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(%symbol, path = %path.display(), "no price file");
                return Ok(PriceSeries::default());
            }
            Err(e) => {
                return Err(StockboardError::Fetch {
                    symbol: symbol.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                })
            }
        };

        parse_price_csv(&content, range).map_err(|reason| StockboardError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("{}: {}", path.display(), reason),
        })
    }
}

/// Parse a price file, keeping rows inside `range`. Empty price cells are
/// skipped; anything else unparseable is an error.
pub fn parse_price_csv(content: &str, range: &DateRange) -> Result<PriceSeries, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| format!("CSV header error: {}", e))?
        .clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };

    let date_idx = find(DATE_COLUMN).ok_or("missing date column")?;
    let price_idx = PRICE_COLUMNS
        .iter()
        .find_map(|name| find(name))
        .ok_or("missing adj_close or close column")?;

    let mut points = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
        // header is line 1
        let line = line + 2;

        let date_str = record.get(date_idx).unwrap_or_default();
        let date = parse_date(date_str)
            .ok_or_else(|| format!("line {}: invalid date '{}'", line, date_str))?;
        if !range.contains(date) {
            continue;
        }

        let price_str = record.get(price_idx).unwrap_or_default();
        if price_str.is_empty() || price_str.eq_ignore_ascii_case("null") {
            continue;
        }
        let price: f64 = price_str
            .parse()
            .map_err(|e| format!("line {}: invalid price '{}': {}", line, price_str, e))?;
        points.push(PricePoint::new(date, price));
    }

    Ok(PriceSeries::new(points))
}
