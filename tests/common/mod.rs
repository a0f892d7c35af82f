#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use stockboard::domain::date_range::DateRange;
use stockboard::domain::directory::SymbolDirectory;
use stockboard::domain::error::StockboardError;
pub use stockboard::domain::price_table::{PricePoint, PriceSeries};
pub use stockboard::domain::symbol::Symbol;
use stockboard::ports::directory_port::DirectoryPort;
use stockboard::ports::price_port::PricePort;

/// Price source backed by in-memory series. Records every requested symbol
/// and filters each series to the requested range.
pub struct MockPricePort {
    pub data: HashMap<Symbol, PriceSeries>,
    pub errors: HashMap<Symbol, String>,
    pub requests: RefCell<Vec<Symbol>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(sym(symbol), PriceSeries::new(points));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(sym(symbol), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PricePort for MockPricePort {
    fn fetch_series(
        &self,
        symbol: &Symbol,
        range: &DateRange,
    ) -> Result<PriceSeries, StockboardError> {
        self.requests.borrow_mut().push(symbol.clone());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockboardError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(symbol)
            .map(|s| {
                s.points()
                    .iter()
                    .copied()
                    .filter(|p| range.contains(p.date))
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(points))
    }
}

/// Directory source with a fixed table and a call counter.
pub struct MockDirectory {
    pub entries: Vec<(String, Option<String>)>,
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fail: false,
            calls: Cell::new(0),
        }
    }

    pub fn with_entry(mut self, symbol: &str, name: &str) -> Self {
        self.entries.push((symbol.to_string(), Some(name.to_string())));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl DirectoryPort for MockDirectory {
    fn list_symbols(&self) -> Result<SymbolDirectory, StockboardError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(StockboardError::SourceUnavailable {
                source_name: "mock".into(),
                reason: "HTTP 503".into(),
            });
        }
        let mut dir = SymbolDirectory::new();
        for (symbol, name) in &self.entries {
            if let Some(symbol) = Symbol::normalize(symbol) {
                dir.insert(symbol, name.clone());
            }
        }
        Ok(dir)
    }

    fn source_name(&self) -> String {
        "mock".into()
    }
}

/// Lets a cache wrap a borrowed mock so the test can still read `calls`.
impl DirectoryPort for &MockDirectory {
    fn list_symbols(&self) -> Result<SymbolDirectory, StockboardError> {
        (**self).list_symbols()
    }

    fn source_name(&self) -> String {
        (**self).source_name()
    }
}

pub fn sym(s: &str) -> Symbol {
    s.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end, date(2025, 1, 1)).unwrap()
}

/// One price per calendar day starting at `start`.
pub fn generate_prices(start: NaiveDate, prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

/// Geometric walk alternating between two daily returns.
pub fn alternating_walk(start: NaiveDate, count: usize, up: f64, down: f64) -> Vec<PricePoint> {
    let mut price = 100.0;
    (0..count)
        .map(|i| {
            if i > 0 {
                price *= 1.0 + if i % 2 == 1 { up } else { down };
            }
            PricePoint::new(start + chrono::Duration::days(i as i64), price)
        })
        .collect()
}
