//! Historical price access port.

use crate::domain::date_range::DateRange;
use crate::domain::error::StockboardError;
use crate::domain::price_table::{PriceSeries, PriceTable};
use crate::domain::symbol::Symbol;

pub trait PricePort {
    /// Daily adjusted close prices for one symbol over the inclusive range.
    /// An unknown symbol or an empty range is an empty series, not an error.
    fn fetch_series(&self, symbol: &Symbol, range: &DateRange) -> Result<PriceSeries, StockboardError>;

    /// Default implementation: one `fetch_series` per symbol, keyed by symbol
    /// whatever the selection size. The first failure aborts the request.
    fn fetch_prices(&self, symbols: &[Symbol], range: &DateRange) -> Result<PriceTable, StockboardError> {
        let mut table = PriceTable::new();
        for symbol in symbols {
            let series = self.fetch_series(symbol, range)?;
            tracing::debug!(%symbol, points = series.len(), "fetched price series");
            table.insert(symbol.clone(), series);
        }
        Ok(table)
    }
}
