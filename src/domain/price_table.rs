//! Price series and the symbol-keyed price table.

use crate::domain::symbol::Symbol;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A price usable as a divisor: finite and strictly positive.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Daily prices for one symbol, sorted by date. Non-trading days are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    date_index: HashMap<NaiveDate, usize>,
}

impl PriceSeries {
    /// Sorts by date; for duplicate dates the last point wins.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        let date_index = deduped
            .iter()
            .enumerate()
            .map(|(i, p)| (p.date, i))
            .collect();
        Self {
            points: deduped,
            date_index,
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.date_index.get(&date).map(|&i| self.points[i].price)
    }

    /// First observation with a valid price.
    pub fn first_valid(&self) -> Option<PricePoint> {
        self.points.iter().copied().find(|p| is_valid_price(p.price))
    }

    pub fn valid_points(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter().filter(|p| is_valid_price(p.price))
    }
}

/// Symbol → series, aligned on the union of all observed dates.
///
/// Always keyed by symbol, whatever the number of symbols; a symbol may map
/// to an empty series when the source had nothing for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    series: BTreeMap<Symbol, PriceSeries>,
    dates: Vec<NaiveDate>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: Symbol, series: PriceSeries) {
        self.series.insert(symbol, series);
        self.dates = build_unified_timeline(self.series.values());
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceSeries> {
        self.series.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &PriceSeries)> {
        self.series.iter()
    }

    pub fn symbol_count(&self) -> usize {
        self.series.len()
    }

    /// The common date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    /// True when no symbol has a single observation.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True when at least one series has a price usable as a base.
    pub fn has_valid_prices(&self) -> bool {
        self.series.values().any(|s| s.first_valid().is_some())
    }
}

impl FromIterator<(Symbol, PriceSeries)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, PriceSeries)>>(iter: I) -> Self {
        let series: BTreeMap<Symbol, PriceSeries> = iter.into_iter().collect();
        let dates = build_unified_timeline(series.values());
        Self { series, dates }
    }
}

pub fn build_unified_timeline<'a>(series: impl Iterator<Item = &'a PriceSeries>) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = series
        .flat_map(|s| s.points.iter().map(|p| p.date))
        .collect();
    unique_dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn series(points: &[(&str, f64)]) -> PriceSeries {
        PriceSeries::new(
            points
                .iter()
                .map(|&(date, price)| PricePoint::new(d(date), price))
                .collect(),
        )
    }

    #[test]
    fn series_sorts_and_indexes() {
        let s = series(&[("2024-01-03", 102.0), ("2024-01-01", 100.0), ("2024-01-02", 101.0)]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.points()[0].date, d("2024-01-01"));
        assert_eq!(s.get(d("2024-01-02")), Some(101.0));
        assert_eq!(s.get(d("2024-01-05")), None);
    }

    #[test]
    fn series_duplicate_date_last_wins() {
        let s = series(&[("2024-01-01", 100.0), ("2024-01-01", 105.0)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(d("2024-01-01")), Some(105.0));
    }

    #[test]
    fn first_valid_skips_invalid_prices() {
        let s = series(&[("2024-01-01", f64::NAN), ("2024-01-02", 0.0), ("2024-01-03", 50.0)]);
        assert_eq!(s.first_valid(), Some(PricePoint::new(d("2024-01-03"), 50.0)));
        assert_eq!(s.valid_points().count(), 1);
    }

    #[test]
    fn first_valid_none_for_empty() {
        assert_eq!(PriceSeries::default().first_valid(), None);
    }

    #[test]
    fn table_merges_dates() {
        let table: PriceTable = vec![
            (sym("AAPL"), series(&[("2024-01-02", 1.0), ("2024-01-05", 2.0)])),
            (sym("MSFT"), series(&[("2024-01-01", 1.0), ("2024-01-03", 2.0)])),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.symbol_count(), 2);
        assert_eq!(
            table.dates(),
            &[d("2024-01-01"), d("2024-01-02"), d("2024-01-03"), d("2024-01-05")]
        );
    }

    #[test]
    fn single_symbol_table_is_keyed() {
        let mut table = PriceTable::new();
        table.insert(sym("AAPL"), series(&[("2024-01-02", 1.0)]));
        assert_eq!(table.symbols().cloned().collect::<Vec<_>>(), vec![sym("AAPL")]);
        assert!(table.get(&sym("AAPL")).is_some());
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn table_with_only_empty_series_is_empty() {
        let mut table = PriceTable::new();
        table.insert(sym("DEAD"), PriceSeries::default());
        assert!(table.is_empty());
        assert_eq!(table.symbol_count(), 1);
    }

    #[test]
    fn rows_without_valid_prices() {
        let table: PriceTable = vec![(
            sym("AAPL"),
            series(&[("2024-01-02", f64::NAN), ("2024-01-03", 0.0), ("2024-01-04", f64::NAN)]),
        )]
        .into_iter()
        .collect();
        assert!(!table.is_empty());
        assert!(!table.has_valid_prices());

        let mut table = table;
        table.insert(sym("MSFT"), series(&[("2024-01-02", 370.0)]));
        assert!(table.has_valid_prices());
    }
}
