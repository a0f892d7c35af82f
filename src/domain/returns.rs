//! Normalized price series and annualized return/risk statistics.
//!
//! Every symbol is handled independently: normalization uses the symbol's own
//! first valid price and daily returns are taken between consecutive valid
//! observations of that symbol, so gaps in one series never affect another.

use crate::domain::price_table::{PriceSeries, PriceTable};
use crate::domain::recommendation::{classify, Recommendation};
use crate::domain::symbol::Symbol;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Base value of every normalized series.
pub const NORMALIZED_BASE: f64 = 100.0;
/// Sample standard deviation needs at least this many returns.
pub const MIN_RETURNS_FOR_STD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Prices rebased so the first valid observation is exactly 100.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    /// False when the source series had no valid observation.
    pub fn is_defined(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn first(&self) -> Option<&NormalizedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&NormalizedPoint> {
        self.points.last()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }
}

pub fn normalize(series: &PriceSeries) -> NormalizedSeries {
    let Some(base) = series.first_valid() else {
        return NormalizedSeries::default();
    };

    let points = series
        .valid_points()
        .map(|p| NormalizedPoint {
            date: p.date,
            value: p.price / base.price * NORMALIZED_BASE,
        })
        .collect();

    NormalizedSeries { points }
}

/// Percent change between consecutive valid observations. The first
/// observation has no predecessor and yields nothing.
pub fn daily_returns(series: &PriceSeries) -> Vec<f64> {
    let valid: Vec<f64> = series.valid_points().map(|p| p.price).collect();
    valid
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_RETURNS_FOR_STD {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn annualize_mean(mean_daily: f64) -> f64 {
    mean_daily * TRADING_DAYS_PER_YEAR
}

/// Standard deviation scales with the square root of time.
pub fn annualize_std(std_daily: f64) -> f64 {
    std_daily * TRADING_DAYS_PER_YEAR.sqrt()
}

pub fn de_annualize_mean(mean_annual: f64) -> f64 {
    mean_annual / TRADING_DAYS_PER_YEAR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsStatus {
    Complete,
    /// Fewer than two daily returns; mean and/or std are undefined.
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStats {
    pub observations: usize,
    pub mean_daily: Option<f64>,
    pub std_daily: Option<f64>,
    pub mean_annual: Option<f64>,
    pub std_annual: Option<f64>,
    pub recommendation: Recommendation,
}

impl ReturnStats {
    pub fn from_returns(returns: &[f64]) -> Self {
        let mean_daily = mean(returns);
        let std_daily = sample_std(returns);
        let mean_annual = mean_daily.map(annualize_mean);
        let std_annual = std_daily.map(annualize_std);

        let recommendation = match (mean_annual, std_annual) {
            (Some(m), Some(s)) => classify(m, s),
            _ => Recommendation::Hold,
        };

        Self {
            observations: returns.len(),
            mean_daily,
            std_daily,
            mean_annual,
            std_annual,
            recommendation,
        }
    }

    pub fn status(&self) -> StatsStatus {
        if self.mean_annual.is_some() && self.std_annual.is_some() {
            StatsStatus::Complete
        } else {
            StatsStatus::InsufficientData
        }
    }

    /// `(mean_annual, std_annual)` when both are defined.
    pub fn annual(&self) -> Option<(f64, f64)> {
        self.mean_annual.zip(self.std_annual)
    }
}

pub type NormalizedMap = BTreeMap<Symbol, NormalizedSeries>;
pub type StatsMap = BTreeMap<Symbol, ReturnStats>;

/// Normalized series and return statistics for every symbol in the table.
pub fn compute_stats(table: &PriceTable) -> (NormalizedMap, StatsMap) {
    let mut normalized = BTreeMap::new();
    let mut stats = BTreeMap::new();

    for (symbol, series) in table.iter() {
        normalized.insert(symbol.clone(), normalize(series));
        let returns = daily_returns(series);
        let symbol_stats = ReturnStats::from_returns(&returns);
        if symbol_stats.status() == StatsStatus::InsufficientData {
            tracing::debug!(
                %symbol,
                observations = symbol_stats.observations,
                "insufficient data for return statistics"
            );
        }
        stats.insert(symbol.clone(), symbol_stats);
    }

    (normalized, stats)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationSummary {
    pub buy: usize,
    pub hold: usize,
    pub sell: usize,
}

impl RecommendationSummary {
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = &'a ReturnStats>) -> Self {
        let mut summary = Self::default();
        for s in stats {
            match s.recommendation {
                Recommendation::Buy => summary.buy += 1,
                Recommendation::Hold => summary.hold += 1,
                Recommendation::Sell => summary.sell += 1,
            }
        }
        summary
    }

    pub fn count(&self, recommendation: Recommendation) -> usize {
        match recommendation {
            Recommendation::Buy => self.buy,
            Recommendation::Hold => self.hold,
            Recommendation::Sell => self.sell,
        }
    }

    pub fn total(&self) -> usize {
        self.buy + self.hold + self.sell
    }
}
