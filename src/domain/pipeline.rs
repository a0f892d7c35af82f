//! The dashboard pipeline: fetch → normalize → stats → classify.
//!
//! A plain function of the current selection and date range. Front ends
//! (one-shot CLI, interactive session) call it again whenever an input
//! changes; nothing is carried over between runs.

use crate::domain::date_range::DateRange;
use crate::domain::directory::SymbolDirectory;
use crate::domain::error::StockboardError;
use crate::domain::price_table::PriceTable;
use crate::domain::recommendation::Recommendation;
use crate::domain::returns::{
    compute_stats, NormalizedMap, RecommendationSummary, StatsMap, StatsStatus,
};
use crate::domain::symbol::Symbol;
use crate::ports::price_port::PricePort;
use std::collections::BTreeMap;

/// Shown when the price source returned nothing usable.
pub const NO_DATA_MESSAGE: &str = "No data found. Try a different selection or date range.";

/// One point of the risk-vs-return scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub symbol: Symbol,
    pub label: String,
    pub mean_annual: f64,
    pub std_annual: f64,
    pub recommendation: Recommendation,
}

/// Everything the presentation layer needs for one run.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub range: DateRange,
    pub table: PriceTable,
    pub normalized: NormalizedMap,
    pub stats: StatsMap,
    pub summary: RecommendationSummary,
    pub labels: BTreeMap<Symbol, String>,
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardData {
    pub fn label(&self, symbol: &Symbol) -> String {
        self.labels
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.to_string())
    }

    /// Symbols whose stats could not be computed.
    pub fn insufficient(&self) -> Vec<&Symbol> {
        self.stats
            .iter()
            .filter(|(_, s)| s.status() == StatsStatus::InsufficientData)
            .map(|(symbol, _)| symbol)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Empty selection: the price source was not contacted.
    NothingSelected,
    /// The source answered but had no rows for the selection and range.
    NoData { range: DateRange },
    Computed(Box<DashboardData>),
}

/// Run one pipeline pass. `directory`, when present, supplies display names
/// for labels; symbols missing from it are labelled with the bare symbol.
pub fn run_pipeline(
    selection: &[Symbol],
    range: &DateRange,
    prices: &dyn PricePort,
    directory: Option<&SymbolDirectory>,
) -> Result<PipelineOutcome, StockboardError> {
    if selection.is_empty() {
        tracing::debug!("empty selection, skipping price fetch");
        return Ok(PipelineOutcome::NothingSelected);
    }

    tracing::info!(symbols = selection.len(), %range, "fetching prices");
    let table = prices.fetch_prices(selection, range)?;

    if table.is_empty() {
        tracing::info!(%range, "price source returned no rows");
        return Ok(PipelineOutcome::NoData { range: *range });
    }
    if !table.has_valid_prices() {
        tracing::info!(%range, rows = table.row_count(), "no usable prices in returned rows");
        return Ok(PipelineOutcome::NoData { range: *range });
    }

    let (normalized, stats) = compute_stats(&table);
    let summary = RecommendationSummary::from_stats(stats.values());

    let labels: BTreeMap<Symbol, String> = table
        .symbols()
        .map(|symbol| {
            let label = directory
                .map(|dir| dir.label(symbol))
                .unwrap_or_else(|| symbol.to_string());
            (symbol.clone(), label)
        })
        .collect();

    let scatter = stats
        .iter()
        .filter_map(|(symbol, s)| {
            s.annual().map(|(mean_annual, std_annual)| ScatterPoint {
                symbol: symbol.clone(),
                label: labels
                    .get(symbol)
                    .cloned()
                    .unwrap_or_else(|| symbol.to_string()),
                mean_annual,
                std_annual,
                recommendation: s.recommendation,
            })
        })
        .collect();

    tracing::info!(
        rows = table.row_count(),
        buy = summary.buy,
        hold = summary.hold,
        sell = summary.sell,
        "pipeline complete"
    );

    Ok(PipelineOutcome::Computed(Box::new(DashboardData {
        range: *range,
        table,
        normalized,
        stats,
        summary,
        labels,
        scatter,
    })))
}
