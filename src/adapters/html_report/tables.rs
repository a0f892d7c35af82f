//! Table rendering for the dashboard: HTML fragments for the report and
//! plain text for the console summary.

use super::escape_html;
use crate::domain::pipeline::DashboardData;
use crate::domain::recommendation::Recommendation;
use crate::domain::returns::{RecommendationSummary, ReturnStats};

pub const UNDEFINED: &str = "n/a";

pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => UNDEFINED.to_string(),
    }
}

fn stats_cells(stats: &ReturnStats) -> (String, String) {
    (format_pct(stats.mean_annual), format_pct(stats.std_annual))
}

/// Mean/std/recommendation per symbol, in symbol order.
pub fn render_stats_table(data: &DashboardData) -> String {
    if data.stats.is_empty() {
        return "<p><em>No statistics available.</em></p>\n".to_string();
    }

    let mut output = String::from("<table class=\"stats\">\n");
    output.push_str(
        "  <thead><tr><th>Symbol</th><th>Name</th><th>Observations</th>\
         <th>Annual return</th><th>Annual risk</th><th>Recommendation</th></tr></thead>\n  <tbody>\n",
    );
    for (symbol, stats) in &data.stats {
        let (mean, std) = stats_cells(stats);
        output.push_str(&format!(
            "    <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td><span class=\"badge\" style=\"background:{}\">{}</span></td></tr>\n",
            escape_html(symbol.as_str()),
            escape_html(&data.label(symbol)),
            stats.observations,
            mean,
            std,
            stats.recommendation.color(),
            stats.recommendation
        ));
    }
    output.push_str("  </tbody>\n</table>\n");
    output
}

pub fn render_summary_counts(summary: &RecommendationSummary) -> String {
    let mut output = String::from("<ul class=\"summary\">\n");
    for rec in Recommendation::ALL {
        output.push_str(&format!(
            "  <li><span class=\"badge\" style=\"background:{}\">{}</span> {}</li>\n",
            rec.color(),
            rec,
            summary.count(rec)
        ));
    }
    output.push_str("</ul>\n");
    output
}

/// Symbols that came back with too few observations.
pub fn render_insufficient_notice(data: &DashboardData) -> String {
    let insufficient = data.insufficient();
    if insufficient.is_empty() {
        return String::new();
    }
    let names: Vec<String> = insufficient
        .iter()
        .map(|s| escape_html(&data.label(s)))
        .collect();
    format!(
        "<p class=\"notice\">Insufficient data for return statistics: {}. Shown as {}.</p>\n",
        names.join(", "),
        UNDEFINED
    )
}

/// Plain-text stats table for the terminal.
pub fn format_console_table(data: &DashboardData) -> String {
    let width = data
        .stats
        .keys()
        .map(|s| data.label(s).chars().count())
        .max()
        .unwrap_or(0)
        .max("Symbol".len());

    let mut output = format!(
        "  {:<width$}  {:>12}  {:>12}  {}\n",
        "Symbol",
        "Return",
        "Risk",
        "Signal",
        width = width
    );
    for (symbol, stats) in &data.stats {
        let (mean, std) = stats_cells(stats);
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>12}  {}\n",
            data.label(symbol),
            mean,
            std,
            stats.recommendation,
            width = width
        ));
    }
    output
}

pub fn format_console_summary(summary: &RecommendationSummary) -> String {
    format!(
        "  Buy: {}  Hold: {}  Sell: {}",
        summary.buy, summary.hold, summary.sell
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::DateRange;
    use crate::domain::price_table::{PricePoint, PriceSeries, PriceTable};
    use crate::domain::returns::compute_stats;
    use crate::domain::symbol::Symbol;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    fn sample_data() -> DashboardData {
        let mut table = PriceTable::new();
        table.insert(
            sym("AAPL"),
            PriceSeries::new(vec![
                PricePoint::new(d(2), 100.0),
                PricePoint::new(d(3), 101.0),
                PricePoint::new(d(4), 103.0),
            ]),
        );
        table.insert(sym("NEW"), PriceSeries::new(vec![PricePoint::new(d(4), 20.0)]));
        let (normalized, stats) = compute_stats(&table);
        let summary = RecommendationSummary::from_stats(stats.values());
        let mut labels = BTreeMap::new();
        labels.insert(sym("AAPL"), "Apple Inc. (AAPL)".to_string());
        labels.insert(sym("NEW"), "NEW".to_string());

        DashboardData {
            range: DateRange::new(d(1), d(31), d(31)).unwrap(),
            table,
            normalized,
            stats,
            summary,
            labels,
            scatter: Vec::new(),
        }
    }

    #[test]
    fn format_pct_values() {
        assert_eq!(format_pct(Some(0.1234)), "12.34%");
        assert_eq!(format_pct(Some(-0.05)), "-5.00%");
        assert_eq!(format_pct(None), "n/a");
        assert_eq!(format_pct(Some(f64::NAN)), "n/a");
    }

    #[test]
    fn stats_table_lists_every_symbol() {
        let html = render_stats_table(&sample_data());
        assert!(html.contains("<table"));
        assert!(html.contains("<td>AAPL</td>"));
        assert!(html.contains("Apple Inc. (AAPL)"));
        assert!(html.contains("<td>NEW</td>"));
        assert!(html.contains("n/a"));
    }

    #[test]
    fn summary_counts_cover_all_recommendations() {
        let summary = RecommendationSummary {
            buy: 2,
            hold: 1,
            sell: 0,
        };
        let html = render_summary_counts(&summary);
        assert!(html.contains("Buy</span> 2"));
        assert!(html.contains("Hold</span> 1"));
        assert!(html.contains("Sell</span> 0"));
    }

    #[test]
    fn insufficient_notice_names_symbols() {
        let html = render_insufficient_notice(&sample_data());
        assert!(html.contains("NEW"));
        assert!(!html.contains("AAPL"));
    }

    #[test]
    fn console_table_aligns_columns() {
        let text = format_console_table(&sample_data());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Symbol"));
        assert!(lines[1].starts_with("  Apple Inc. (AAPL)"));
        assert!(lines[2].contains("n/a"));
        assert!(lines[2].trim_end().ends_with("Hold"));
    }

    #[test]
    fn console_summary() {
        let summary = RecommendationSummary {
            buy: 1,
            hold: 2,
            sell: 3,
        };
        assert_eq!(format_console_summary(&summary), "  Buy: 1  Hold: 2  Sell: 3");
    }
}
