//! HTML dashboard report.
//!
//! Reads an HTML template (the built-in default or a custom file via
//! `[report] template_path`), resolves all `{{PLACEHOLDER}}` markers with
//! fragments from `chart_svg` and `tables`, and writes a single
//! self-contained `.html` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use crate::domain::error::StockboardError;
use crate::domain::pipeline::DashboardData;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve every `{{PLACEHOLDER}}` in `template` for one dashboard run.
pub fn resolve(template: &str, data: &DashboardData) -> String {
    let mut output = template.to_string();

    output = output.replace("{{DATE_RANGE}}", &escape_html(&data.range.to_string()));

    // Normalized price chart, in symbol order
    let labels: Vec<String> = data.normalized.keys().map(|s| data.label(s)).collect();
    let series: Vec<(&str, &_)> = labels
        .iter()
        .map(String::as_str)
        .zip(data.normalized.values())
        .collect();
    let price_svg = chart_svg::generate_price_svg(&series);
    let price_html = if price_svg.is_empty() {
        "<p><em>No price data.</em></p>".to_string()
    } else {
        price_svg
    };
    output = output.replace("{{PRICE_CHART_SVG}}", &price_html);

    output = output.replace("{{STATS_TABLE}}", &tables::render_stats_table(data));
    output = output.replace(
        "{{INSUFFICIENT_NOTICE}}",
        &tables::render_insufficient_notice(data),
    );
    output = output.replace(
        "{{SUMMARY_COUNTS}}",
        &tables::render_summary_counts(&data.summary),
    );

    let scatter_svg = chart_svg::generate_scatter_svg(&data.scatter);
    let scatter_html = if scatter_svg.is_empty() {
        "<p><em>Not enough data for the risk/return chart.</em></p>".to_string()
    } else {
        scatter_svg
    };
    output = output.replace("{{SCATTER_SVG}}", &scatter_html);

    output
}

#[derive(Debug, Default)]
pub struct HtmlReportAdapter {
    template_path: Option<PathBuf>,
}

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template_path: PathBuf) -> Self {
        Self {
            template_path: Some(template_path),
        }
    }

    fn load_template(&self) -> Result<String, StockboardError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| StockboardError::Report {
                reason: format!("failed to read template {}: {}", path.display(), e),
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &DashboardData, output_path: &Path) -> Result<(), StockboardError> {
        let template = self.load_template()?;
        let html = resolve(&template, dashboard);

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StockboardError::Report {
                    reason: format!("failed to create {}: {}", parent.display(), e),
                })?;
            }
        }
        fs::write(output_path, html).map_err(|e| StockboardError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;

        tracing::info!(path = %output_path.display(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::DateRange;
    use crate::domain::directory::SymbolDirectory;
    use crate::domain::pipeline::{run_pipeline, PipelineOutcome};
    use crate::domain::price_table::{PricePoint, PriceSeries};
    use crate::domain::symbol::Symbol;
    use crate::ports::price_port::PricePort;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    struct FixedPrices;

    impl PricePort for FixedPrices {
        fn fetch_series(
            &self,
            symbol: &Symbol,
            _range: &DateRange,
        ) -> Result<PriceSeries, StockboardError> {
            let prices: &[f64] = match symbol.as_str() {
                "AAPL" => &[100.0, 100.5, 101.0, 101.2, 101.9],
                "TSLA" => &[200.0, 150.0, 230.0, 140.0, 190.0],
                _ => &[],
            };
            Ok(PriceSeries::new(
                prices
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| PricePoint::new(d(i as u32 + 2), p))
                    .collect(),
            ))
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_dashboard() -> DashboardData {
        let mut directory = SymbolDirectory::new();
        directory.insert("AAPL".parse().unwrap(), Some("Apple Inc.".into()));
        directory.insert("T".parse().unwrap(), Some("AT&T".into()));
        let selection: Vec<Symbol> = vec!["AAPL".parse().unwrap(), "TSLA".parse().unwrap()];
        let range = DateRange::new(d(1), d(31), d(31)).unwrap();
        match run_pipeline(&selection, &range, &FixedPrices, Some(&directory)).unwrap() {
            PipelineOutcome::Computed(data) => *data,
            other => panic!("expected computed outcome, got {other:?}"),
        }
    }

    #[test]
    fn escape_html_special_characters() {
        assert_eq!(escape_html("AT&T <b>\"x\"</b>"), "AT&amp;T &lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn resolve_default_template_no_placeholders_remain() {
        let output = resolve(default_template::template(), &sample_dashboard());
        assert!(!output.contains("{{"), "unresolved placeholder in output: {output}");
    }

    #[test]
    fn resolve_contains_charts_table_and_counts() {
        let output = resolve(default_template::template(), &sample_dashboard());
        assert_eq!(output.matches("<svg").count(), 2);
        assert!(output.contains("<table class=\"stats\">"));
        assert!(output.contains("Apple Inc. (AAPL)"));
        assert!(output.contains("2024-01-01 to 2024-01-31"));
        assert!(output.contains("<ul class=\"summary\">"));
    }

    #[test]
    fn resolve_custom_template() {
        let custom = "<h1>Mine</h1>\n{{STATS_TABLE}}\n{{SUMMARY_COUNTS}}";
        let output = resolve(custom, &sample_dashboard());
        assert!(output.starts_with("<h1>Mine</h1>"));
        assert!(output.contains("<table"));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("dashboard.html");

        HtmlReportAdapter::new()
            .write(&sample_dashboard(), &path)
            .unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Stock Dashboard"));
    }

    #[test]
    fn write_with_custom_template_file() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("template.html");
        fs::write(&template_path, "<p>{{DATE_RANGE}}</p>").unwrap();
        let out = dir.path().join("out.html");

        HtmlReportAdapter::with_template(template_path)
            .write(&sample_dashboard(), &out)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "<p>2024-01-01 to 2024-01-31</p>"
        );
    }

    #[test]
    fn missing_template_is_report_error() {
        let dir = tempdir().unwrap();
        let adapter = HtmlReportAdapter::with_template(dir.path().join("missing.html"));
        let err = adapter
            .write(&sample_dashboard(), &dir.path().join("out.html"))
            .unwrap_err();
        assert!(matches!(err, StockboardError::Report { .. }));
    }
}
