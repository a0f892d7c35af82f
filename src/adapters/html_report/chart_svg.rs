//! Inline SVG charts: normalized price lines and the risk/return scatter.

use super::escape_html;
use crate::domain::pipeline::ScatterPoint;
use crate::domain::recommendation::Recommendation;
use crate::domain::returns::NormalizedSeries;
use chrono::NaiveDate;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 160.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;
const POINT_RADIUS: f64 = 6.0;

/// Line colours, cycled when there are more series than entries.
const PALETTE: &[&str] = &[
    "#2563eb", "#f59e0b", "#10b981", "#ef4444", "#8b5cf6", "#06b6d4", "#ec4899", "#84cc16",
    "#64748b", "#d946ef",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn plot_width() -> f64 {
    CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn svg_open(out: &mut String, title: &str) {
    out.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    out.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    out.push_str(&format!(
        "  <text x=\"{}\" y=\"18\" font-size=\"13\" fill=\"#333\">{}</text>\n",
        MARGIN_LEFT, title
    ));
}

fn axes(out: &mut String) {
    let bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    out.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, bottom
    ));
    out.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        bottom,
        MARGIN_LEFT + plot_width(),
        bottom
    ));
}

fn y_label(out: &mut String, y: f64, text: &str) {
    out.push_str(&format!(
        "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT - 5.0,
        y + 3.0,
        text
    ));
}

fn x_label(out: &mut String, x: f64, text: &str) {
    out.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        x,
        CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
        text
    ));
}

/// Min and max over the values, widened when degenerate.
fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if (max - min).abs() < f64::EPSILON {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return Some((min - pad, max + pad));
    }
    Some((min, max))
}

/// Normalized price chart, one line per symbol, legend on the right.
/// Returns an empty string when no series has any points.
pub fn generate_price_svg(series: &[(&str, &NormalizedSeries)]) -> String {
    let all_points = || series.iter().flat_map(|(_, s)| s.points.iter());
    let Some((min_value, max_value)) = bounds(all_points().map(|p| p.value)) else {
        return String::new();
    };
    let Some(first_date) = all_points().map(|p| p.date).min() else {
        return String::new();
    };
    let last_date = all_points().map(|p| p.date).max().unwrap_or(first_date);
    let span_days = (last_date - first_date).num_days().max(1) as f64;

    let x_scale = |d: NaiveDate| -> f64 {
        MARGIN_LEFT + ((d - first_date).num_days() as f64 / span_days) * plot_width()
    };
    let y_scale = |v: f64| -> f64 {
        MARGIN_TOP + plot_height() - ((v - min_value) / (max_value - min_value)) * plot_height()
    };

    let mut svg = String::new();
    svg_open(&mut svg, "Normalized price (first valid price = 100)");
    axes(&mut svg);

    y_label(&mut svg, y_scale(max_value), &format!("{:.0}", max_value));
    y_label(
        &mut svg,
        y_scale((max_value + min_value) / 2.0),
        &format!("{:.0}", (max_value + min_value) / 2.0),
    );
    y_label(&mut svg, y_scale(min_value), &format!("{:.0}", min_value));

    let mid_date = first_date + chrono::Duration::days((span_days / 2.0) as i64);
    x_label(&mut svg, MARGIN_LEFT, &first_date.to_string());
    x_label(&mut svg, x_scale(mid_date), &mid_date.to_string());
    x_label(&mut svg, MARGIN_LEFT + plot_width(), &last_date.to_string());

    if (min_value..=max_value).contains(&100.0) {
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"#ddd\" stroke-dasharray=\"4 3\"/>\n",
            MARGIN_LEFT,
            y_scale(100.0),
            MARGIN_LEFT + plot_width(),
            y_scale(100.0)
        ));
    }

    for (i, (label, s)) in series.iter().enumerate() {
        let color = series_color(i);
        let mut path_data = String::new();
        for (j, point) in s.points.iter().enumerate() {
            let cmd = if j == 0 { "M" } else { " L" };
            path_data.push_str(&format!(
                "{} {:.1} {:.1}",
                cmd,
                x_scale(point.date),
                y_scale(point.value)
            ));
        }
        if !path_data.is_empty() {
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                path_data, color
            ));
        }

        let legend_y = MARGIN_TOP + 10.0 + i as f64 * 16.0;
        let legend_x = MARGIN_LEFT + plot_width() + 12.0;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{:.1}\" width=\"10\" height=\"10\" fill=\"{}\"/>\n",
            legend_x,
            legend_y - 9.0,
            color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            legend_x + 14.0,
            legend_y,
            escape_html(label)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Risk (x = annualized std) against return (y = annualized mean), one
/// labelled point per symbol coloured by recommendation.
pub fn generate_scatter_svg(points: &[ScatterPoint]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let Some((min_x, max_x)) = bounds(points.iter().map(|p| p.std_annual).chain([0.0])) else {
        return String::new();
    };
    let Some((min_y, max_y)) = bounds(points.iter().map(|p| p.mean_annual).chain([0.0])) else {
        return String::new();
    };

    let x_scale = |v: f64| -> f64 { MARGIN_LEFT + ((v - min_x) / (max_x - min_x)) * plot_width() };
    let y_scale = |v: f64| -> f64 {
        MARGIN_TOP + plot_height() - ((v - min_y) / (max_y - min_y)) * plot_height()
    };

    let mut svg = String::new();
    svg_open(&mut svg, "Risk vs. return (annualized)");
    axes(&mut svg);

    y_label(&mut svg, y_scale(max_y), &format!("{:.0}%", max_y * 100.0));
    y_label(&mut svg, y_scale(min_y), &format!("{:.0}%", min_y * 100.0));
    x_label(&mut svg, x_scale(min_x), &format!("{:.0}%", min_x * 100.0));
    x_label(&mut svg, x_scale(max_x), &format!("{:.0}%", max_x * 100.0));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#333\">Annualized std (risk)</text>\n",
        MARGIN_LEFT + plot_width() / 2.0,
        CHART_HEIGHT - 5.0
    ));
    let y_mid = MARGIN_TOP + plot_height() / 2.0;
    svg.push_str(&format!(
        "  <text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#333\" transform=\"rotate(-90 14 {:.1})\">Annualized return (mean)</text>\n",
        y_mid, y_mid
    ));

    // zero-return baseline
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"#ddd\" stroke-dasharray=\"4 3\"/>\n",
        MARGIN_LEFT,
        y_scale(0.0),
        MARGIN_LEFT + plot_width(),
        y_scale(0.0)
    ));

    for point in points {
        let x = x_scale(point.std_annual);
        let y = y_scale(point.mean_annual);
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"{}\"><title>{}: {}</title></circle>\n",
            x,
            y,
            POINT_RADIUS,
            point.recommendation.color(),
            escape_html(&point.label),
            point.recommendation
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            x + POINT_RADIUS + 2.0,
            y - POINT_RADIUS,
            escape_html(&point.label)
        ));
    }

    for (i, rec) in Recommendation::ALL.iter().enumerate() {
        let legend_y = MARGIN_TOP + 10.0 + i as f64 * 16.0;
        let legend_x = MARGIN_LEFT + plot_width() + 12.0;
        svg.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{:.1}\" r=\"5\" fill=\"{}\"/>\n",
            legend_x + 5.0,
            legend_y - 4.0,
            rec.color()
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            legend_x + 14.0,
            legend_y,
            rec
        ));
    }

    svg.push_str("</svg>");
    svg
}
