//! Built-in HTML report template with `{{PLACEHOLDER}}` markers.

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Dashboard</title>
<style>
  body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
  h1 { margin-bottom: 0.2rem; }
  .range { color: #666; margin-top: 0; }
  table.stats { border-collapse: collapse; width: 100%; }
  table.stats th, table.stats td { border-bottom: 1px solid #e5e7eb; padding: 0.4rem 0.6rem; text-align: left; }
  table.stats td.num { text-align: right; font-variant-numeric: tabular-nums; }
  .badge { color: white; border-radius: 4px; padding: 0.1rem 0.5rem; font-size: 0.85rem; }
  ul.summary { list-style: none; padding: 0; display: flex; gap: 1.5rem; }
  .notice { color: #92400e; background: #fef3c7; padding: 0.5rem 0.8rem; border-radius: 4px; }
  figure { margin: 1rem 0; }
</style>
</head>
<body>
<h1>Stock Dashboard</h1>
<p class="range">{{DATE_RANGE}}</p>

<h2>Normalized prices</h2>
<figure>
{{PRICE_CHART_SVG}}
</figure>

<h2>Return and risk</h2>
{{STATS_TABLE}}
{{INSUFFICIENT_NOTICE}}

<h2>Recommendations</h2>
{{SUMMARY_COUNTS}}

<h2>Risk vs. return</h2>
<figure>
{{SCATTER_SVG}}
</figure>
</body>
</html>
"##;

pub fn template() -> &'static str {
    TEMPLATE
}
