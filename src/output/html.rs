use crate::report::Report;
use crate::rules::RiskTier;

use super::format_timestamp;

/// Render the report as a self-contained HTML page.
///
/// Dangerous permissions are taken from the report's own `dangerous` list
/// and styled apart from the rest.
pub fn render(report: &Report) -> String {
    let md = &report.metadata;
    let sa = &report.security_assessment;

    let permission_items: String = report
        .permissions
        .list
        .iter()
        .map(|p| {
            let class = if report.permissions.dangerous.contains(p) {
                "dangerous"
            } else {
                "safe"
            };
            format!("<li class=\"{class}\">{}</li>\n", html_escape(p))
        })
        .collect();

    let warning_items: String = sa
        .warnings
        .iter()
        .map(|w| format!("<li class=\"warning\">{}</li>\n", html_escape(w)))
        .collect();

    let recommendation_items: String = report
        .recommendations
        .iter()
        .map(|r| format!("<li>{}</li>\n", html_escape(r)))
        .collect();

    let intent_rows: String = report
        .intents
        .iter()
        .map(|(component, f)| {
            format!(
                "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(component),
                html_escape(&f.actions.join(", ")),
                html_escape(&f.categories.join(", ")),
                html_escape(&f.data.join(", ")),
            )
        })
        .collect();

    let st = &report.statistics;

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>APK Analysis Report: {name}</title>
<style>
  body {{ font-family: Arial, sans-serif; margin: 20px; }}
  .header {{ background-color: #f0f0f0; padding: 20px; border-radius: 5px; }}
  .section {{ margin: 20px 0; }}
  .dangerous {{ color: red; font-weight: bold; }}
  .warning {{ color: orange; }}
  .safe {{ color: green; }}
  .tier {{ font-weight: bold; padding: 0.15rem 0.5rem; border-radius: 4px; color: #fff; }}
  .tier.high {{ background: #f85149; }}
  .tier.medium {{ background: #f0883e; }}
  .tier.low {{ background: #3fb950; }}
  table {{ border-collapse: collapse; width: 100%; }}
  th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
  th {{ background-color: #f2f2f2; }}
</style>
</head>
<body>
<div class="header">
  <h1>APK Security Analysis Report</h1>
  <p>File: {name}</p>
  <p>Path: <code>{path}</code></p>
  <p>Size: {size} bytes</p>
  <p>Last modified: {modified}</p>
  <p>Analysis date: {date}</p>
  <p>Report version: {version}</p>
</div>

<div class="section">
  <h2>Security Assessment</h2>
  <p><strong>Risk level:</strong> <span class="tier {tier_class}">{tier}</span></p>
  <p><strong>Suspicious score:</strong> {score}/10</p>
  <p><strong>Dangerous permissions:</strong> {dangerous_count}</p>
  <ul>
{warnings}  </ul>
</div>

<div class="section">
  <h2>Permissions ({total})</h2>
  <ul>
{permissions}  </ul>
</div>

<div class="section">
  <h2>Intent Filters ({activities})</h2>
  <table>
    <thead><tr><th>Component</th><th>Actions</th><th>Categories</th><th>Data</th></tr></thead>
    <tbody>
{intents}    </tbody>
  </table>
</div>

<div class="section">
  <h2>Recommendations</h2>
  <ul>
{recommendations}  </ul>
</div>

<div class="section">
  <h2>Statistics</h2>
  <table>
    <tr><th>Total permissions</th><td>{stat_total}</td></tr>
    <tr><th>Dangerous permissions</th><td>{stat_dangerous}</td></tr>
    <tr><th>Activities</th><td>{activities}</td></tr>
    <tr><th>Suspicious score</th><td>{stat_score}</td></tr>
  </table>
</div>

<div class="section">
  <p><em>Generated by mobileguard {crate_version}</em></p>
</div>
</body>
</html>
"##,
        name = html_escape(&md.apk_name),
        path = html_escape(&md.apk_path),
        size = md.file_size,
        modified = format_timestamp(md.last_modified.as_ref()),
        date = format_timestamp(md.analysis_date.as_ref()),
        version = html_escape(&md.report_version),
        tier_class = tier_class(sa.risk_level),
        tier = sa.risk_level.to_string().to_uppercase(),
        score = sa.suspicious_score,
        dangerous_count = sa.dangerous_permissions_count,
        warnings = warning_items,
        total = report.permissions.total,
        permissions = permission_items,
        activities = st.activities,
        intents = intent_rows,
        recommendations = recommendation_items,
        stat_total = st.total_permissions,
        stat_dangerous = st.dangerous_permissions,
        stat_score = st.suspicious_score,
        crate_version = env!("CARGO_PKG_VERSION"),
    )
}

fn tier_class(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "high",
        RiskTier::Medium => "medium",
        RiskTier::Low => "low",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
