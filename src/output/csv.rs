use crate::report::Report;

use super::format_timestamp;

/// Render the report as flattened CSV sections.
///
/// Section order: metadata, permissions, security assessment,
/// recommendations, statistics, intents. Sections are separated by an
/// empty row.
pub fn render(report: &Report) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let md = &report.metadata;

    rows.push(vec!["Metadata".into()]);
    rows.push(vec!["apk_name".into(), md.apk_name.clone()]);
    rows.push(vec!["apk_path".into(), md.apk_path.clone()]);
    rows.push(vec!["file_size".into(), md.file_size.to_string()]);
    rows.push(vec![
        "last_modified".into(),
        format_timestamp(md.last_modified.as_ref()),
    ]);
    if let Some(sha) = &md.sha256 {
        rows.push(vec!["sha256".into(), sha.clone()]);
    }
    rows.push(vec![
        "analysis_date".into(),
        format_timestamp(md.analysis_date.as_ref()),
    ]);
    rows.push(vec!["report_version".into(), md.report_version.clone()]);
    rows.push(vec![]);

    rows.push(vec!["Permissions".into()]);
    rows.push(vec!["total".into(), report.permissions.total.to_string()]);
    rows.push(vec!["Permission list".into()]);
    for perm in &report.permissions.list {
        rows.push(vec![perm.clone()]);
    }
    rows.push(vec![]);

    let sa = &report.security_assessment;
    rows.push(vec!["Security assessment".into()]);
    rows.push(vec!["risk_level".into(), sa.risk_level.to_string()]);
    rows.push(vec!["suspicious_score".into(), sa.suspicious_score.to_string()]);
    rows.push(vec![
        "dangerous_permissions_count".into(),
        sa.dangerous_permissions_count.to_string(),
    ]);
    rows.push(vec!["warnings".into(), sa.warnings.join("; ")]);
    rows.push(vec![]);

    rows.push(vec!["Recommendations".into()]);
    for rec in &report.recommendations {
        rows.push(vec![rec.clone()]);
    }
    rows.push(vec![]);

    let st = &report.statistics;
    rows.push(vec!["Statistics".into()]);
    rows.push(vec!["total_permissions".into(), st.total_permissions.to_string()]);
    rows.push(vec![
        "dangerous_permissions".into(),
        st.dangerous_permissions.to_string(),
    ]);
    rows.push(vec!["activities".into(), st.activities.to_string()]);
    rows.push(vec!["suspicious_score".into(), st.suspicious_score.to_string()]);
    rows.push(vec![]);

    rows.push(vec!["Intents".into()]);
    rows.push(vec![
        "component".into(),
        "actions".into(),
        "categories".into(),
        "data".into(),
    ]);
    for (component, filter) in &report.intents {
        rows.push(vec![
            component.clone(),
            filter.actions.join(" "),
            filter.categories.join(" "),
            filter.data.join(" "),
        ]);
    }

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Quote a field when it contains a delimiter, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
