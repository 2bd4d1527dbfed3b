use chrono::{DateTime, Local};

use crate::report::Report;

use super::format_timestamp;

const BANNER_WIDTH: usize = 60;
const RULE_WIDTH: usize = 40;

/// Render the report as a human-readable text document.
pub fn render(report: &Report, generated_at: DateTime<Local>) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{banner}\nAPK SECURITY ANALYSIS REPORT\n{banner}\n\n"));

    let md = &report.metadata;
    out.push_str(&format!("METADATA:\n{rule}\n"));
    out.push_str(&format!("  apk_name: {}\n", md.apk_name));
    out.push_str(&format!("  apk_path: {}\n", md.apk_path));
    out.push_str(&format!("  file_size: {}\n", md.file_size));
    out.push_str(&format!(
        "  last_modified: {}\n",
        format_timestamp(md.last_modified.as_ref())
    ));
    if let Some(sha) = &md.sha256 {
        out.push_str(&format!("  sha256: {sha}\n"));
    }
    out.push_str(&format!(
        "  analysis_date: {}\n",
        format_timestamp(md.analysis_date.as_ref())
    ));
    out.push('\n');

    let perms = &report.permissions;
    out.push_str(&format!("PERMISSIONS: {} total\n{rule}\n", perms.total));
    if !perms.dangerous.is_empty() {
        out.push_str(&format!("⚠️  DANGEROUS PERMISSIONS ({}):\n", perms.dangerous.len()));
        for perm in &perms.dangerous {
            out.push_str(&format!("  • {perm}\n"));
        }
        out.push('\n');
    }
    out.push_str("ALL PERMISSIONS:\n");
    for (i, perm) in perms.list.iter().enumerate() {
        out.push_str(&format!("  {:2}. {}\n", i + 1, perm));
    }
    out.push('\n');

    let sa = &report.security_assessment;
    out.push_str(&format!("SECURITY ASSESSMENT:\n{rule}\n"));
    out.push_str(&format!("  Risk level: {}\n", sa.risk_level));
    out.push_str(&format!("  Suspicious score: {}/10\n", sa.suspicious_score));
    if !sa.warnings.is_empty() {
        out.push_str("  Warnings:\n");
        for warning in &sa.warnings {
            out.push_str(&format!("    ⚠ {warning}\n"));
        }
    }
    out.push('\n');

    out.push_str(&format!("RECOMMENDATIONS:\n{rule}\n"));
    for rec in &report.recommendations {
        out.push_str(&format!("  • {rec}\n"));
    }
    out.push('\n');

    let st = &report.statistics;
    out.push_str(&format!("STATISTICS:\n{rule}\n"));
    out.push_str(&format!("  Total permissions: {}\n", st.total_permissions));
    out.push_str(&format!("  Dangerous permissions: {}\n", st.dangerous_permissions));
    out.push_str(&format!("  Activities: {}\n", st.activities));

    if !report.intents.is_empty() {
        out.push('\n');
        out.push_str(&format!("INTENT FILTERS: {} components\n{rule}\n", report.intents.len()));
        for (component, filter) in &report.intents {
            out.push_str(&format!("  {component}\n"));
            for action in &filter.actions {
                out.push_str(&format!("    action: {action}\n"));
            }
            for category in &filter.categories {
                out.push_str(&format!("    category: {category}\n"));
            }
            for data in &filter.data {
                out.push_str(&format!("    data: {data}\n"));
            }
        }
    }

    out.push_str(&format!(
        "\n{banner}\nReport generated: {}\n{banner}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap()
    }

    #[test]
    fn dangerous_section_precedes_full_list() {
        let mut report = Report::default();
        report.permissions.total = 2;
        report.permissions.list = vec![
            "android.permission.INTERNET".into(),
            "android.permission.CAMERA".into(),
        ];
        report.permissions.dangerous = vec!["android.permission.CAMERA".into()];

        let out = render(&report, at());
        let dangerous = out.find("DANGEROUS PERMISSIONS (1)").unwrap();
        let all = out.find("ALL PERMISSIONS:").unwrap();
        assert!(dangerous < all);
        assert!(out.contains("   1. android.permission.INTERNET\n"));
        assert!(out.contains("   2. android.permission.CAMERA\n"));
        assert!(out.ends_with(&format!(
            "Report generated: 2024-05-01 12:30:05\n{}\n",
            "=".repeat(BANNER_WIDTH)
        )));
    }

    #[test]
    fn intent_filters_follow_statistics() {
        let mut report = Report::default();
        report.intents.insert(
            "com.example.MainActivity".into(),
            crate::ir::IntentFilter {
                actions: vec!["android.intent.action.MAIN".into()],
                categories: vec!["android.intent.category.LAUNCHER".into()],
                data: vec![],
            },
        );

        let out = render(&report, at());
        let assessment = out.find("SECURITY ASSESSMENT:").unwrap();
        let statistics = out.find("STATISTICS:").unwrap();
        let intents = out.find("INTENT FILTERS: 1 components").unwrap();
        let generated = out.find("Report generated:").unwrap();
        assert!(assessment < statistics);
        assert!(statistics < intents);
        assert!(intents < generated);
        assert!(out.contains("    action: android.intent.action.MAIN\n"));
    }

    #[test]
    fn no_dangerous_section_when_empty() {
        let out = render(&Report::default(), at());
        assert!(!out.contains("DANGEROUS PERMISSIONS"));
        assert!(out.contains("PERMISSIONS: 0 total"));
        assert!(out.contains("STATISTICS:"));
    }
}
