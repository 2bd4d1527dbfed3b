//! End-to-end: compose a report and write every format to disk.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::TimeZone;
use pretty_assertions::assert_eq;

use mobileguard::ir::{FileDescriptor, IntentFilter, PackageFacts};
use mobileguard::output::{list_reports, OutputFormat, ReportWriter};
use mobileguard::report::{Clock, FixedClock, Report, ReportComposer};
use mobileguard::rules::{RiskScorer, RiskTier};

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::Local.with_ymd_and_hms(2024, 5, 1, 18, 45, 0).unwrap(),
    ))
}

fn sample_report() -> Report {
    let mut intents = BTreeMap::new();
    intents.insert(
        "com.free.vpn.MainActivity".to_string(),
        IntentFilter {
            actions: vec!["android.intent.action.MAIN".into()],
            categories: vec!["android.intent.category.LAUNCHER".into()],
            data: vec![],
        },
    );
    let facts = PackageFacts {
        permissions: vec![
            "android.permission.INTERNET".into(),
            "android.permission.READ_SMS".into(),
            "android.permission.READ_CONTACTS".into(),
        ],
        intents,
    };
    let file = FileDescriptor {
        name: "FreeVpnПремиум.apk".into(),
        path: "/sdcard/Download/FreeVpnПремиум.apk".into(),
        size_bytes: 2_048_000,
        last_modified: None,
        sha256: None,
    };
    ReportComposer::with_clock(RiskScorer::default(), clock()).compose(&file, &facts)
}

#[test]
fn all_formats_written_with_shared_stamp() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::with_clock(dir.path().join("analysis_reports"), clock());
    let report = sample_report();
    assert_eq!(report.security_assessment.risk_level, RiskTier::Medium);

    let saved = writer.save(&report, "FreeVpn", &["json", "csv", "txt", "html"]);
    assert_eq!(saved.len(), 4);
    for (format, path) in &saved {
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("FreeVpn_20240501_184500.{}", format.extension())
        );
    }

    let json = std::fs::read_to_string(&saved[&OutputFormat::Json]).unwrap();
    assert!(json.contains("FreeVpnПремиум.apk"));
    let back: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);

    let txt = std::fs::read_to_string(&saved[&OutputFormat::Txt]).unwrap();
    assert!(txt.contains("Report generated: 2024-05-01 18:45:00"));
    assert!(txt.contains("DANGEROUS PERMISSIONS (2)"));

    let html = std::fs::read_to_string(&saved[&OutputFormat::Html]).unwrap();
    assert!(html.contains("<li class=\"dangerous\">android.permission.READ_SMS</li>"));

    assert_eq!(list_reports(writer.reports_dir()).len(), 4);
}

#[test]
fn empty_report_writes_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::with_clock(dir.path(), clock());
    let saved = writer.save(&Report::default(), "empty", &["json", "csv", "txt", "html"]);
    assert_eq!(saved.len(), 4);

    let json = std::fs::read_to_string(&saved[&OutputFormat::Json]).unwrap();
    let back: Report = serde_json::from_str(&json).unwrap();
    assert!(back.is_empty());
}
