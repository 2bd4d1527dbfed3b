//! Mobile Guard — triage for Android application packages.
//!
//! Reads declared permissions and intent filters of an APK, scores them
//! with a static heuristic and writes the result as JSON, CSV, text and
//! HTML reports. The score is a hint for manual review, not a verdict.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use mobileguard::{analyze, AnalyzeOptions};
//!
//! let outcome = analyze(Path::new("Downloads/SomeApp.apk"), &AnalyzeOptions::default()).unwrap();
//! println!(
//!     "Risk: {}, saved: {:?}",
//!     outcome.report.security_assessment.risk_level,
//!     outcome.saved
//! );
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod ir;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod rules;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::Config;
use error::Result;
use ir::{FileDescriptor, PackageFacts};
use output::{OutputFormat, ReportWriter, REPORTS_DIR};
use report::{PreviewModel, Report, ReportComposer};

pub use pipeline::{AnalysisOutcome, Pipeline, Strategy, TriageEntry};

/// Options for one `analyze` call.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Path to config file (defaults to `.mobileguard.toml` in the working directory).
    pub config_path: Option<PathBuf>,
    /// Precomputed facts JSON to use instead of running an extractor.
    pub facts_path: Option<PathBuf>,
    /// Formats to write; the config's `[output].formats` when `None`.
    pub formats: Option<Vec<String>>,
    /// Overrides `[output].reports_dir`.
    pub reports_dir: Option<PathBuf>,
}

/// Load config, select a pipeline and analyze one package.
pub fn analyze(path: &Path, options: &AnalyzeOptions) -> Result<AnalysisOutcome> {
    let config = load_config(options)?;
    let pipeline = Pipeline::select(&config, options.facts_path.as_deref());
    let formats = options
        .formats
        .clone()
        .unwrap_or_else(|| config.output.formats.clone());
    pipeline.analyze(path, &formats)
}

/// Config from `options`, with the reports directory override applied.
pub fn load_config(options: &AnalyzeOptions) -> Result<Config> {
    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".mobileguard.toml"));
    let mut config = Config::load(&config_path)?;

    if let Some(dir) = &options.reports_dir {
        config.output.reports_dir = dir.clone();
    }
    Ok(config)
}

/// Compose a report with the built-in rule tables.
pub fn compose(file: &FileDescriptor, facts: &PackageFacts) -> Report {
    ReportComposer::default().compose(file, facts)
}

/// Save a report under `analysis_reports/` in the working directory.
pub fn save<S: AsRef<str>>(
    report: &Report,
    base_name: &str,
    formats: &[S],
) -> BTreeMap<OutputFormat, PathBuf> {
    ReportWriter::new(REPORTS_DIR).save(report, base_name, formats)
}

/// Display summary of a report.
pub fn preview_model(report: &Report) -> PreviewModel {
    PreviewModel::from_report(report)
}
