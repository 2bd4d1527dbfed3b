use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{GuardError, Result};
use crate::report::{Clock, Report, SystemClock};

use super::OutputFormat;

/// Cap on the number of saved reports returned by [`list_reports`].
const MAX_LISTED_REPORTS: usize = 50;

/// Writes report file sets into one reports directory.
pub struct ReportWriter {
    reports_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl ReportWriter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(reports_dir, Arc::new(SystemClock))
    }

    pub fn with_clock(reports_dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            clock,
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Write one file per requested format as `{base_name}_{YYYYMMDD_HHMMSS}.{ext}`.
    ///
    /// All files of one call share a timestamp. Unknown formats and failed
    /// writes are logged and skipped. The returned map only holds formats
    /// that were written.
    pub fn save<S: AsRef<str>>(
        &self,
        report: &Report,
        base_name: &str,
        formats: &[S],
    ) -> BTreeMap<OutputFormat, PathBuf> {
        let mut saved = BTreeMap::new();

        if let Err(e) = std::fs::create_dir_all(&self.reports_dir) {
            tracing::error!(
                dir = %self.reports_dir.display(),
                error = %e,
                "cannot create reports directory"
            );
            return saved;
        }

        let now = self.clock.now();
        let stem = format!("{}_{}", sanitize(base_name), now.format("%Y%m%d_%H%M%S"));

        for requested in formats {
            let requested = requested.as_ref();
            let Some(format) = OutputFormat::from_str_lenient(requested) else {
                let err = GuardError::UnsupportedFormat(requested.to_string());
                tracing::warn!(error = %err, "skipping report format");
                continue;
            };
            if saved.contains_key(&format) {
                continue;
            }

            let path = self.reports_dir.join(format!("{stem}.{}", format.extension()));
            match write_one(report, format, now, &path) {
                Ok(()) => {
                    tracing::info!(format = %format, path = %path.display(), "report saved");
                    saved.insert(format, path);
                }
                Err(e) => {
                    tracing::warn!(format = %format, error = %e, "failed to save report");
                }
            }
        }

        saved
    }
}

fn write_one(
    report: &Report,
    format: OutputFormat,
    generated_at: DateTime<Local>,
    path: &Path,
) -> Result<()> {
    let rendered = super::render(report, format, generated_at)?;
    std::fs::write(path, rendered).map_err(|e| GuardError::Serialization {
        format: format.to_string(),
        message: e.to_string(),
    })
}

/// Keep base names inside the reports directory.
fn sanitize(base_name: &str) -> String {
    let cleaned: String = base_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        "report".into()
    } else {
        cleaned
    }
}

/// A report file found on disk.
#[derive(Debug, Clone, Serialize)]
pub struct SavedReport {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
    pub format: OutputFormat,
}

/// Saved reports under `reports_dir`, newest first.
///
/// A missing directory yields an empty list.
pub fn list_reports(reports_dir: &Path) -> Vec<SavedReport> {
    if !reports_dir.exists() {
        return Vec::new();
    }

    let mut reports: Vec<SavedReport> = WalkDir::new(reports_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read reports directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let format = e
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(OutputFormat::from_str_lenient)?;
            let meta = e.metadata().ok()?;
            Some(SavedReport {
                name: e.file_name().to_string_lossy().into_owned(),
                path: e.path().to_path_buf(),
                size: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
                format,
            })
        })
        .collect();

    reports.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    reports.truncate(MAX_LISTED_REPORTS);
    reports
}
