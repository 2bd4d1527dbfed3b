pub mod csv;
pub mod html;
pub mod json;
pub mod text;
pub mod writer;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::Report;

pub use writer::{list_reports, ReportWriter, SavedReport};

/// Directory, relative to the output root, that holds saved reports.
pub const REPORTS_DIR: &str = "analysis_reports";

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Txt,
    Html,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Json, Self::Csv, Self::Txt, Self::Html];

    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "txt" | "text" => Some(Self::Txt),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// File extension, also the format's canonical name.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render a report into the given format.
///
/// `generated_at` only feeds the text format's closing stamp; no report
/// field is recomputed.
pub fn render(report: &Report, format: OutputFormat, generated_at: DateTime<Local>) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(report),
        OutputFormat::Csv => Ok(csv::render(report)),
        OutputFormat::Txt => Ok(text::render(report, generated_at)),
        OutputFormat::Html => Ok(html::render(report)),
    }
}

/// ISO-8601 rendering of an optional timestamp, `-` when absent.
pub(crate) fn format_timestamp(ts: Option<&DateTime<Local>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Secs, false))
        .unwrap_or_else(|| "-".into())
}
