use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::adapter::{self, AaptExtractor, DemoExtractor, Extractor, FactsFileExtractor};
use crate::config::Config;
use crate::error::Result;
use crate::ir::{display_name, FileDescriptor, PackageFacts};
use crate::output::{OutputFormat, ReportWriter};
use crate::report::{Report, ReportComposer};
use crate::rules::{RiskScorer, RiskTier};

/// Cap on packages returned by [`find_packages`].
pub const MAX_PACKAGES: usize = 100;

/// How packages are turned into facts. Chosen once, at startup.
pub enum Strategy {
    /// Permissions and intents come from an extractor.
    Full(Box<dyn Extractor>),
    /// No extractor: reports are composed from the file name alone.
    Minimal,
}

/// Result of analyzing one package.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub report: Report,
    /// Formats actually written. Empty when composition failed.
    pub saved: BTreeMap<OutputFormat, PathBuf>,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageEntry {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub tier: RiskTier,
}

/// Extract → score/compose → save, for one package at a time.
pub struct Pipeline {
    strategy: Strategy,
    composer: ReportComposer,
    writer: ReportWriter,
}

impl Pipeline {
    pub fn new(strategy: Strategy, composer: ReportComposer, writer: ReportWriter) -> Self {
        Self {
            strategy,
            composer,
            writer,
        }
    }

    /// Pick a strategy from config and what is installed.
    ///
    /// Order: explicit facts file, `aapt` on the configured path, demo facts
    /// when `demo_fallback` is set, otherwise minimal.
    pub fn select(config: &Config, facts_file: Option<&Path>) -> Self {
        let strategy = if let Some(facts) = facts_file {
            Strategy::Full(Box::new(FactsFileExtractor::new(facts)))
        } else {
            let aapt = AaptExtractor::new(&config.extractor.aapt, config.extractor.timeout());
            if aapt.is_available() {
                Strategy::Full(Box::new(aapt))
            } else if config.extractor.demo_fallback {
                tracing::warn!("aapt not found, using demo facts");
                Strategy::Full(Box::new(DemoExtractor))
            } else {
                tracing::warn!("aapt not found, reports will be based on file names only");
                Strategy::Minimal
            }
        };

        let pipeline = Self::new(
            strategy,
            ReportComposer::new(RiskScorer::new(config.rules.clone())),
            ReportWriter::new(&config.output.reports_dir),
        );
        tracing::debug!(strategy = pipeline.strategy_name(), "pipeline selected");
        pipeline
    }

    pub fn strategy_name(&self) -> &'static str {
        match &self.strategy {
            Strategy::Full(extractor) => extractor.name(),
            Strategy::Minimal => "minimal",
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self.strategy, Strategy::Full(_))
    }

    pub fn composer(&self) -> &ReportComposer {
        &self.composer
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    fn facts(&self, path: &Path) -> PackageFacts {
        match &self.strategy {
            Strategy::Full(extractor) => adapter::extract_or_empty(extractor.as_ref(), path),
            Strategy::Minimal => PackageFacts::default(),
        }
    }

    /// Analyze one package and save its report in `formats`.
    ///
    /// Only a missing or unreadable package is an error. Extraction,
    /// composition and per-format write failures degrade to partial results.
    pub fn analyze<S: AsRef<str>>(&self, path: &Path, formats: &[S]) -> Result<AnalysisOutcome> {
        let file = FileDescriptor::from_path(path)?;
        let facts = self.facts(path);
        let report = self.composer.compose(&file, &facts);

        if report.is_empty() {
            return Ok(AnalysisOutcome {
                report,
                saved: BTreeMap::new(),
            });
        }

        let saved = self.writer.save(&report, &file.base_name(), formats);
        Ok(AnalysisOutcome { report, saved })
    }

    /// Quick tier for a package. Uses extracted permissions when the
    /// strategy has an extractor, the file name alone otherwise.
    pub fn triage(&self, path: &Path) -> TriageEntry {
        let name = display_name(path);
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let scorer = self.composer.scorer();

        let tier = match &self.strategy {
            Strategy::Full(_) => {
                let facts = self.facts(path);
                scorer.quick_tier(&name, Some(&facts.permissions))
            }
            Strategy::Minimal => scorer.quick_tier(&name, None),
        };

        TriageEntry {
            name,
            path: path.to_path_buf(),
            size_bytes,
            tier,
        }
    }
}

/// `*.apk` files under `dirs`, searched recursively, at most `limit` of them.
pub fn find_packages(dirs: &[PathBuf], limit: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for dir in dirs {
        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "directory does not exist, skipping");
            continue;
        }
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot read directory entry");
                    continue;
                }
            };
            let is_apk = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("apk"));
            if entry.file_type().is_file() && is_apk {
                found.push(entry.into_path());
                if found.len() >= limit {
                    return found;
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Clock, FixedClock};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn pipeline(strategy: Strategy, reports: &Path) -> Pipeline {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(
            chrono::Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        Pipeline::new(
            strategy,
            ReportComposer::with_clock(RiskScorer::default(), clock.clone()),
            ReportWriter::with_clock(reports, clock),
        )
    }

    #[test]
    fn minimal_strategy_scores_file_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("CrackGameFree.apk");
        std::fs::write(&apk, [0u8; 100]).unwrap();

        let p = pipeline(Strategy::Minimal, &dir.path().join("reports"));
        assert!(!p.is_full());

        let entry = p.triage(&apk);
        assert_eq!(entry.tier, RiskTier::High);
        assert_eq!(entry.size_bytes, 100);

        let outcome = p.analyze(&apk, &["json"]).unwrap();
        assert_eq!(outcome.report.permissions.total, 0);
        assert_eq!(outcome.report.security_assessment.suspicious_score, 4);
        assert_eq!(outcome.saved.len(), 1);
    }

    #[test]
    fn demo_strategy_fills_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let apk = dir.path().join("TestApp.apk");
        std::fs::write(&apk, b"PK").unwrap();

        let p = pipeline(
            Strategy::Full(Box::new(DemoExtractor)),
            &dir.path().join("reports"),
        );
        assert_eq!(p.strategy_name(), "demo");

        let outcome = p.analyze(&apk, &["json", "txt", "csv"]).unwrap();
        assert_eq!(outcome.report.permissions.total, 3);
        assert_eq!(outcome.report.statistics.activities, 1);
        assert_eq!(outcome.report.security_assessment.risk_level, RiskTier::Low);
        assert_eq!(outcome.saved.len(), 3);
    }

    #[test]
    fn missing_package_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = pipeline(Strategy::Minimal, dir.path());
        assert!(p.analyze(&dir.path().join("gone.apk"), &["json"]).is_err());
    }

    #[test]
    fn finds_apks_recursively_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("a.apk"), b"").unwrap();
        std::fs::write(dir.path().join("nested/b.APK"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let found = find_packages(&[dir.path().to_path_buf()], MAX_PACKAGES);
        assert_eq!(found.len(), 2);

        let found = find_packages(&[dir.path().to_path_buf()], 1);
        assert_eq!(found.len(), 1);
    }
}
