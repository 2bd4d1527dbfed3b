use std::sync::Arc;

use crate::error::{GuardError, Result};
use crate::ir::{FileDescriptor, PackageFacts};
use crate::rules::{RiskScorer, RiskTier, ScoreBreakdown};

use super::clock::{Clock, SystemClock};
use super::{
    Metadata, PermissionSection, Report, SecurityAssessment, Statistics, REPORT_VERSION,
};

/// Permission count above which a warning is emitted.
const MANY_PERMISSIONS_WARNING: usize = 20;
/// Permission count above which alternatives are recommended.
const MANY_PERMISSIONS_RECOMMENDATION: usize = 25;

/// Turns extractor facts and file metadata into a [`Report`].
pub struct ReportComposer {
    scorer: RiskScorer,
    clock: Arc<dyn Clock>,
}

impl ReportComposer {
    pub fn new(scorer: RiskScorer) -> Self {
        Self::with_clock(scorer, Arc::new(SystemClock))
    }

    pub fn with_clock(scorer: RiskScorer, clock: Arc<dyn Clock>) -> Self {
        Self { scorer, clock }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Compose a report, returning the empty sentinel on malformed input.
    ///
    /// Callers check [`Report::is_empty`] before persisting.
    pub fn compose(&self, file: &FileDescriptor, facts: &PackageFacts) -> Report {
        match self.try_compose(file, facts) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    package = %file.path.display(),
                    error = %e,
                    "report composition failed, returning empty report"
                );
                Report::default()
            }
        }
    }

    /// Compose a report, surfacing malformed input as an error.
    pub fn try_compose(&self, file: &FileDescriptor, facts: &PackageFacts) -> Result<Report> {
        validate(file, facts)?;

        let scored = self.scorer.score(&file.name, &facts.permissions);
        let warnings = self.warnings(&file.name, &facts.permissions, &scored);

        let security_assessment = SecurityAssessment {
            risk_level: scored.tier,
            suspicious_score: scored.score,
            dangerous_permissions_count: scored.dangerous.len(),
            warnings,
        };

        let statistics = Statistics {
            total_permissions: facts.permissions.len(),
            dangerous_permissions: scored.dangerous.len(),
            activities: facts.intents.len(),
            suspicious_score: scored.score,
        };

        let permissions = PermissionSection {
            total: facts.permissions.len(),
            list: facts.permissions.clone(),
            dangerous: scored.dangerous,
        };

        let recommendations = recommendations(&security_assessment, permissions.list.len());

        let metadata = Metadata {
            apk_name: file.name.clone(),
            apk_path: file.path.display().to_string(),
            file_size: file.size_bytes,
            last_modified: file.last_modified,
            sha256: file.sha256.clone(),
            analysis_date: Some(self.clock.now()),
            report_version: REPORT_VERSION.into(),
        };

        tracing::debug!(
            package = %file.name,
            tier = %security_assessment.risk_level,
            score = security_assessment.suspicious_score,
            "report composed"
        );

        Ok(Report {
            metadata,
            permissions,
            intents: facts.intents.clone(),
            security_assessment,
            recommendations,
            statistics,
        })
    }

    /// Warnings in fixed rule order. Only the first keyword is named here,
    /// while the score counts every keyword.
    fn warnings(&self, name: &str, permissions: &[String], scored: &ScoreBreakdown) -> Vec<String> {
        let mut warnings = Vec::new();

        if !scored.dangerous.is_empty() {
            warnings.push(format!(
                "{} dangerous permissions detected",
                scored.dangerous.len()
            ));
        }

        if let Some(keyword) = self.scorer.first_keyword(name) {
            warnings.push(format!("Suspicious keyword in file name: '{keyword}'"));
        }

        if permissions.len() > MANY_PERMISSIONS_WARNING {
            warnings.push(format!(
                "Large number of permissions: {}",
                permissions.len()
            ));
        }

        warnings
    }
}

impl Default for ReportComposer {
    fn default() -> Self {
        Self::new(RiskScorer::default())
    }
}

fn validate(file: &FileDescriptor, facts: &PackageFacts) -> Result<()> {
    if file.name.trim().is_empty() {
        return Err(GuardError::Composition("package name is empty".into()));
    }
    if let Some(idx) = facts.permissions.iter().position(|p| p.trim().is_empty()) {
        return Err(GuardError::Composition(format!(
            "empty permission identifier at index {idx}"
        )));
    }
    if facts.intents.keys().any(|k| k.trim().is_empty()) {
        return Err(GuardError::Composition(
            "intent filter with empty component name".into(),
        ));
    }
    Ok(())
}

/// Recommendations derived from an already computed assessment.
pub fn recommendations(assessment: &SecurityAssessment, permission_count: usize) -> Vec<String> {
    let mut recs = Vec::new();

    if assessment.risk_level == RiskTier::High {
        recs.push("⚠️ DO NOT INSTALL! The file looks suspicious".to_string());
        recs.push("Check the APK with VirusTotal or another antivirus service".to_string());
    }

    if assessment.dangerous_permissions_count > 0 {
        recs.push(format!(
            "Warning! The app requests {} dangerous permissions",
            assessment.dangerous_permissions_count
        ));
        recs.push("Consider whether the app really needs these permissions".to_string());
    }

    if permission_count > MANY_PERMISSIONS_RECOMMENDATION {
        recs.push("The app requests too many permissions".to_string());
        recs.push("Consider alternative apps that request fewer permissions".to_string());
    }

    if recs.is_empty() {
        recs.push("Heuristic check found no threats".to_string());
    }

    recs
}
