pub mod clock;
pub mod composer;
pub mod preview;

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::ir::IntentFilter;
use crate::rules::RiskTier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::ReportComposer;
pub use preview::PreviewModel;

/// Version string stamped into every report.
pub const REPORT_VERSION: &str = "1.0";

/// The composed analysis document for one package.
///
/// Built once by [`ReportComposer`] and only read afterwards. The default
/// value is the empty sentinel returned when composition fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: Metadata,
    pub permissions: PermissionSection,
    pub intents: BTreeMap<String, IntentFilter>,
    pub security_assessment: SecurityAssessment,
    pub recommendations: Vec<String>,
    pub statistics: Statistics,
}

impl Report {
    /// True for the sentinel produced by a failed composition.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub apk_name: String,
    pub apk_path: String,
    pub file_size: u64,
    pub last_modified: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Composition time.
    pub analysis_date: Option<DateTime<Local>>,
    pub report_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSection {
    pub total: usize,
    pub list: Vec<String>,
    /// Subsequence of `list`.
    pub dangerous: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub risk_level: RiskTier,
    pub suspicious_score: u8,
    pub dangerous_permissions_count: usize,
    pub warnings: Vec<String>,
}

/// Count view duplicated from the other sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_permissions: usize,
    pub dangerous_permissions: usize,
    pub activities: usize,
    pub suspicious_score: u8,
}
