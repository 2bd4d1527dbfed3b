use serde::Serialize;

use crate::rules::RiskTier;

use super::Report;

/// How many warnings and recommendations a preview shows.
const PREVIEW_ITEMS: usize = 3;

/// Display-ready summary of a [`Report`] for an interactive view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewModel {
    pub risk_tier: RiskTier,
    /// Color hint derived from the tier at render time.
    pub color: &'static str,
    pub suspicious_score: u8,
    pub total_permissions: usize,
    pub dangerous_permissions: usize,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PreviewModel {
    pub fn from_report(report: &Report) -> Self {
        let sa = &report.security_assessment;
        Self {
            risk_tier: sa.risk_level,
            color: sa.risk_level.color(),
            suspicious_score: sa.suspicious_score,
            total_permissions: report.permissions.total,
            dangerous_permissions: report.permissions.dangerous.len(),
            warnings: sa.warnings.iter().take(PREVIEW_ITEMS).cloned().collect(),
            recommendations: report
                .recommendations
                .iter()
                .take(PREVIEW_ITEMS)
                .cloned()
                .collect(),
        }
    }

    /// Plain terminal rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n  Risk level: {}\n", self.risk_tier.to_string().to_uppercase()));
        out.push_str(&format!("  Suspicious score: {}/10\n", self.suspicious_score));
        out.push_str(&format!(
            "  Permissions: {} (dangerous: {})\n",
            self.total_permissions, self.dangerous_permissions
        ));

        if !self.warnings.is_empty() {
            out.push_str("\n  Warnings:\n");
            for w in &self.warnings {
                out.push_str(&format!("    • {w}\n"));
            }
        }

        if !self.recommendations.is_empty() {
            out.push_str("\n  Recommendations:\n");
            for r in &self.recommendations {
                out.push_str(&format!("    • {r}\n"));
            }
        }
        out.push('\n');
        out
    }
}
