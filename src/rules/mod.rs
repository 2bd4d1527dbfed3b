pub mod builtin;
pub mod scorer;
pub mod tier;

use serde::{Deserialize, Serialize};

pub use scorer::{RiskScorer, ScoreBreakdown, MAX_SCORE};
pub use tier::{full_tier, RiskTier};

/// The heuristic tables a scorer runs with.
///
/// Loaded from `[rules]` in `.mobileguard.toml`; an omitted table falls back
/// to the built-in one. Tests construct custom sets directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Substrings matched case-insensitively against the package file name.
    #[serde(default = "builtin::suspicious_keywords")]
    pub suspicious_keywords: Vec<String>,
    /// Substrings matched case-insensitively against permission identifiers.
    #[serde(default = "builtin::dangerous_permissions")]
    pub dangerous_permissions: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            suspicious_keywords: builtin::suspicious_keywords(),
            dangerous_permissions: builtin::dangerous_permissions(),
        }
    }
}

impl RuleSet {
    pub fn new(suspicious_keywords: Vec<String>, dangerous_permissions: Vec<String>) -> Self {
        Self {
            suspicious_keywords,
            dangerous_permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_tables_fall_back_to_builtin() {
        let rules: RuleSet = toml::from_str(r#"suspicious_keywords = ["sketchy"]"#).unwrap();
        assert_eq!(rules.suspicious_keywords, vec!["sketchy"]);
        assert_eq!(rules.dangerous_permissions, builtin::dangerous_permissions());
    }
}
