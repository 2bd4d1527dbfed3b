use serde::{Deserialize, Serialize};

/// Discrete output of the risk heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Display color for this tier. Kept out of the report data.
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Authoritative tier used by the composer once permissions are known.
///
/// Either condition is enough: a high dangerous-permission count raises the
/// tier even when the score stays low.
pub fn full_tier(score: u8, dangerous_count: usize) -> RiskTier {
    if score >= 7 || dangerous_count >= 3 {
        RiskTier::High
    } else if score >= 4 || dangerous_count >= 1 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_alone_drives_tier() {
        assert_eq!(full_tier(0, 0), RiskTier::Low);
        assert_eq!(full_tier(3, 0), RiskTier::Low);
        assert_eq!(full_tier(4, 0), RiskTier::Medium);
        assert_eq!(full_tier(7, 0), RiskTier::High);
    }

    #[test]
    fn dangerous_count_drives_tier() {
        assert_eq!(full_tier(0, 1), RiskTier::Medium);
        assert_eq!(full_tier(2, 2), RiskTier::Medium);
        assert_eq!(full_tier(3, 3), RiskTier::High);
    }

    #[test]
    fn tiers_order_by_severity() {
        assert!(RiskTier::High > RiskTier::Medium);
        assert!(RiskTier::Medium > RiskTier::Low);
        assert_eq!(RiskTier::from_str_lenient("MED"), Some(RiskTier::Medium));
        assert_eq!(RiskTier::from_str_lenient("critical"), None);
    }
}
