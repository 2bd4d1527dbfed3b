use super::tier::{full_tier, RiskTier};
use super::RuleSet;

/// Upper bound of the suspicious score.
pub const MAX_SCORE: u8 = 10;

/// Everything the scorer derives for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Number of suspicious keywords found in the file name (every match counts).
    pub keyword_hits: usize,
    /// Dangerous permissions in input order, each listed once.
    pub dangerous: Vec<String>,
    /// Suspicious score in `0..=MAX_SCORE`.
    pub score: u8,
    /// Tier from [`full_tier`].
    pub tier: RiskTier,
}

/// Applies a [`RuleSet`] to a package name and its permissions.
///
/// All matching is case-insensitive substring matching. The rule tables are
/// lowercased once at construction.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    rules: RuleSet,
    keywords: Vec<String>,
    dangerous: Vec<String>,
}

impl RiskScorer {
    pub fn new(rules: RuleSet) -> Self {
        let keywords = rules
            .suspicious_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let dangerous = rules
            .dangerous_permissions
            .iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            rules,
            keywords,
            dangerous,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Whether a single permission matches any dangerous-permission entry.
    pub fn is_dangerous(&self, permission: &str) -> bool {
        let lower = permission.to_lowercase();
        self.dangerous.iter().any(|d| lower.contains(d.as_str()))
    }

    /// Dangerous permissions, in input order, without repeats.
    pub fn dangerous_permissions(&self, permissions: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for perm in permissions {
            if self.is_dangerous(perm) && !out.contains(perm) {
                out.push(perm.clone());
            }
        }
        out
    }

    /// Count of keywords occurring in `name`. Cumulative: every keyword that
    /// matches contributes one hit.
    pub fn keyword_hits(&self, name: &str) -> usize {
        let lower = name.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .count()
    }

    /// First keyword, in table order, occurring in `name`.
    pub fn first_keyword(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(String::as_str)
    }

    /// `min(floor((hits + dangerous * 0.5) * 2), 10)`, computed in integers.
    pub fn suspicious_score(keyword_hits: usize, dangerous_count: usize) -> u8 {
        let doubled = keyword_hits
            .saturating_mul(2)
            .saturating_add(dangerous_count);
        doubled.min(MAX_SCORE as usize) as u8
    }

    /// Full scoring pass used by the composer.
    pub fn score(&self, name: &str, permissions: &[String]) -> ScoreBreakdown {
        let keyword_hits = self.keyword_hits(name);
        let dangerous = self.dangerous_permissions(permissions);
        let score = Self::suspicious_score(keyword_hits, dangerous.len());
        let tier = full_tier(score, dangerous.len());
        ScoreBreakdown {
            keyword_hits,
            dangerous,
            score,
            tier,
        }
    }

    /// Cheap tier for listings where only the file name (and maybe the
    /// permissions) is known.
    ///
    /// Tally is keyword hits plus half a point per dangerous-permission entry
    /// present in any permission. High at 2, medium at 1.
    pub fn quick_tier(&self, name: &str, permissions: Option<&[String]>) -> RiskTier {
        let hits = self.keyword_hits(name);

        let present = permissions
            .map(|perms| {
                let lowered: Vec<String> = perms.iter().map(|p| p.to_lowercase()).collect();
                self.dangerous
                    .iter()
                    .filter(|d| lowered.iter().any(|p| p.contains(d.as_str())))
                    .count()
            })
            .unwrap_or(0);

        // Tally doubled to stay in integers.
        let doubled = hits * 2 + present;
        if doubled >= 4 {
            RiskTier::High
        } else if doubled >= 2 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keyword_hits_are_cumulative() {
        let scorer = RiskScorer::default();
        let result = scorer.score("FreePremiumHack.apk", &[]);
        assert_eq!(result.keyword_hits, 3);
        assert_eq!(result.score, 6);
        assert_eq!(result.tier, RiskTier::Medium);
    }

    #[test]
    fn dangerous_count_raises_tier_without_score() {
        let scorer = RiskScorer::default();
        let result = scorer.score(
            "CleanApp.apk",
            &perms(&[
                "android.permission.INTERNET",
                "android.permission.READ_SMS",
                "android.permission.CAMERA",
            ]),
        );
        assert_eq!(result.keyword_hits, 0);
        assert_eq!(
            result.dangerous,
            perms(&["android.permission.READ_SMS", "android.permission.CAMERA"])
        );
        assert_eq!(result.score, 2);
        assert_eq!(result.tier, RiskTier::Medium);
    }

    #[test]
    fn dangerous_match_is_case_insensitive_and_deduplicated() {
        let scorer = RiskScorer::default();
        let dangerous = scorer.dangerous_permissions(&perms(&[
            "android.permission.record_audio",
            "android.permission.INTERNET",
            "android.permission.record_audio",
        ]));
        assert_eq!(dangerous, perms(&["android.permission.record_audio"]));
    }

    #[test]
    fn score_caps_at_ten() {
        let scorer = RiskScorer::default();
        let result = scorer.score("hack_crack_cheat_virus_trojan.apk", &[]);
        assert_eq!(result.keyword_hits, 5);
        assert_eq!(result.score, MAX_SCORE);
        assert_eq!(result.tier, RiskTier::High);
    }

    #[test]
    fn first_keyword_follows_table_order() {
        let scorer = RiskScorer::default();
        // "premium" precedes "free" in the table.
        assert_eq!(scorer.first_keyword("FreePremium.apk"), Some("premium"));
        assert_eq!(scorer.first_keyword("Calculator.apk"), None);
    }

    #[test]
    fn quick_tier_from_name_only() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.quick_tier("SafeApp.apk", None), RiskTier::Low);
        assert_eq!(scorer.quick_tier("TestApp.apk", None), RiskTier::Low);
        assert_eq!(scorer.quick_tier("VirusCleanerMod.apk", None), RiskTier::High);
        assert_eq!(scorer.quick_tier("SuperBot.apk", None), RiskTier::Medium);
    }

    #[test]
    fn quick_tier_counts_table_entries_not_permissions() {
        let scorer = RiskScorer::default();
        // Two permissions hit the same CAMERA entry: one half point.
        let list = perms(&["android.permission.CAMERA", "com.vendor.CAMERA_EXT"]);
        assert_eq!(scorer.quick_tier("Photo.apk", Some(&list)), RiskTier::Low);

        let list = perms(&["android.permission.CAMERA", "android.permission.READ_SMS"]);
        assert_eq!(scorer.quick_tier("Photo.apk", Some(&list)), RiskTier::Medium);
    }

    #[test]
    fn custom_rules_replace_builtin_tables() {
        let scorer = RiskScorer::new(RuleSet::new(
            vec!["Shady".into()],
            vec!["BLUETOOTH".into()],
        ));
        let result = scorer.score(
            "shady-hack.apk",
            &perms(&["android.permission.BLUETOOTH_ADMIN", "android.permission.CAMERA"]),
        );
        assert_eq!(result.keyword_hits, 1);
        assert_eq!(result.dangerous, perms(&["android.permission.BLUETOOTH_ADMIN"]));
        assert_eq!(result.score, 3);
    }
}
