use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, Result};
use crate::output::{OutputFormat, REPORTS_DIR};
use crate::rules::RuleSet;

/// Top-level configuration from `.mobileguard.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RuleSet,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where report file sets are written.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
    /// Formats written when none are requested explicitly.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from(REPORTS_DIR)
}

fn default_formats() -> Vec<String> {
    vec!["json".into(), "txt".into()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
            formats: default_formats(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Name or path of the `aapt` binary.
    #[serde(default = "default_aapt")]
    pub aapt: PathBuf,
    /// Upper bound on one extraction run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Use fixed demo facts when no real extractor is available.
    #[serde(default)]
    pub demo_fallback: bool,
}

fn default_aapt() -> PathBuf {
    PathBuf::from("aapt")
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            aapt: default_aapt(),
            timeout_secs: default_timeout_secs(),
            demo_fallback: false,
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(bad) = self
            .output
            .formats
            .iter()
            .find(|f| OutputFormat::from_str_lenient(f).is_none())
        {
            return Err(GuardError::Config(format!(
                "unknown format '{bad}' in [output].formats"
            )));
        }
        if self.extractor.timeout_secs == 0 {
            return Err(GuardError::Config(
                "[extractor].timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# mobileguard configuration

[rules]
# Replace the built-in tables. Matching is case-insensitive substring matching.
# suspicious_keywords = ["hack", "crack", "mod", "premium", "free"]
# dangerous_permissions = ["READ_SMS", "SEND_SMS", "CAMERA", "RECORD_AUDIO"]

[output]
reports_dir = "analysis_reports"
# json, csv, txt, html
formats = ["json", "txt"]

[extractor]
aapt = "aapt"
timeout_secs = 60
# Use fixed demo facts when aapt is not installed.
demo_fallback = false
"#
    }
}
