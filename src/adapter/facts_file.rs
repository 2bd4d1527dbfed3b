use std::path::{Path, PathBuf};

use crate::error::{GuardError, Result};
use crate::ir::PackageFacts;

/// Reads facts precomputed by an external tool from a JSON file shaped as
/// `{"permissions": [...], "intents": {component: {actions, categories, data}}}`.
///
/// The package path passed to `extract` is ignored; the facts file is
/// fixed at construction.
pub struct FactsFileExtractor {
    facts_path: PathBuf,
}

impl FactsFileExtractor {
    pub fn new(facts_path: impl Into<PathBuf>) -> Self {
        Self {
            facts_path: facts_path.into(),
        }
    }
}

impl super::Extractor for FactsFileExtractor {
    fn name(&self) -> &'static str {
        "facts-file"
    }

    fn extract(&self, _path: &Path) -> Result<PackageFacts> {
        let content = std::fs::read_to_string(&self.facts_path).map_err(|e| {
            GuardError::Extraction {
                path: self.facts_path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        let facts: PackageFacts = serde_json::from_str(&content)?;
        Ok(facts)
    }
}
