pub mod aapt;
pub mod demo;
pub mod facts_file;

use std::path::Path;

use crate::error::Result;
use crate::ir::PackageFacts;

pub use aapt::AaptExtractor;
pub use demo::DemoExtractor;
pub use facts_file::FactsFileExtractor;

/// An extractor reads declared permissions and intent filters out of a
/// package. Manifest parsing itself lives behind this seam.
pub trait Extractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Extract static facts from the package at `path`.
    fn extract(&self, path: &Path) -> Result<PackageFacts>;
}

/// Run an extractor, degrading any failure to empty facts.
///
/// The pipeline keeps going with an empty permission list, which composes
/// into a low-tier report.
pub fn extract_or_empty(extractor: &dyn Extractor, path: &Path) -> PackageFacts {
    match extractor.extract(path) {
        Ok(facts) => facts,
        Err(e) => {
            tracing::warn!(
                extractor = extractor.name(),
                path = %path.display(),
                error = %e,
                "extraction failed, continuing with empty facts"
            );
            PackageFacts::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;

    struct Failing;

    impl Extractor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extract(&self, path: &Path) -> Result<PackageFacts> {
            Err(GuardError::Extraction {
                path: path.display().to_string(),
                message: "corrupt manifest".into(),
            })
        }
    }

    #[test]
    fn failure_degrades_to_empty_facts() {
        let facts = extract_or_empty(&Failing, Path::new("broken.apk"));
        assert!(facts.is_empty());
    }
}
