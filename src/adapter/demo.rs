use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::ir::{IntentFilter, PackageFacts};

/// Returns the same small facts set for every package.
///
/// Stands in for a real extractor when none is installed, so the rest of
/// the pipeline can still be exercised.
pub struct DemoExtractor;

impl super::Extractor for DemoExtractor {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn extract(&self, path: &Path) -> Result<PackageFacts> {
        tracing::debug!(path = %path.display(), "using demo facts");

        let mut intents = BTreeMap::new();
        intents.insert(
            "com.example.MainActivity".to_string(),
            IntentFilter {
                actions: vec!["android.intent.action.MAIN".into()],
                categories: vec!["android.intent.category.LAUNCHER".into()],
                data: vec![],
            },
        );

        Ok(PackageFacts {
            permissions: vec![
                "android.permission.INTERNET".into(),
                "android.permission.ACCESS_NETWORK_STATE".into(),
                "android.permission.READ_EXTERNAL_STORAGE".into(),
            ],
            intents,
        })
    }
}
