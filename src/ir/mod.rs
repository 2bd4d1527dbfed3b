use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{GuardError, Result};

/// Static facts about one package, as returned by an extractor.
///
/// Produced once per analysis and consumed by the composer. Nothing
/// downstream mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFacts {
    /// Declared permissions in manifest order. Duplicates are kept.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Component name → intent filter.
    #[serde(default)]
    pub intents: BTreeMap<String, IntentFilter>,
}

impl PackageFacts {
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.intents.is_empty()
    }
}

/// Declared intent filter of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFilter {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
}

/// On-disk metadata about the package, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Display name, usually the file name including `.apk`.
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Local>>,
    /// Hex SHA-256 of the package bytes, when it was read from disk.
    pub sha256: Option<String>,
}

impl FileDescriptor {
    /// Build a descriptor from a package on disk, hashing its contents.
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GuardError::NotFound(path.display().to_string()),
            _ => GuardError::Io(e),
        })?;

        let sha256 = sha256_file(path)?;

        Ok(Self {
            name: display_name(path),
            path: path.to_path_buf(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Local>::from),
            sha256: Some(sha256),
        })
    }

    /// File name without the `.apk` extension, used as the report base name.
    pub fn base_name(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Hex SHA-256 of a file, streamed through the hasher.
fn sha256_file(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    std::io::copy(&mut std::fs::File::open(path)?, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
