use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuardError>;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Extraction failed for {path}: {message}")]
    Extraction { path: String, message: String },

    #[error("Report composition failed: {0}")]
    Composition(String),

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to write {format} report: {message}")]
    Serialization { format: String, message: String },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GuardError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
