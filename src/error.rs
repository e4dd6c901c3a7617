use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransloaderError {
    #[error("The language '{0}' is not supported.")]
    UnsupportedLanguage(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unexpected response shape: {0}")]
    Parse(String),

    #[error("Invalid command at {}", path.display())]
    ModuleLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Seed unavailable: {0}")]
    Seed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TransloaderError {
    /// Status-like code for validation failures the caller can fix.
    pub fn code(&self) -> Option<u16> {
        match self {
            TransloaderError::UnsupportedLanguage(_) => Some(400),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransloaderError>;
