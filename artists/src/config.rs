use content_store::config::{ContentStoreConfig, ValidationError as StoreValidationError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("File path cannot be empty")]
    EmptyFilePath,

    #[error("Content store: {0}")]
    ContentStore(#[from] StoreValidationError),
}

fn default_file_path() -> String {
    "artists.json".into()
}

/// Artist list service configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the public API
    pub listener: Listener,
    /// Listener for health and readiness probes
    pub admin_listener: Listener,
    /// Path of the artist file inside the content store
    #[serde(default = "default_file_path")]
    pub file_path: String,
    /// How many times a write that lost a race is re-read and re-applied
    #[serde(default)]
    pub conflict_retries: u32,
    #[serde(default)]
    pub content_store: ContentStoreConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.file_path.trim_matches('/').is_empty() {
            return Err(ValidationError::EmptyFilePath);
        }

        self.content_store.validate()?;
        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}
