//! Client for the remote file store holding the artist list.
//!
//! The store exposes a single text file through two operations: a read that
//! returns the content with its version token, and a write that only succeeds
//! if the caller's token still matches the current content.

pub mod codec;
pub mod config;
pub mod github;
pub mod memory;

#[cfg(test)]
mod testutils;

use async_trait::async_trait;
use config::ContentStoreConfig;
use github::GithubContentStore;
use http::StatusCode;
use memory::MemoryContentStore;
use std::fmt;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Missing {0}")]
    MissingCredential(String),
    #[error("content store read failed: {0}")]
    Read(StatusCode),
    #[error("content store write failed: {0}")]
    Write(StatusCode),
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("could not encode seed content: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl StoreError {
    /// True when a write was rejected because the version token was stale.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::Write(StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED)
        )
    }
}

/// Opaque identifier of one content state of the file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        VersionToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File text together with the version it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredContent {
    pub text: String,
    pub version: VersionToken,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetches the current text of `path` and its version token.
    async fn read(&self, path: &str) -> Result<StoredContent, StoreError>;

    /// Replaces the text of `path`, provided it is still at `version`.
    async fn write(
        &self,
        path: &str,
        text: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError>;

    /// Fails if the store cannot serve requests at all, e.g. because its
    /// credential was never provided.
    fn check_ready(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Builds the store selected in config.
///
/// `credential` resolves a credential by its configured name. The binary
/// passes an environment lookup; tests pass a fixed value.
pub fn build_store<F>(
    config: &ContentStoreConfig,
    file_path: &str,
    credential: F,
) -> Result<Arc<dyn ContentStore>, StoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match config {
        ContentStoreConfig::Github(github) => {
            let token = credential(&github.token_env);
            if token.is_none() {
                tracing::warn!(
                    token_env = %github.token_env,
                    "No credential found; requests will fail until it is provided"
                );
            }
            Ok(Arc::new(GithubContentStore::new(github.clone(), token)?))
        }
        ContentStoreConfig::Memory { initial_artists } => {
            let text = serde_json::to_string_pretty(initial_artists)?;
            Ok(Arc::new(MemoryContentStore::new().with_file(file_path, text)))
        }
    }
}
