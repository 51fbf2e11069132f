use content_store::StoreError;
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while serving the artist list
#[derive(Error, Debug)]
pub enum ArtistsError {
    #[error("Missing name")]
    MissingName,

    #[error("Not found")]
    RouteNotFound,

    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    #[error("Stored artist list is invalid: {0}")]
    InvalidContent(serde_json::Error),

    #[error("Collation data unavailable: {0}")]
    Collation(icu_collator::CollatorError),

    #[error("Response serialization error: {0}")]
    ResponseSerialization(serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtistsError {
    pub fn status(&self) -> StatusCode {
        match self {
            ArtistsError::MissingName => StatusCode::BAD_REQUEST,
            ArtistsError::RouteNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
