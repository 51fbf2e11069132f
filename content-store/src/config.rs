use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum ContentStoreConfig {
    Github(GithubConfig),
    /// In-process store, for local development. Content is lost on exit.
    Memory {
        #[serde(default)]
        initial_artists: Vec<String>,
    },
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        ContentStoreConfig::Github(GithubConfig::default())
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: Url,
    /// `owner/name` of the repository holding the file
    pub repository: String,
    pub branch: String,
    /// Environment variable the access token is read from
    pub token_env: String,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            repository: "belk714/tourtracker".into(),
            branch: "main".into(),
            token_env: "GITHUB_TOKEN".into(),
            user_agent: "TourTracker-Worker".into(),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Repository must be in owner/name form: {0:?}")]
    InvalidRepository(String),
    #[error("Branch cannot be empty")]
    EmptyBranch,
    #[error("Token environment variable name cannot be empty")]
    EmptyTokenEnv,
}

impl ContentStoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ContentStoreConfig::Github(github) => github.validate(),
            ContentStoreConfig::Memory { .. } => Ok(()),
        }
    }
}

impl GithubConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let valid_repository = self
            .repository
            .split_once('/')
            .is_some_and(|(owner, name)| {
                !owner.is_empty() && !name.is_empty() && !name.contains('/')
            });
        if !valid_repository {
            return Err(ValidationError::InvalidRepository(self.repository.clone()));
        }
        if self.branch.is_empty() {
            return Err(ValidationError::EmptyBranch);
        }
        if self.token_env.is_empty() {
            return Err(ValidationError::EmptyTokenEnv);
        }
        Ok(())
    }
}
