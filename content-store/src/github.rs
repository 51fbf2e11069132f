use crate::codec::{decode_content, encode_content};
use crate::config::GithubConfig;
use crate::{ContentStore, StoreError, StoredContent, VersionToken};
use async_trait::async_trait;
use http::header::ACCEPT;
use serde::{Deserialize, Serialize};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

/// Content store backed by the GitHub repository contents API.
///
/// Each call is exactly one HTTP round trip. The blob SHA of the file is the
/// version token: GitHub rejects an update whose `sha` no longer matches the
/// file on the branch with `409 Conflict`.
pub struct GithubContentStore {
    client: reqwest::Client,
    config: GithubConfig,
    token: Option<String>,
}

impl GithubContentStore {
    pub fn new(config: GithubConfig, token: Option<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(GithubContentStore {
            client,
            config,
            token,
        })
    }

    fn token(&self) -> Result<&str, StoreError> {
        self.token
            .as_deref()
            .ok_or_else(|| StoreError::MissingCredential(self.config.token_env.clone()))
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_url.as_str().trim_end_matches('/'),
            self.config.repository,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentStore for GithubContentStore {
    async fn read(&self, path: &str) -> Result<StoredContent, StoreError> {
        let token = self.token()?;

        let response = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = %status, "Contents fetch failed");
            return Err(StoreError::Read(status));
        }

        let file = response.json::<ContentsResponse>().await?;
        let text = decode_content(&file.content)?;

        Ok(StoredContent {
            text,
            version: VersionToken::new(file.sha),
        })
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        let token = self.token()?;

        let body = UpdateRequest {
            message,
            content: encode_content(text),
            sha: version.as_str(),
            branch: &self.config.branch,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = %status, version = %version, "Contents update failed");
            return Err(StoreError::Write(status));
        }

        Ok(())
    }

    fn check_ready(&self) -> Result<(), StoreError> {
        self.token().map(|_| ())
    }
}
