use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;

use super::types::{ApiError, CreateRepoRequest, PutContentsRequest, RepoInfo};

/// Default base URL for the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";

/// The three GitHub operations an upload run needs.
///
/// Implemented by [`GithubClient`] against the real API; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait GithubApi {
    /// Fetch repository metadata.
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo>;

    /// Create a new public repository (no initial commit) under the
    /// authenticated user.
    async fn create_repo(&self, name: &str, description: &str) -> Result<RepoInfo>;

    /// Create a file at `path` with a single commit. `content` is raw text;
    /// encoding is the implementation's concern.
    async fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<()>;
}

/// Client for the GitHub REST API.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GithubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Create a client against a specific API base URL (GitHub Enterprise,
    /// or a local server in tests).
    pub fn with_api_url(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            // GitHub rejects requests without a User-Agent
            .header("User-Agent", concat!("ghpush/", env!("CARGO_PKG_VERSION")))
    }

    /// Send a request and map non-success responses to errors, passing the
    /// remote error message through when the body carries one.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req.send().await.context("GitHub API request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body: ApiError = resp.json().await.unwrap_or_default();
            match body.message {
                Some(message) => anyhow::bail!("{}", message),
                None => anyhow::bail!("GitHub API error: {}", status.as_u16()),
            }
        }
        Ok(resp)
    }
}

/// Base64-encode file content for the Contents API.
///
/// Encodes the UTF-8 bytes of the string, so multi-byte characters survive
/// the round trip.
fn encode_content(content: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(content.as_bytes())
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let resp = self
            .send(self.request(reqwest::Method::GET, &format!("/repos/{}/{}", owner, repo)))
            .await?;
        resp.json()
            .await
            .context("Failed to parse repository metadata")
    }

    async fn create_repo(&self, name: &str, description: &str) -> Result<RepoInfo> {
        let body = CreateRepoRequest {
            name,
            description,
            private: false,
            auto_init: false,
        };
        let resp = self
            .send(self.request(reqwest::Method::POST, "/user/repos").json(&body))
            .await?;
        resp.json()
            .await
            .context("Failed to parse created repository metadata")
    }

    async fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<()> {
        let body = PutContentsRequest {
            message,
            content: encode_content(content),
        };
        self.send(
            self.request(
                reqwest::Method::PUT,
                &format!("/repos/{}/{}/contents/{}", owner, repo, path),
            )
            .json(&body),
        )
        .await?;
        Ok(())
    }
}
