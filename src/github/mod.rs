pub mod types;

pub use types::{CommitRecord, PrFileStatus, PullRequestEvent, PushEvent, WebhookEvent};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response, Url};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GitHubConfig;

#[cfg(test)]
use mockall::automock;

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const PER_PAGE: usize = 100;
/// GitHub stops listing pull request files after 3000 entries.
const MAX_FILE_PAGES: usize = 30;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid GitHub API URL: {0}")]
    InvalidUrl(String),

    #[error("Content of {path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
}

/// The source-control calls the event pipeline depends on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Every file touched by a pull request, in the order GitHub lists them.
    async fn list_pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PrFileStatus>, GitHubError>;

    /// Text content of `path` at `git_ref`.
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError>;

    /// Post a comment on an issue or pull request.
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError>;
}

/// REST client for the GitHub API.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        }
    }

    /// `{api_url}/repos/{owner}/{repo}/{segments...}` with each segment escaped.
    fn repo_url(&self, owner: &str, repo: &str, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url =
            Url::parse(&self.api_url).map_err(|_| GitHubError::InvalidUrl(self.api_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| GitHubError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .push("repos")
            .push(owner)
            .push(repo)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, accept: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(USER_AGENT, "docsync")
            .header(ACCEPT, accept);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

fn ensure_success(response: Response) -> Result<Response, GitHubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(GitHubError::Status {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}

#[async_trait]
impl SourceControl for GitHubClient {
    #[instrument(skip(self))]
    async fn list_pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PrFileStatus>, GitHubError> {
        let number = number.to_string();
        let mut files = Vec::new();

        for page in 1..=MAX_FILE_PAGES {
            let mut url = self.repo_url(owner, repo, &["pulls", number.as_str(), "files"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = self.request(Method::GET, url, JSON_MEDIA_TYPE).send().await?;
            let batch: Vec<PrFileStatus> = ensure_success(response)?.json().await?;
            debug!(page, received = batch.len(), "listed pull request files");

            let last_page = batch.len() < PER_PAGE;
            files.extend(batch);
            if last_page {
                break;
            }
        }

        Ok(files)
    }

    #[instrument(skip(self))]
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        let segments: Vec<&str> = std::iter::once("contents").chain(path.split('/')).collect();
        let mut url = self.repo_url(owner, repo, &segments)?;
        url.query_pairs_mut().append_pair("ref", git_ref);

        let bytes = ensure_success(
            self.request(Method::GET, url, RAW_MEDIA_TYPE)
                .send()
                .await?,
        )?
        .bytes()
        .await?;
        debug!(bytes = bytes.len(), "received file content");

        String::from_utf8(bytes.to_vec()).map_err(|_| GitHubError::InvalidUtf8 {
            path: path.to_string(),
        })
    }

    #[instrument(skip(self, body))]
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        let number = number.to_string();
        let url = self.repo_url(owner, repo, &["issues", number.as_str(), "comments"])?;
        ensure_success(
            self.request(Method::POST, url, JSON_MEDIA_TYPE)
                .json(&serde_json::json!({ "body": body }))
                .send()
                .await?,
        )?;
        debug!("comment posted");
        Ok(())
    }
}
