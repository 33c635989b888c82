pub mod types;

pub use types::{DispatchOutcome, DocumentationRequest, FilePayload, GeneratePayload};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::DocsConfig;
use crate::filter;

/// Reason reported when filtering leaves nothing to send.
pub const NO_DOCUMENTABLE_FILES: &str = "no documentable files";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("DOCS_SERVER_URL not configured")]
    MissingServerUrl,
}

/// Build the request body for the documentation server, keeping only
/// documentable files. Returns `None` when nothing survives the filter.
pub fn build_payload(request: &DocumentationRequest) -> Option<GeneratePayload<'_>> {
    let files: Vec<FilePayload<'_>> = request
        .files
        .iter()
        .filter(|entry| filter::should_document(&entry.path))
        .map(FilePayload::from)
        .collect();

    if files.is_empty() {
        return None;
    }

    Some(GeneratePayload {
        owner: &request.owner,
        repo: &request.repo,
        branch: request.branch.as_deref().filter(|branch| !branch.is_empty()),
        pr_number: request.pr_number,
        files,
    })
}

/// Submits documentation requests to the configured documentation server.
pub struct Dispatcher {
    http: reqwest::Client,
    config: DocsConfig,
}

impl Dispatcher {
    pub fn new(config: DocsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Filter the request's files and POST the survivors to
    /// `{server_url}/api/generate`.
    ///
    /// Only a missing server URL is an `Err`; transport failures and non-2xx
    /// answers come back as [`DispatchOutcome::Failed`]. Nothing is retried.
    #[instrument(skip_all, fields(owner = %request.owner, repo = %request.repo, pr = ?request.pr_number))]
    pub async fn dispatch(
        &self,
        request: &DocumentationRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(payload) = build_payload(request) else {
            warn!(files = request.files.len(), "no documentable files in this change, skipping update");
            return Ok(DispatchOutcome::Skipped {
                reason: NO_DOCUMENTABLE_FILES.to_string(),
            });
        };

        let base_url = self
            .config
            .server_url
            .as_deref()
            .ok_or(DispatchError::MissingServerUrl)?;
        let url = format!("{}/api/generate", base_url.trim_end_matches('/'));

        info!(files = payload.files.len(), %url, "sending update to documentation server");
        let mut builder = self.http.post(&url).json(&payload);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                return Ok(DispatchOutcome::Failed {
                    error: err.to_string(),
                })
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return Ok(DispatchOutcome::Failed {
                    error: err.to_string(),
                })
            }
        };
        debug!(%status, body_bytes = body.len(), "documentation server responded");

        if !status.is_success() {
            return Ok(DispatchOutcome::Failed {
                error: format!("documentation server returned {status}: {body}"),
            });
        }

        let response = if body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body))
        };
        Ok(DispatchOutcome::Accepted { response })
    }
}
