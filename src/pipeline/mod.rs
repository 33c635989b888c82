use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::changes::{self, ChangeEntry};
use crate::dispatch::{DispatchError, DispatchOutcome, Dispatcher, DocumentationRequest};
use crate::filter;
use crate::github::types::IssuesEvent;
use crate::github::{GitHubError, PullRequestEvent, PushEvent, SourceControl, WebhookEvent};

pub const STARTED_COMMENT: &str = "📚 Documentation update has been triggered for the changes in this pull request.\n\nThe documentation is being generated and will be available soon.";
pub const ISSUE_GREETING: &str = "Thanks for opening this issue!";

fn failure_comment(error: &str) -> String {
    format!("⚠️ There was an error updating the documentation: {error}. Please check the logs for more details.")
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to list pull request files: {0}")]
    ListFiles(#[source] GitHubError),

    #[error("Failed to update documentation: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Failed to post comment: {0}")]
    Comment(#[source] GitHubError),
}

/// How processing of a single event ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The event or action isn't one this service reacts to.
    Ignored,
    /// The event touched no files.
    NoChanges,
    Dispatched(DispatchOutcome),
    /// A greeting comment was posted on a new issue.
    Commented,
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineOutcome::Ignored => write!(f, "ignored"),
            PipelineOutcome::NoChanges => write!(f, "no changed files"),
            PipelineOutcome::Dispatched(outcome) => write!(f, "dispatch {outcome}"),
            PipelineOutcome::Commented => write!(f, "commented"),
        }
    }
}

/// Turns webhook events into documentation requests.
///
/// Holds no per-event state; one instance is shared by every delivery.
pub struct Pipeline {
    source: Arc<dyn SourceControl>,
    dispatcher: Dispatcher,
}

impl Pipeline {
    pub fn new(source: Arc<dyn SourceControl>, dispatcher: Dispatcher) -> Self {
        Self { source, dispatcher }
    }

    /// Process one event end to end.
    pub async fn handle(&self, event: &WebhookEvent) -> Result<PipelineOutcome, PipelineError> {
        match event {
            WebhookEvent::Push(push) => self.handle_push(push).await,
            WebhookEvent::PullRequest(pr) => self.handle_pull_request(pr).await,
            WebhookEvent::Issues(issue) => self.handle_issue(issue).await,
        }
    }

    /// Collect and fetch the changes of an event without dispatching them.
    /// `None` means the event carries nothing to document.
    pub async fn prepare(
        &self,
        event: &WebhookEvent,
    ) -> Result<Option<DocumentationRequest>, PipelineError> {
        match event {
            WebhookEvent::Push(push) => Ok(self.prepare_push(push).await),
            WebhookEvent::PullRequest(pr) if pr.is_handled() => self.prepare_pull_request(pr).await,
            WebhookEvent::PullRequest(_) | WebhookEvent::Issues(_) => Ok(None),
        }
    }

    async fn handle_push(&self, event: &PushEvent) -> Result<PipelineOutcome, PipelineError> {
        match self.prepare_push(event).await {
            Some(request) => self.dispatch_and_notify(request).await,
            None => Ok(PipelineOutcome::NoChanges),
        }
    }

    async fn handle_pull_request(
        &self,
        event: &PullRequestEvent,
    ) -> Result<PipelineOutcome, PipelineError> {
        if !event.is_handled() {
            debug!(action = %event.action, "ignoring pull request action");
            return Ok(PipelineOutcome::Ignored);
        }
        match self.prepare_pull_request(event).await? {
            Some(request) => self.dispatch_and_notify(request).await,
            None => Ok(PipelineOutcome::NoChanges),
        }
    }

    #[instrument(skip_all, fields(owner = %event.repository.owner.login, repo = %event.repository.name, issue = event.issue.number))]
    async fn handle_issue(&self, event: &IssuesEvent) -> Result<PipelineOutcome, PipelineError> {
        if event.action != "opened" {
            return Ok(PipelineOutcome::Ignored);
        }
        self.source
            .create_issue_comment(
                &event.repository.owner.login,
                &event.repository.name,
                event.issue.number,
                ISSUE_GREETING,
            )
            .await
            .map_err(PipelineError::Comment)?;
        Ok(PipelineOutcome::Commented)
    }

    #[instrument(skip_all, fields(owner = %event.repository.owner.login, repo = %event.repository.name, branch = %event.branch()))]
    async fn prepare_push(&self, event: &PushEvent) -> Option<DocumentationRequest> {
        let owner = event.repository.owner.login.as_str();
        let repo = event.repository.name.as_str();
        let branch = event.branch();
        info!(commits = event.commits.len(), "push detected");

        let changes = changes::collect_push_changes(&event.commits);
        if changes.is_empty() {
            warn!("no changed files in this push; merge commit or push without file changes");
            return None;
        }
        let mentions = changes.len();
        let changes = changes::collapse_by_path(changes);
        info!(mentions, files = changes.len(), "collected unique changed files");

        let files = changes::fetch_contents(self.source.as_ref(), changes, owner, repo, branch).await;
        Some(DocumentationRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: Some(branch.to_string()),
            pr_number: None,
            files,
        })
    }

    #[instrument(skip_all, fields(owner = %event.repository.owner.login, repo = %event.repository.name, pr = event.pull_request.number))]
    async fn prepare_pull_request(
        &self,
        event: &PullRequestEvent,
    ) -> Result<Option<DocumentationRequest>, PipelineError> {
        let owner = event.repository.owner.login.as_str();
        let repo = event.repository.name.as_str();
        let number = event.pull_request.number;
        let head = event.pull_request.head.git_ref.as_str();
        info!(action = %event.action, "pull request activity detected");

        let statuses = self
            .source
            .list_pull_request_files(owner, repo, number)
            .await
            .map_err(PipelineError::ListFiles)?;
        let changes = changes::collect_pr_changes(&statuses);
        if changes.is_empty() {
            warn!("pull request lists no changed files");
            return Ok(None);
        }
        info!(files = changes.len(), "collected pull request files");

        let files = changes::fetch_contents(self.source.as_ref(), changes, owner, repo, head).await;
        Ok(Some(DocumentationRequest {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: Some(head.to_string()),
            pr_number: Some(number),
            files,
        }))
    }

    /// Dispatch, then tell the pull request (if any) how it went.
    async fn dispatch_and_notify(
        &self,
        request: DocumentationRequest,
    ) -> Result<PipelineOutcome, PipelineError> {
        log_verdicts(&request.files);

        let result = self.dispatcher.dispatch(&request).await;

        if let Some(number) = request.pr_number {
            let body = match &result {
                Ok(DispatchOutcome::Accepted { .. }) => Some(STARTED_COMMENT.to_string()),
                Ok(DispatchOutcome::Failed { error }) => Some(failure_comment(error)),
                Err(err) => Some(failure_comment(&err.to_string())),
                Ok(DispatchOutcome::Skipped { .. }) => None,
            };
            if let Some(body) = body {
                self.notify(&request.owner, &request.repo, number, &body).await;
            }
        }

        match result {
            Ok(outcome) => {
                match &outcome {
                    DispatchOutcome::Accepted { .. } => {
                        info!("documentation server accepted the update, generation started")
                    }
                    DispatchOutcome::Failed { error } => error!(%error, "error updating documentation"),
                    DispatchOutcome::Skipped { .. } => {}
                }
                Ok(PipelineOutcome::Dispatched(outcome))
            }
            Err(err) => {
                error!(error = %err, "error updating documentation");
                Err(err.into())
            }
        }
    }

    /// Post a comment; a failure here is logged and otherwise ignored.
    async fn notify(&self, owner: &str, repo: &str, number: u64, body: &str) {
        if let Err(err) = self.source.create_issue_comment(owner, repo, number, body).await {
            error!(pr = number, error = %err, "failed to post notification comment");
        }
    }
}

fn log_verdicts(files: &[ChangeEntry]) {
    for file in files {
        let verdict = filter::explain(&file.path);
        debug!(path = %file.path, change_type = %file.change_type, %verdict, "file verdict");
    }
}
