use serde::Deserialize;

/// Repository block shared by every webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Account,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// One commit of a push delivery, with the paths it touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

/// Payload of a `push` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    /// Full ref, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub repository: Repository,
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
}

impl PushEvent {
    /// Branch name with the `refs/heads/` prefix stripped.
    pub fn branch(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.git_ref)
    }
}

/// Payload of a `pull_request` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequestInfo,
    pub repository: Repository,
}

impl PullRequestEvent {
    /// Only these actions change the set of files worth documenting.
    pub const HANDLED_ACTIONS: &'static [&'static str] = &["opened", "synchronize", "reopened"];

    pub fn is_handled(&self) -> bool {
        Self::HANDLED_ACTIONS.contains(&self.action.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub head: HeadRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

/// Payload of an `issues` delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: IssueInfo,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueInfo {
    pub number: u64,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrFileStatus {
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
}

/// A webhook delivery this service knows how to handle.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    Push(PushEvent),
    PullRequest(PullRequestEvent),
    Issues(IssuesEvent),
}

impl WebhookEvent {
    /// Parse a delivery body given its `X-GitHub-Event` name.
    /// Returns `Ok(None)` for event types this service doesn't handle.
    pub fn parse(event_name: &str, body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let event = match event_name {
            "push" => WebhookEvent::Push(serde_json::from_slice(body)?),
            "pull_request" => WebhookEvent::PullRequest(serde_json::from_slice(body)?),
            "issues" => WebhookEvent::Issues(serde_json::from_slice(body)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    pub fn name(&self) -> &'static str {
        match self {
            WebhookEvent::Push(_) => "push",
            WebhookEvent::PullRequest(_) => "pull_request",
            WebhookEvent::Issues(_) => "issues",
        }
    }

    pub fn repository(&self) -> &Repository {
        match self {
            WebhookEvent::Push(e) => &e.repository,
            WebhookEvent::PullRequest(e) => &e.repository,
            WebhookEvent::Issues(e) => &e.repository,
        }
    }
}
