//! Payloads exchanged with the GitHub REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository settings as returned by `GET /repos/{owner}/{repo}`.
///
/// Kept as a raw JSON object so settings can be diffed key by key.
pub type RepositoryInfo = serde_json::Map<String, serde_json::Value>;

/// Result of `GET /repos/{owner}/{repo}/compare/{base}...{head}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Commits on head missing from base
    pub ahead_by: u64,
    /// Commits on base missing from head
    pub behind_by: u64,
    /// `ahead`, `behind`, `diverged` or `identical`
    #[serde(default)]
    pub status: String,
}

/// A repository label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
    /// Hex color without the leading `#`
    pub color: String,
}

/// Pull request state filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// Open pull requests
    Open,
    /// Closed or merged pull requests
    Closed,
    /// Both
    All,
}

/// Head or base of a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Browser URL
    #[serde(default)]
    pub html_url: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Source branch
    pub head: PullRequestRef,
    /// Target branch
    pub base: PullRequestRef,
}

/// Body of `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Title
    pub title: String,
    /// Source branch
    pub head: String,
    /// Target branch
    pub base: String,
    /// Description
    pub body: String,
}

/// Entry of `GET /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePayload {
    /// Release id
    pub id: u64,
    /// Canonical API URL
    pub url: String,
    /// Git tag
    pub tag_name: String,
    /// Display name; GitHub returns null when unset
    pub name: Option<String>,
    /// Pre-release flag
    pub prerelease: bool,
    /// Draft flag
    #[serde(default)]
    pub draft: bool,
    /// Publication timestamp
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}
