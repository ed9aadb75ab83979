//! GitHub integration: the hosting API surface the dispatcher and release checker consume.

mod client;
mod models;

pub use client::{GitHubClient, HostingApi};
pub use models::{
    Comparison, Label, NewPullRequest, PullRequest, PullRequestRef, PullRequestState,
    ReleasePayload, RepositoryInfo,
};
