//! Hosting API trait and its GitHub REST implementation.

use crate::error::{ApiError, DevKitError, Result};
use crate::github::{
    Comparison, Label, NewPullRequest, PullRequest, PullRequestRef, PullRequestState,
    ReleasePayload, RepositoryInfo,
};
use octocrab::params::State;
use octocrab::{Octocrab, Page};
use std::future::Future;

const SERVICE: &str = "GitHub";
const PAGE_SIZE: u8 = 100;

/// Operations the dispatcher and the release checker need from the hosting service.
///
/// All repositories belong to one organization, fixed at construction time.
pub trait HostingApi {
    /// Organization owning every repository
    fn owner(&self) -> &str;

    /// Fetch repository settings
    fn repository(&self, repo: &str) -> impl Future<Output = Result<RepositoryInfo>>;

    /// Patch repository settings
    fn update_repository(
        &self,
        repo: &str,
        changes: &RepositoryInfo,
    ) -> impl Future<Output = Result<()>>;

    /// Names of every branch on the remote
    fn branches(&self, repo: &str) -> impl Future<Output = Result<Vec<String>>>;

    /// Compare `base...head`
    fn compare(
        &self,
        repo: &str,
        base: &str,
        head: &str,
    ) -> impl Future<Output = Result<Comparison>>;

    /// Every label of the repository
    fn labels(&self, repo: &str) -> impl Future<Output = Result<Vec<Label>>>;

    /// Create a label
    fn create_label(&self, repo: &str, label: &Label) -> impl Future<Output = Result<()>>;

    /// Rename or recolor a label
    fn update_label(
        &self,
        repo: &str,
        name: &str,
        label: &Label,
    ) -> impl Future<Output = Result<()>>;

    /// Delete a label
    fn delete_label(&self, repo: &str, name: &str) -> impl Future<Output = Result<()>>;

    /// Replace the protection policy of a branch
    fn protect_branch(
        &self,
        repo: &str,
        branch: &str,
        policy: &serde_json::Value,
    ) -> impl Future<Output = Result<()>>;

    /// Pull requests whose head is `owner:head_branch`
    fn pull_requests(
        &self,
        repo: &str,
        head_branch: &str,
        state: PullRequestState,
    ) -> impl Future<Output = Result<Vec<PullRequest>>>;

    /// Open a pull request
    fn create_pull_request(
        &self,
        repo: &str,
        pull_request: &NewPullRequest,
    ) -> impl Future<Output = Result<PullRequest>>;

    /// Every release of the repository
    fn releases(&self, repo: &str) -> impl Future<Output = Result<Vec<ReleasePayload>>>;
}

/// GitHub REST v3 client scoped to one organization
#[derive(Clone)]
pub struct GitHubClient {
    inner: Octocrab,
    owner: String,
}

impl GitHubClient {
    /// Create a client against api.github.com, authenticated when a token is given
    pub fn new(owner: impl Into<String>, token: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        let inner = builder.build().map_err(|e| ApiError::Client {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        Ok(Self {
            inner,
            owner: owner.into(),
        })
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Build `/repos/{owner}/{repo}/{segments...}`, percent-encoding each segment
fn route(owner: &str, repo: &str, segments: &[&str]) -> String {
    let mut route = format!(
        "/repos/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    );
    for segment in segments {
        route.push('/');
        route.push_str(&urlencoding::encode(segment));
    }
    log::debug!("GitHub {}", route);
    route
}

/// Map an HTTP failure reported by GitHub to an [`ApiError`]
fn classify(status: u16, message: &str, resource: &str) -> ApiError {
    match status {
        429 => ApiError::RateLimited { service: SERVICE },
        403 if message.to_lowercase().contains("rate limit") => {
            ApiError::RateLimited { service: SERVICE }
        }
        401 | 403 => ApiError::Unauthorized { service: SERVICE },
        404 => ApiError::NotFound {
            service: SERVICE,
            resource: resource.to_string(),
        },
        _ => ApiError::Status {
            service: SERVICE,
            status,
            body: message.to_string(),
        },
    }
}

fn api_error(err: octocrab::Error, resource: &str) -> DevKitError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            classify(source.status_code.as_u16(), &source.message, resource).into()
        }
        octocrab::Error::Serde { source, .. } => ApiError::Decode {
            service: SERVICE,
            reason: source.to_string(),
        }
        .into(),
        other => ApiError::Client {
            service: SERVICE,
            reason: other.to_string(),
        }
        .into(),
    }
}

fn state_param(state: PullRequestState) -> State {
    match state {
        PullRequestState::Open => State::Open,
        PullRequestState::Closed => State::Closed,
        PullRequestState::All => State::All,
    }
}

/// Request `page=1, 2, ...` until a short page is returned
async fn all_pages<T, F, Fut>(resource: &str, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = octocrab::Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch(page).await.map_err(|e| api_error(e, resource))?.items;
        let is_last_page = batch.len() < usize::from(PAGE_SIZE);
        items.extend(batch);
        if is_last_page {
            break;
        }
        page += 1;
    }

    Ok(items)
}

fn into_pull_request(pull: octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pull.number,
        html_url: pull.html_url.map(|url| url.to_string()).unwrap_or_default(),
        title: pull.title.unwrap_or_default(),
        head: PullRequestRef {
            ref_name: pull.head.ref_field,
        },
        base: PullRequestRef {
            ref_name: pull.base.ref_field,
        },
    }
}

impl HostingApi for GitHubClient {
    fn owner(&self) -> &str {
        &self.owner
    }

    async fn repository(&self, repo: &str) -> Result<RepositoryInfo> {
        self.inner
            .get(route(&self.owner, repo, &[]), None::<&()>)
            .await
            .map_err(|e| api_error(e, repo))
    }

    async fn update_repository(&self, repo: &str, changes: &RepositoryInfo) -> Result<()> {
        self.inner
            .patch::<serde_json::Value, _, _>(route(&self.owner, repo, &[]), Some(changes))
            .await
            .map(drop)
            .map_err(|e| api_error(e, repo))
    }

    async fn branches(&self, repo: &str) -> Result<Vec<String>> {
        let branches = all_pages(repo, move |page| async move {
            self.inner
                .repos(&self.owner, repo)
                .list_branches()
                .per_page(PAGE_SIZE)
                .page(page)
                .send()
                .await
        })
        .await?;
        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    async fn compare(&self, repo: &str, base: &str, head: &str) -> Result<Comparison> {
        let range = format!("{}...{}", base, head);
        self.inner
            .get(route(&self.owner, repo, &["compare", &range]), None::<&()>)
            .await
            .map_err(|e| api_error(e, &range))
    }

    async fn labels(&self, repo: &str) -> Result<Vec<Label>> {
        let labels = all_pages(repo, move |page| async move {
            self.inner
                .issues(&self.owner, repo)
                .list_labels_for_repo()
                .per_page(PAGE_SIZE)
                .page(page)
                .send()
                .await
        })
        .await?;
        Ok(labels
            .into_iter()
            .map(|l| Label {
                name: l.name,
                color: l.color,
            })
            .collect())
    }

    async fn create_label(&self, repo: &str, label: &Label) -> Result<()> {
        self.inner
            .issues(&self.owner, repo)
            .create_label(&label.name, &label.color, "")
            .await
            .map(drop)
            .map_err(|e| api_error(e, &label.name))
    }

    async fn update_label(&self, repo: &str, name: &str, label: &Label) -> Result<()> {
        let body = serde_json::json!({ "new_name": label.name, "color": label.color });
        self.inner
            .patch::<serde_json::Value, _, _>(
                route(&self.owner, repo, &["labels", name]),
                Some(&body),
            )
            .await
            .map(drop)
            .map_err(|e| api_error(e, name))
    }

    async fn delete_label(&self, repo: &str, name: &str) -> Result<()> {
        let response = self
            .inner
            ._delete(route(&self.owner, repo, &["labels", name]), None::<&()>)
            .await
            .map_err(|e| api_error(e, name))?;
        octocrab::map_github_error(response)
            .await
            .map(drop)
            .map_err(|e| api_error(e, name))
    }

    async fn protect_branch(
        &self,
        repo: &str,
        branch: &str,
        policy: &serde_json::Value,
    ) -> Result<()> {
        self.inner
            .put::<serde_json::Value, _, _>(
                route(&self.owner, repo, &["branches", branch, "protection"]),
                Some(policy),
            )
            .await
            .map(drop)
            .map_err(|e| api_error(e, branch))
    }

    async fn pull_requests(
        &self,
        repo: &str,
        head_branch: &str,
        state: PullRequestState,
    ) -> Result<Vec<PullRequest>> {
        let head = format!("{}:{}", self.owner, head_branch);
        let head = head.as_str();
        let pulls = all_pages(repo, move |page| async move {
            self.inner
                .pulls(&self.owner, repo)
                .list()
                .state(state_param(state))
                .head(head)
                .per_page(PAGE_SIZE)
                .page(page)
                .send()
                .await
        })
        .await?;
        Ok(pulls.into_iter().map(into_pull_request).collect())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        pull_request: &NewPullRequest,
    ) -> Result<PullRequest> {
        self.inner
            .pulls(&self.owner, repo)
            .create(&pull_request.title, &pull_request.head, &pull_request.base)
            .body(&pull_request.body)
            .send()
            .await
            .map(into_pull_request)
            .map_err(|e| api_error(e, repo))
    }

    async fn releases(&self, repo: &str) -> Result<Vec<ReleasePayload>> {
        let releases = all_pages(repo, move |page| async move {
            self.inner
                .repos(&self.owner, repo)
                .releases()
                .list()
                .per_page(PAGE_SIZE)
                .page(page)
                .send()
                .await
        })
        .await?;
        Ok(releases
            .into_iter()
            .map(|r| ReleasePayload {
                id: r.id.into_inner(),
                url: r.url.to_string(),
                tag_name: r.tag_name,
                name: r.name,
                prerelease: r.prerelease,
                draft: r.draft,
                published_at: r.published_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_encodes_segments() {
        assert_eq!(
            route("acme", "demo", &["labels", "pending author"]),
            "/repos/acme/demo/labels/pending%20author"
        );
        assert_eq!(
            route("acme", "demo", &["compare", "3.x...4.x"]),
            "/repos/acme/demo/compare/3.x...4.x"
        );
        assert_eq!(
            route("acme", "demo", &["branches", "feature/a", "protection"]),
            "/repos/acme/demo/branches/feature%2Fa/protection"
        );
        assert_eq!(route("acme", "demo", &[]), "/repos/acme/demo");
    }

    #[test]
    fn test_classify_status_codes() {
        assert!(matches!(
            classify(429, "slow down", "demo"),
            ApiError::RateLimited { .. }
        ));
        assert!(matches!(
            classify(403, "API rate limit exceeded for user", "demo"),
            ApiError::RateLimited { .. }
        ));
        assert!(matches!(
            classify(403, "Resource not accessible by integration", "demo"),
            ApiError::Unauthorized { .. }
        ));
        assert!(matches!(
            classify(401, "Bad credentials", "demo"),
            ApiError::Unauthorized { .. }
        ));
        match classify(404, "Not Found", "3.x...4.x") {
            ApiError::NotFound { resource, .. } => assert_eq!(resource, "3.x...4.x"),
            other => panic!("unexpected error: {other}"),
        }
        match classify(422, "Validation Failed", "demo") {
            ApiError::Status { status, body, .. } => {
                assert_eq!(status, 422);
                assert_eq!(body, "Validation Failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pull_request_state_maps_to_query_param() {
        assert!(matches!(state_param(PullRequestState::Open), State::Open));
        assert!(matches!(state_param(PullRequestState::Closed), State::Closed));
        assert!(matches!(state_param(PullRequestState::All), State::All));
    }
}
