//! In-memory stand-ins for the hosting API and a clone.

#![allow(dead_code)]

use devkit_dispatch::error::Result;
use devkit_dispatch::git::{BranchListing, WorkingCopy};
use devkit_dispatch::github::{
    Comparison, HostingApi, Label, NewPullRequest, PullRequest, PullRequestRef, PullRequestState,
    ReleasePayload, RepositoryInfo,
};
use devkit_dispatch::packagist::PackageInfo;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Branch names on the remote, shared between the fake API and the fake clone
pub type RemoteBranches = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
pub struct FakeHosting {
    pub remote: RemoteBranches,
    /// `(base, head)` → commits of head missing from base
    pub ahead_by: HashMap<(String, String), u64>,
    pub open_pulls: RefCell<Vec<PullRequest>>,
    pub created_pulls: RefCell<Vec<NewPullRequest>>,
    pub releases: Vec<ReleasePayload>,
    pub repository: RefCell<RepositoryInfo>,
    pub labels: RefCell<Vec<Label>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeHosting {
    pub fn with_branches(branches: &[&str]) -> Self {
        Self {
            remote: Rc::new(RefCell::new(branches.iter().map(|b| b.to_string()).collect())),
            ..Default::default()
        }
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn pull_request(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/acme/demo/pull/{}", number),
        title: format!("DevKit updates for {} branch", base),
        head: PullRequestRef {
            ref_name: head.to_string(),
        },
        base: PullRequestRef {
            ref_name: base.to_string(),
        },
    }
}

pub fn release(id: u64, repository: &str, name: &str, prerelease: bool) -> ReleasePayload {
    ReleasePayload {
        id,
        url: format!("https://api.github.com/repos/acme/{}/releases/{}", repository, id),
        tag_name: name.to_string(),
        name: Some(name.to_string()),
        prerelease,
        draft: false,
        published_at: None,
    }
}

impl HostingApi for FakeHosting {
    fn owner(&self) -> &str {
        "acme"
    }

    async fn repository(&self, repo: &str) -> Result<RepositoryInfo> {
        self.record(format!("repository {}", repo));
        Ok(self.repository.borrow().clone())
    }

    async fn update_repository(&self, repo: &str, changes: &RepositoryInfo) -> Result<()> {
        let keys: Vec<&str> = changes.keys().map(String::as_str).collect();
        self.record(format!("update_repository {} {}", repo, keys.join(",")));
        self.repository.borrow_mut().extend(changes.clone());
        Ok(())
    }

    async fn branches(&self, repo: &str) -> Result<Vec<String>> {
        self.record(format!("branches {}", repo));
        Ok(self.remote.borrow().clone())
    }

    async fn compare(&self, repo: &str, base: &str, head: &str) -> Result<Comparison> {
        self.record(format!("compare {} {}...{}", repo, base, head));
        let ahead_by = self
            .ahead_by
            .get(&(base.to_string(), head.to_string()))
            .copied()
            .unwrap_or(0);
        Ok(Comparison {
            ahead_by,
            ..Default::default()
        })
    }

    async fn labels(&self, _repo: &str) -> Result<Vec<Label>> {
        Ok(self.labels.borrow().clone())
    }

    async fn create_label(&self, _repo: &str, label: &Label) -> Result<()> {
        self.record(format!("create_label {}", label.name));
        self.labels.borrow_mut().push(label.clone());
        Ok(())
    }

    async fn update_label(&self, _repo: &str, name: &str, label: &Label) -> Result<()> {
        self.record(format!("update_label {} {}", name, label.color));
        Ok(())
    }

    async fn delete_label(&self, _repo: &str, name: &str) -> Result<()> {
        self.record(format!("delete_label {}", name));
        self.labels.borrow_mut().retain(|l| l.name != name);
        Ok(())
    }

    async fn protect_branch(
        &self,
        _repo: &str,
        branch: &str,
        _policy: &serde_json::Value,
    ) -> Result<()> {
        self.record(format!("protect_branch {}", branch));
        Ok(())
    }

    async fn pull_requests(
        &self,
        _repo: &str,
        head_branch: &str,
        _state: PullRequestState,
    ) -> Result<Vec<PullRequest>> {
        self.record(format!("pull_requests {}", head_branch));
        Ok(self
            .open_pulls
            .borrow()
            .iter()
            .filter(|pr| pr.head.ref_name == head_branch)
            .cloned()
            .collect())
    }

    async fn create_pull_request(
        &self,
        _repo: &str,
        pull_request: &NewPullRequest,
    ) -> Result<PullRequest> {
        self.record(format!("create_pull_request {}", pull_request.head));
        self.created_pulls.borrow_mut().push(pull_request.clone());
        let number = self.created_pulls.borrow().len() as u64;
        let created = self::pull_request(number, &pull_request.head, &pull_request.base);
        self.open_pulls.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn releases(&self, _repo: &str) -> Result<Vec<ReleasePayload>> {
        Ok(self.releases.clone())
    }
}

/// Records git commands against a scratch directory
pub struct FakeWorkingCopy {
    path: PathBuf,
    remote: RemoteBranches,
    local: RefCell<Vec<String>>,
    /// Diff reported for every branch, empty means unchanged
    pub diff: String,
    pub calls: RefCell<Vec<String>>,
}

impl FakeWorkingCopy {
    pub fn new(path: &Path, remote: RemoteBranches, diff: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            remote,
            local: RefCell::new(vec!["master".to_string()]),
            diff: diff.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl WorkingCopy for FakeWorkingCopy {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn reset_hard(&self) -> Result<()> {
        self.record("reset --hard".to_string());
        Ok(())
    }

    async fn branches(&self) -> Result<BranchListing> {
        let mut names = self.local.borrow().clone();
        names.extend(self.remote.borrow().iter().map(|b| format!("remotes/origin/{}", b)));
        Ok(BranchListing { names })
    }

    async fn checkout(&self, branch_name: &str) -> Result<()> {
        self.record(format!("checkout {}", branch_name));
        Ok(())
    }

    async fn checkout_tracking(&self, branch_name: &str) -> Result<()> {
        self.record(format!("checkout --track {}", branch_name));
        self.local.borrow_mut().push(branch_name.to_string());
        Ok(())
    }

    async fn checkout_new(&self, branch_name: &str) -> Result<()> {
        self.record(format!("checkout -b {}", branch_name));
        self.local.borrow_mut().push(branch_name.to_string());
        Ok(())
    }

    async fn add_all(&self) -> Result<()> {
        self.record("add".to_string());
        Ok(())
    }

    async fn diff_cached(&self) -> Result<String> {
        Ok(self.diff.clone())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        Ok(())
    }

    async fn push_upstream(&self, branch_name: &str) -> Result<()> {
        self.record(format!("push {}", branch_name));
        self.remote.borrow_mut().push(branch_name.to_string());
        Ok(())
    }
}

pub fn demo_package() -> PackageInfo {
    PackageInfo {
        name: "acme/demo-bundle".to_string(),
        description: "Demo bundle".to_string(),
        repository: "https://github.com/acme/DemoBundle.git".to_string(),
    }
}
