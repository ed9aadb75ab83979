//! File cascade across a project's release branches.
//!
//! Branches are processed from the last declared (legacy) to the first
//! declared (unstable). A branch is only touched once the branch processed
//! before it has no pending companion branch and is fully merged into it.

use super::NOTHING_CHANGED;
use crate::cli::OutputManager;
use crate::config::{Project, Registry};
use crate::error::Result;
use crate::git::WorkingCopy;
use crate::github::{HostingApi, NewPullRequest, PullRequest, PullRequestState};
use crate::manifest::ManifestRewriter;
use crate::template::TemplateRenderer;
use std::path::PathBuf;
use std::time::Duration;

/// Message of every commit pushed to a companion branch
pub const COMMIT_MESSAGE: &str = "DevKit updates";

/// Pause after each push so the hosting API catches up
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(200);

/// A release branch and the companion branch carrying its updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingBranchPair {
    /// Release branch
    pub branch: String,
    /// Companion branch, `{branch}{suffix}`
    pub companion: String,
}

impl WorkingBranchPair {
    /// Pair `branch` with its companion
    pub fn new(branch: &str, companion_suffix: &str) -> Self {
        Self {
            branch: branch.to_string(),
            companion: format!("{}{}", branch, companion_suffix),
        }
    }
}

/// Pull request handling of a changed branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestStatus {
    /// Dry run, nothing pushed
    NotRequested,
    /// An open pull request already tracks the companion branch
    Existing(PullRequest),
    /// A pull request was opened
    Created(PullRequest),
}

/// What happened to one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Previous branch still has an open companion; nothing touched
    PendingCompanion {
        /// Companion branch still on the remote
        companion: String,
    },
    /// Previous branch is not merged into this one; nothing touched
    NotMerged {
        /// Previous branch
        previous: String,
        /// Commits of the previous branch missing here
        ahead_by: u64,
    },
    /// Rendering produced no change
    Unchanged,
    /// Rendering produced a diff
    Changed {
        /// Staged diff
        diff: String,
        /// Pull request handling
        pull_request: PullRequestStatus,
    },
}

impl BranchOutcome {
    /// Whether the branch was skipped without checkout
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            BranchOutcome::PendingCompanion { .. } | BranchOutcome::NotMerged { .. }
        )
    }
}

/// Outcome of one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReport {
    /// Release branch
    pub branch: String,
    /// What happened
    pub outcome: BranchOutcome,
}

/// Outcomes of a project's cascade, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Per-branch outcomes
    pub branches: Vec<BranchReport>,
}

impl CascadeReport {
    /// Outcome of `branch`, if it was visited
    pub fn outcome(&self, branch: &str) -> Option<&BranchOutcome> {
        self.branches
            .iter()
            .find(|report| report.branch == branch)
            .map(|report| &report.outcome)
    }
}

/// Cascade settings taken from the registry and the command line
#[derive(Debug, Clone)]
pub struct CascadeOptions {
    /// Template tree mirrored into every branch
    pub template_root: PathBuf,
    /// Manifest path relative to the working copy root
    pub manifest_file: String,
    /// Companion branch suffix
    pub companion_suffix: String,
    /// Commit, push and open pull requests instead of only reporting
    pub apply: bool,
    /// Pause after each push
    pub settle_delay: Duration,
}

impl CascadeOptions {
    /// Options from the registry settings
    pub fn from_registry(registry: &Registry, apply: bool) -> Self {
        Self {
            template_root: registry.template_root(),
            manifest_file: registry.settings.manifest_file.clone(),
            companion_suffix: registry.settings.companion_suffix.clone(),
            apply,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Drives one project's working copy through its branches
pub struct BranchCascade<'a, H, W> {
    hosting: &'a H,
    working_copy: &'a W,
    renderer: &'a TemplateRenderer,
    rewriter: &'a ManifestRewriter,
    options: CascadeOptions,
    output: &'a OutputManager,
}

impl<'a, H: HostingApi, W: WorkingCopy> BranchCascade<'a, H, W> {
    /// Create a cascade over an already cloned working copy
    pub fn new(
        hosting: &'a H,
        working_copy: &'a W,
        renderer: &'a TemplateRenderer,
        rewriter: &'a ManifestRewriter,
        options: CascadeOptions,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            hosting,
            working_copy,
            renderer,
            rewriter,
            options,
            output,
        }
    }

    /// Process every branch of `project` hosted as `repository`
    pub async fn run(&self, project: &Project, repository: &str) -> Result<CascadeReport> {
        let mut report = CascadeReport::default();
        let mut previous: Option<WorkingBranchPair> = None;

        for branch in project.branches.iter().rev() {
            let current = WorkingBranchPair::new(&branch.name, &self.options.companion_suffix);

            // A pull request may have appeared since the previous branch.
            let remote_branches = self.hosting.branches(repository).await?;

            if let Some(skipped) = self
                .gate(repository, previous.as_ref(), &current, &remote_branches)
                .await?
            {
                report.branches.push(BranchReport {
                    branch: current.branch,
                    outcome: skipped,
                });
                continue;
            }

            let outcome = self.update_branch(project, repository, &current).await?;
            report.branches.push(BranchReport {
                branch: current.branch.clone(),
                outcome,
            });
            previous = Some(current);
        }

        Ok(report)
    }

    /// Decide whether `current` must wait for `previous`
    async fn gate(
        &self,
        repository: &str,
        previous: Option<&WorkingBranchPair>,
        current: &WorkingBranchPair,
        remote_branches: &[String],
    ) -> Result<Option<BranchOutcome>> {
        let Some(previous) = previous else {
            return Ok(None);
        };

        if remote_branches.contains(&previous.companion) {
            log::warn!(
                "Skipping {}: {} is still pending",
                current.branch,
                previous.companion
            );
            return Ok(Some(BranchOutcome::PendingCompanion {
                companion: previous.companion.clone(),
            }));
        }

        let comparison = self
            .hosting
            .compare(repository, &current.branch, &previous.branch)
            .await?;
        if comparison.ahead_by != 0 {
            log::warn!(
                "Skipping {}: {} is {} commits ahead",
                current.branch,
                previous.branch,
                comparison.ahead_by
            );
            return Ok(Some(BranchOutcome::NotMerged {
                previous: previous.branch.clone(),
                ahead_by: comparison.ahead_by,
            }));
        }

        Ok(None)
    }

    async fn update_branch(
        &self,
        project: &Project,
        repository: &str,
        pair: &WorkingBranchPair,
    ) -> Result<BranchOutcome> {
        self.output.section(&format!("Files for {}", pair.branch))?;

        self.checkout_pair(pair).await?;

        let root = self.working_copy.path();
        self.renderer
            .render(&self.options.template_root, root, project, &pair.branch)?;
        self.rewriter
            .rewrite(&root.join(&self.options.manifest_file), project, &pair.branch)?;

        self.working_copy.add_all().await?;
        let diff = self.working_copy.diff_cached().await?;

        if diff.trim().is_empty() {
            self.output.comment(NOTHING_CHANGED)?;
            return Ok(BranchOutcome::Unchanged);
        }

        self.output.println(&diff)?;
        let pull_request = if self.options.apply {
            self.publish(repository, pair).await?
        } else {
            PullRequestStatus::NotRequested
        };

        Ok(BranchOutcome::Changed { diff, pull_request })
    }

    /// Start from a clean release branch, then move to its companion
    async fn checkout_pair(&self, pair: &WorkingBranchPair) -> Result<()> {
        let wc = self.working_copy;
        wc.reset_hard().await?;

        let listing = wc.branches().await?;
        if listing.has_local(&pair.branch) {
            wc.checkout(&pair.branch).await?;
        } else {
            wc.checkout_tracking(&pair.branch).await?;
        }

        if listing.has_local(&pair.companion) {
            wc.checkout(&pair.companion).await
        } else if listing.has_remote(&pair.companion) {
            wc.checkout_tracking(&pair.companion).await
        } else {
            wc.checkout_new(&pair.companion).await
        }
    }

    /// Commit, push and make sure one pull request tracks the companion
    async fn publish(&self, repository: &str, pair: &WorkingBranchPair) -> Result<PullRequestStatus> {
        self.working_copy.commit(COMMIT_MESSAGE).await?;
        self.working_copy.push_upstream(&pair.companion).await?;

        let open = self
            .hosting
            .pull_requests(repository, &pair.companion, PullRequestState::Open)
            .await?;

        let status = match open.into_iter().next() {
            Some(existing) => {
                log::info!("Pull request #{} already open for {}", existing.number, pair.companion);
                PullRequestStatus::Existing(existing)
            }
            None => {
                let created = self
                    .hosting
                    .create_pull_request(
                        repository,
                        &NewPullRequest {
                            title: format!("{} for {} branch", COMMIT_MESSAGE, pair.branch),
                            head: pair.companion.clone(),
                            base: pair.branch.clone(),
                            body: String::new(),
                        },
                    )
                    .await?;
                self.output
                    .success(&format!("Pull request created: {}", created.html_url))?;
                PullRequestStatus::Created(created)
            }
        };

        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
        Ok(status)
    }
}
