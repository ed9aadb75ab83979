//! Compares really stable releases against existing maintenance branches.

use super::{Release, Stability, compare_versions};
use crate::error::Result;
use crate::github::HostingApi;

/// Annotation of a release flagged stable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StabilityVerdict {
    /// The name confirms the flag
    Valid,
    /// The name contradicts the flag
    Invalid(String),
}

impl StabilityVerdict {
    fn of(release: &Release) -> Self {
        if release.version().is_none() {
            return StabilityVerdict::Invalid("not a version".to_string());
        }
        match release.stability() {
            Stability::Stable => StabilityVerdict::Valid,
            other => StabilityVerdict::Invalid(other.to_string()),
        }
    }
}

/// Outcome of checking one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseCheck {
    /// The repository has no release of its own
    NoReleases {
        /// Repository name
        repository: String,
    },
    /// Full comparison
    Report(ComplianceReport),
}

/// Releases, branches, and the branches missing for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    /// Repository name
    pub repository: String,
    /// Every release, greatest version first
    pub releases: Vec<Release>,
    /// Releases flagged stable with their name-based verdict
    pub stable_releases: Vec<(Release, StabilityVerdict)>,
    /// Branches on the remote
    pub branches: Vec<String>,
    /// Branches that should exist, first-seen order
    pub expected_branches: Vec<String>,
    /// Expected branches absent from the remote
    pub missing_branches: Vec<String>,
}

impl ComplianceReport {
    /// Greatest release
    pub fn latest(&self) -> Option<&Release> {
        self.releases.first()
    }

    /// Flagged stable releases whose name confirms it
    pub fn really_stable(&self) -> impl Iterator<Item = &Release> {
        self.stable_releases
            .iter()
            .filter(|(_, verdict)| *verdict == StabilityVerdict::Valid)
            .map(|(release, _)| release)
    }

    /// Remediation line printed after every project has been checked
    pub fn suggested_action(&self) -> String {
        format!(
            "You should add following branches: {} on repository.",
            self.expected_branches.join(", ")
        )
    }
}

/// Read-only release audit against the hosting service
pub struct ReleaseChecker<'a, H> {
    hosting: &'a H,
    default_branch: String,
}

impl<'a, H: HostingApi> ReleaseChecker<'a, H> {
    /// `default_branch` is always expected to exist
    pub fn new(hosting: &'a H, default_branch: impl Into<String>) -> Self {
        Self {
            hosting,
            default_branch: default_branch.into(),
        }
    }

    /// Audit `repository`
    pub async fn check(&self, repository: &str) -> Result<ReleaseCheck> {
        let mut releases: Vec<Release> = self
            .hosting
            .releases(repository)
            .await?
            .into_iter()
            .filter(|payload| payload.url.contains(repository))
            .map(Release::from)
            .collect();

        if releases.is_empty() {
            log::warn!("No releases found for {}", repository);
            return Ok(ReleaseCheck::NoReleases {
                repository: repository.to_string(),
            });
        }
        releases.sort_by(|a, b| compare_versions(&a.name, &b.name));

        let stable_releases: Vec<(Release, StabilityVerdict)> = releases
            .iter()
            .filter(|release| release.stable)
            .map(|release| (release.clone(), StabilityVerdict::of(release)))
            .collect();

        let mut expected_branches: Vec<String> = Vec::new();
        let candidates = stable_releases
            .iter()
            .filter(|(_, verdict)| *verdict == StabilityVerdict::Valid)
            .filter_map(|(release, _)| release.maintenance_branch())
            .chain(std::iter::once(self.default_branch.clone()));
        for branch in candidates {
            if !expected_branches.contains(&branch) {
                expected_branches.push(branch);
            }
        }

        let branches = self.hosting.branches(repository).await?;
        let missing_branches = expected_branches
            .iter()
            .filter(|branch| !branches.contains(branch))
            .cloned()
            .collect();

        log::info!(
            "{}: {} releases, expecting branches {}",
            repository,
            releases.len(),
            expected_branches.join(", ")
        );

        Ok(ReleaseCheck::Report(ComplianceReport {
            repository: repository.to_string(),
            releases,
            stable_releases,
            branches,
            expected_branches,
            missing_branches,
        }))
    }
}
