//! Core working-copy operations trait and types for the branch cascade.
//!
//! This module defines the WorkingCopy trait that specifies every git operation
//! the dispatcher needs. The implementation driving the system `git` executable
//! lives in the system_git module; tests substitute an in-memory recorder.

use crate::error::Result;
use std::future::Future;
use std::path::Path;

/// Trait defining all required operations on a local clone
pub trait WorkingCopy {
    /// Root of the working tree
    fn path(&self) -> &Path;

    /// Discard every uncommitted change (`git reset --hard`)
    fn reset_hard(&self) -> impl Future<Output = Result<()>>;

    /// List local and remote-tracking branches (`git branch -a`)
    fn branches(&self) -> impl Future<Output = Result<BranchListing>>;

    /// Checkout an existing local branch
    fn checkout(&self, branch_name: &str) -> impl Future<Output = Result<()>>;

    /// Create a local branch tracking `origin/<branch_name>` and check it out
    fn checkout_tracking(&self, branch_name: &str) -> impl Future<Output = Result<()>>;

    /// Create a new local branch from HEAD and check it out
    fn checkout_new(&self, branch_name: &str) -> impl Future<Output = Result<()>>;

    /// Stage every change, including deletions
    fn add_all(&self) -> impl Future<Output = Result<()>>;

    /// Diff of the index against HEAD
    fn diff_cached(&self) -> impl Future<Output = Result<String>>;

    /// Commit the index
    fn commit(&self, message: &str) -> impl Future<Output = Result<()>>;

    /// Push a branch to origin and set it as upstream
    fn push_upstream(&self, branch_name: &str) -> impl Future<Output = Result<()>>;
}

/// Branch names as reported by `git branch -a`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchListing {
    /// Every listed name, e.g. `master` or `remotes/origin/3.x`
    pub names: Vec<String>,
}

impl BranchListing {
    /// Parse the porcelain output of `git branch -a`
    pub fn parse(output: &str) -> Self {
        let names = output
            .lines()
            .map(|line| line.trim_start_matches(['*', '+']).trim())
            .filter(|line| !line.is_empty() && !line.starts_with('('))
            .map(|line| line.split(" -> ").next().unwrap_or(line).to_string())
            .collect();

        Self { names }
    }

    /// Whether a local branch exists
    pub fn has_local(&self, branch_name: &str) -> bool {
        self.names.iter().any(|n| n == branch_name)
    }

    /// Whether `origin/<branch_name>` is known locally
    pub fn has_remote(&self, branch_name: &str) -> bool {
        let wanted = format!("remotes/origin/{}", branch_name);
        self.names.iter().any(|n| *n == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_branch_listing() {
        let output = "* master\n  3.x-dev-kit\n  remotes/origin/HEAD -> origin/master\n  remotes/origin/3.x\n  remotes/origin/master\n";
        let listing = BranchListing::parse(output);

        assert_eq!(
            listing.names,
            [
                "master",
                "3.x-dev-kit",
                "remotes/origin/HEAD",
                "remotes/origin/3.x",
                "remotes/origin/master"
            ]
        );
        assert!(listing.has_local("master"));
        assert!(!listing.has_local("3.x"));
        assert!(listing.has_remote("3.x"));
        assert!(!listing.has_remote("3.x-dev-kit"));
    }

    #[test]
    fn test_detached_head_is_ignored() {
        let listing = BranchListing::parse("* (HEAD detached at 1a2b3c)\n  master\n");
        assert_eq!(listing.names, ["master"]);
    }
}
