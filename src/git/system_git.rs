//! WorkingCopy implementation driving the system `git` executable.
//!
//! Every operation is one subprocess call. Credentials embedded in clone URLs
//! are redacted before anything is logged or surfaced in an error.

use crate::error::{GitError, Result};
use crate::git::{BranchListing, WorkingCopy};
use reqwest::Url;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Git backend using the system git executable
#[derive(Debug, Clone)]
pub struct SystemGit {
    /// Resolved git executable
    executable: PathBuf,
    /// Working tree root
    work_tree: PathBuf,
}

impl SystemGit {
    /// Clone `url` into `destination`, replacing whatever is already there
    pub async fn clone_fresh(url: &str, destination: &Path) -> Result<Self> {
        let executable = locate_git()?;

        if destination.exists() {
            log::debug!("Removing previous clone at {}", destination.display());
            tokio::fs::remove_dir_all(destination).await?;
        }
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        log::debug!("git clone {} {}", redact(url), destination.display());
        let output = Command::new(&executable)
            .arg("clone")
            .arg(url)
            .arg(destination)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await?;

        if !output.status.success() {
            return Err(GitError::CloneFailed {
                repository: redact(url),
                reason: redact(String::from_utf8_lossy(&output.stderr).trim()),
            }
            .into());
        }

        Ok(Self {
            executable,
            work_tree: destination.to_path_buf(),
        })
    }

    /// Set the committer identity for this clone
    pub async fn configure_identity(&self, name: &str, email: &str) -> Result<()> {
        self.run(&["config", "user.name", name]).await?;
        self.run(&["config", "user.email", email]).await?;
        Ok(())
    }

    /// Run a git subcommand in the working tree, returning stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = args.join(" ");
        log::debug!("git {} (in {})", redact(&rendered), self.work_tree.display());

        let output = Command::new(&self.executable)
            .arg("-C")
            .arg(&self.work_tree)
            .args(["-c", "advice.detachedHead=false", "-c", "core.quotePath=false"])
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: redact(&rendered),
                stderr: redact(String::from_utf8_lossy(&output.stderr).trim()),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WorkingCopy for SystemGit {
    fn path(&self) -> &Path {
        &self.work_tree
    }

    async fn reset_hard(&self) -> Result<()> {
        self.run(&["reset", "--hard"]).await.map(drop)
    }

    async fn branches(&self) -> Result<BranchListing> {
        let output = self.run(&["branch", "-a", "--no-color"]).await?;
        Ok(BranchListing::parse(&output))
    }

    async fn checkout(&self, branch_name: &str) -> Result<()> {
        self.run(&["checkout", branch_name]).await.map(drop)
    }

    async fn checkout_tracking(&self, branch_name: &str) -> Result<()> {
        let upstream = format!("origin/{}", branch_name);
        self.run(&["checkout", "-b", branch_name, "--track", &upstream])
            .await
            .map(drop)
    }

    async fn checkout_new(&self, branch_name: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch_name]).await.map(drop)
    }

    async fn add_all(&self) -> Result<()> {
        self.run(&["add", ".", "--all"]).await.map(drop)
    }

    async fn diff_cached(&self) -> Result<String> {
        self.run(&["diff", "--color", "--cached"]).await
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await.map(drop)
    }

    async fn push_upstream(&self, branch_name: &str) -> Result<()> {
        self.run(&["push", "-u", "origin", branch_name]).await.map(drop)
    }
}

fn locate_git() -> Result<PathBuf> {
    which::which("git").map_err(|_| GitError::ExecutableNotFound.into())
}

/// Replace the credentials of every URL found in `text` with `***`
pub(crate) fn redact(text: impl AsRef<str>) -> String {
    text.as_ref()
        .split_inclusive(char::is_whitespace)
        .map(|piece| {
            let word = piece.trim_end();
            format!("{}{}", redact_word(word), &piece[word.len()..])
        })
        .collect()
}

fn redact_word(word: &str) -> String {
    // git quotes URLs in its messages, e.g. `'https://host/repo/':`
    let candidate = word.trim_matches(|c| matches!(c, '\'' | '"' | ':'));
    let Ok(mut url) = Url::parse(candidate) else {
        return word.to_string();
    };
    if url.username().is_empty() && url.password().is_none() {
        return word.to_string();
    }
    if url.set_password(None).is_err() || url.set_username("***").is_err() {
        return word.to_string();
    }
    word.replacen(candidate, url.as_str(), 1)
}
