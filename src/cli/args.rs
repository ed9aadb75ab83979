//! Command line argument parsing and validation.
//!
//! Identity and credential flags fall back to the environment variables the
//! CI jobs already export.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keeps an organization's repositories in sync with a shared template set
#[derive(Parser, Debug)]
#[command(
    name = "devkit_dispatch",
    version,
    about = "Keeps an organization's repositories in sync with a shared template set",
    long_about = "Dispatch shared configuration, documentation and manifest updates to every
release branch of every configured repository, and audit release branches.

Usage:
  devkit_dispatch dispatch                       # dry run over every project
  devkit_dispatch dispatch admin-bundle --apply --with-files
  devkit_dispatch release-check"
)]
pub struct Args {
    /// Project registry
    #[arg(long, short, global = true, env = "DEVKIT_CONFIG", default_value = "devkit.toml")]
    pub config: PathBuf,

    /// Organization owning the repositories
    #[arg(long, global = true, env = "GITHUB_GROUP")]
    pub org: Option<String>,

    /// Account pushing companion branches
    #[arg(long, global = true, env = "GITHUB_USER")]
    pub user: Option<String>,

    /// Committer email
    #[arg(long, global = true, env = "GITHUB_EMAIL")]
    pub email: Option<String>,

    /// Hosting API token
    #[arg(long, global = true, env = "GITHUB_OAUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Package registry vendor, defaults to the organization
    #[arg(long, global = true, env = "PACKAGIST_GROUP")]
    pub packagist_group: Option<String>,

    /// Homepage pushed to repository settings, overrides the registry
    #[arg(long, global = true, env = "HOMEPAGE")]
    pub homepage: Option<String>,

    /// Directory receiving the clones
    #[arg(long, global = true, env = "DEVKIT_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Show verbose output
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Dispatch repository settings, labels, protection and files
    Dispatch {
        /// Limit to these projects
        #[arg(value_name = "PROJECTS")]
        projects: Vec<String>,

        /// Perform changes instead of only reporting them
        #[arg(long)]
        apply: bool,

        /// Also cascade template files through every branch
        #[arg(long)]
        with_files: bool,
    },

    /// Check that every stable release line has a maintenance branch
    ReleaseCheck {
        /// Limit to these projects
        #[arg(value_name = "PROJECTS")]
        projects: Vec<String>,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Dispatch { .. } => "dispatch",
            Command::ReleaseCheck { .. } => "release-check",
        }
    }

    /// Requested project names
    pub fn projects(&self) -> &[String] {
        match self {
            Command::Dispatch { projects, .. } | Command::ReleaseCheck { projects } => projects,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.org.as_deref().is_some_and(|org| org.trim().is_empty()) {
            return Err("--org must not be empty".to_string());
        }
        if let Some(name) = self.command.projects().iter().find(|p| p.contains('/')) {
            return Err(format!(
                "Project '{}' must be given without its vendor prefix",
                name
            ));
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dispatch() {
        let args = Args::try_parse_from([
            "devkit_dispatch",
            "--org",
            "acme",
            "dispatch",
            "admin-bundle",
            "--apply",
            "--with-files",
        ])
        .unwrap();

        assert_eq!(args.org.as_deref(), Some("acme"));
        match args.command {
            Command::Dispatch {
                projects,
                apply,
                with_files,
            } => {
                assert_eq!(projects, ["admin-bundle"]);
                assert!(apply);
                assert!(with_files);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_is_dry_run_by_default() {
        let args = Args::try_parse_from(["devkit_dispatch", "dispatch"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Dispatch { apply: false, with_files: false, .. }
        ));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_vendor_prefixed_project_is_rejected() {
        let args = Args::try_parse_from(["devkit_dispatch", "release-check", "acme/admin"]).unwrap();
        assert!(args.validate().is_err());
    }
}
