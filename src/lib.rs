//! # devkit_dispatch
//!
//! Keeps configuration, documentation and dependency-manifest files of many
//! repositories of one organization in sync with a shared template set, across
//! every maintained release branch, and checks that every stable release line
//! has its maintenance branch.
//!
//! ## Features
//!
//! - **Branch cascade**: templates are rendered into a companion branch of
//!   each release branch, oldest first, and proposed through pull requests
//! - **Manifest rewriting**: runtime and dependency-group constraints follow
//!   the registry
//! - **Repository sync**: settings, labels and branch protection
//! - **Release audit**: expected `{major}.x` branches against the real ones
//!
//! ## Usage
//!
//! ```bash
//! devkit_dispatch dispatch                          # dry run, every project
//! devkit_dispatch dispatch admin-bundle --apply --with-files
//! devkit_dispatch release-check
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod github;
pub mod manifest;
pub mod packagist;
pub mod release;
pub mod template;

// Re-export main types for public API
pub use cli::Args;
pub use config::{BranchRoles, BranchSpec, Project, Registry};
pub use context::RunContext;
pub use dispatch::{BranchCascade, BranchOutcome, CascadeOptions, CascadeReport};
pub use error::{DevKitError, Result};
pub use git::{SystemGit, WorkingCopy};
pub use github::{GitHubClient, HostingApi};
pub use manifest::{ManifestRewriter, evaluate_version_constraint};
pub use packagist::{PackageInfo, PackageRegistry, PackagistClient};
pub use release::{ComplianceReport, ReleaseCheck, ReleaseChecker};
pub use template::{TemplateContext, TemplateRenderer};
