//! Comprehensive error types for devkit_dispatch operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devkit_dispatch operations
pub type Result<T> = std::result::Result<T, DevKitError>;

/// Main error type for all devkit_dispatch operations
#[derive(Error, Debug)]
pub enum DevKitError {
    /// Registry, manifest and template configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Hosting or package registry API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Directory traversal errors
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Registry, manifest and template errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Registry file could not be read
    #[error("Could not read registry at {path}: {reason}")]
    RegistryUnreadable {
        /// Path of the registry file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Registry content violates the schema
    #[error("Invalid registry: {reason}")]
    InvalidRegistry {
        /// Reason for the error
        reason: String,
    },

    /// Requested projects are missing from the registry
    #[error("Some specified projects are not configured: {}", .projects.join(", "))]
    UnconfiguredProjects {
        /// Project names that were requested but not declared
        projects: Vec<String>,
    },

    /// Branch is not declared for the project
    #[error("Branch '{branch}' is not configured for project '{project}'")]
    UnknownBranch {
        /// Project name
        project: String,
        /// Branch name
        branch: String,
    },

    /// Manifest file is missing from the working copy
    #[error("No composer.json found at: {path}")]
    ManifestMissing {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Manifest exists but cannot be rewritten
    #[error("Malformed manifest at {path}: {reason}")]
    ManifestMalformed {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Template entry and destination entry disagree on file type
    #[error("File type mismatch between \"{source_path}\" and \"{destination}\"")]
    TypeMismatch {
        /// Template entry
        source_path: PathBuf,
        /// Destination entry
        destination: PathBuf,
    },

    /// Excluded file pattern does not compile
    #[error("Invalid excluded file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Reason for the error
        reason: String,
    },

    /// Template failed to compile or render
    #[error("Template '{template}' failed: {reason}")]
    Template {
        /// Template name
        template: String,
        /// Reason for the error
        reason: String,
    },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git executable not available
    #[error("git executable not found in PATH")]
    ExecutableNotFound,

    /// A git subprocess exited unsuccessfully
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// Subcommand and arguments (credentials redacted)
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// Clone failed
    #[error("Git clone of '{repository}' failed: {reason}")]
    CloneFailed {
        /// Repository name
        repository: String,
        /// Reason for the error
        reason: String,
    },
}

/// Hosting API and package registry errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found
    #[error("{service}: not found: {resource}")]
    NotFound {
        /// Service name
        service: &'static str,
        /// Requested resource
        resource: String,
    },

    /// Credentials rejected
    #[error("{service}: authentication failed")]
    Unauthorized {
        /// Service name
        service: &'static str,
    },

    /// Rate limit exhausted
    #[error("{service}: rate limit exceeded")]
    RateLimited {
        /// Service name
        service: &'static str,
    },

    /// Any other non-success status
    #[error("{service}: {status}: {body}")]
    Status {
        /// Service name
        service: &'static str,
        /// HTTP status
        status: u16,
        /// Response body
        body: String,
    },

    /// Response payload did not match the expected shape
    #[error("{service}: unexpected payload: {reason}")]
    Decode {
        /// Service name
        service: &'static str,
        /// Reason for the error
        reason: String,
    },

    /// API client failure without an HTTP status (transport, TLS, setup)
    #[error("{service}: {reason}")]
    Client {
        /// Service name
        service: &'static str,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl DevKitError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            DevKitError::Config(ConfigError::UnconfiguredProjects { projects }) => vec![
                format!("Declare [projects.{}] in the registry", projects.join("], [projects.")),
                "Or run without project arguments to process every configured project".to_string(),
            ],
            DevKitError::Config(ConfigError::ManifestMissing { .. }) => vec![
                "Every dispatched repository needs a composer.json on each configured branch".to_string(),
            ],
            DevKitError::Config(ConfigError::TypeMismatch { destination, .. }) => vec![format!(
                "Remove or rename '{}' in the repository, or exclude it",
                destination.display()
            )],
            DevKitError::Git(GitError::ExecutableNotFound) => {
                vec!["Install git and make sure it is on PATH".to_string()]
            }
            DevKitError::Api(ApiError::Unauthorized { .. }) => vec![
                "Set GITHUB_OAUTH_TOKEN to a token with repo scope".to_string(),
                "Verify the token has not expired".to_string(),
            ],
            DevKitError::Api(ApiError::RateLimited { .. }) => vec![
                "Wait for the rate limit window to reset".to_string(),
                "Authenticate with a token to raise the limit".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors are reported per project and the run moves on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DevKitError::Api(_))
    }
}
