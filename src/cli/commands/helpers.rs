//! Shared helper functions for command execution.

use crate::cli::OutputManager;
use crate::config::Registry;
use crate::error::{ConfigError, DevKitError, Result};

/// Outcome of resolving the requested projects
pub(super) enum Selection {
    /// Names of the projects to process, in order
    Projects(Vec<String>),
    /// Some names are missing from the registry; already reported
    Unconfigured,
}

/// Resolve requested project names, reporting unknown ones
pub(super) fn select_projects(
    registry: &Registry,
    requested: &[String],
    output: &OutputManager,
) -> Result<Selection> {
    match registry.select(requested) {
        Ok(projects) => Ok(Selection::Projects(
            projects.into_iter().map(|p| p.name.clone()).collect(),
        )),
        Err(DevKitError::Config(error @ ConfigError::UnconfiguredProjects { .. })) => {
            output.error(&error.to_string());
            Ok(Selection::Unconfigured)
        }
        Err(e) => Err(e),
    }
}

/// Report a recoverable error and carry on, propagate anything else
pub(super) fn absorb_recoverable<T>(result: Result<T>, output: &OutputManager) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_recoverable() => {
            log::debug!("Recoverable failure: {:?}", e);
            output.error(&format!("Failed with message: {}", e));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
