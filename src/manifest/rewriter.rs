//! Rewrites the dependency constraints of a branch's manifest.

use super::evaluate_version_constraint;
use crate::config::{DependencyGroup, Project};
use crate::error::{ConfigError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Section holding production dependencies
const REQUIRE: &str = "require";
/// Section holding development dependencies
const REQUIRE_DEV: &str = "require-dev";
/// Dependency carrying the runtime constraint
const RUNTIME: &str = "php";
/// Global stability directives removed from every manifest
const STABILITY_DIRECTIVES: [&str; 2] = ["minimum-stability", "prefer-stable"];

/// What a rewrite changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Runtime constraint written
    pub runtime_constraint: String,
    /// Dependencies whose constraint was replaced
    pub pinned_dependencies: Vec<String>,
    /// Stability directives removed
    pub removed_directives: Vec<String>,
}

/// Applies a branch's version policy to its manifest
#[derive(Debug, Clone)]
pub struct ManifestRewriter {
    dependency_groups: BTreeMap<String, DependencyGroup>,
}

impl ManifestRewriter {
    /// Create a rewriter aware of the configured dependency groups
    pub fn new(dependency_groups: BTreeMap<String, DependencyGroup>) -> Self {
        Self { dependency_groups }
    }

    /// Rewrite `manifest_path` for `branch_name` of `project`
    pub fn rewrite(
        &self,
        manifest_path: &Path,
        project: &Project,
        branch_name: &str,
    ) -> Result<RewriteSummary> {
        let branch = project
            .branch(branch_name)
            .ok_or_else(|| ConfigError::UnknownBranch {
                project: project.name.clone(),
                branch: branch_name.to_string(),
            })?;

        if !manifest_path.exists() {
            return Err(ConfigError::ManifestMissing {
                path: manifest_path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(manifest_path)?;
        let mut manifest: Map<String, Value> =
            serde_json::from_str(&content).map_err(|e| malformed(manifest_path, e.to_string()))?;

        let mut summary = RewriteSummary {
            runtime_constraint: evaluate_version_constraint(&branch.php),
            ..Default::default()
        };

        let require = section_mut(&mut manifest, REQUIRE)
            .ok_or_else(|| malformed(manifest_path, format!("no {} section found", REQUIRE)))?;
        require.insert(
            RUNTIME.to_string(),
            Value::String(summary.runtime_constraint.clone()),
        );

        for (group, versions) in &branch.versions {
            let Some(namespace) = self.dependency_groups.get(group).map(|g| &g.namespace) else {
                continue;
            };
            if versions.is_empty() {
                continue;
            }

            let constraint = evaluate_version_constraint(versions);
            for section in [REQUIRE, REQUIRE_DEV] {
                let Some(dependencies) = section_mut(&mut manifest, section) else {
                    continue;
                };
                for (name, value) in dependencies.iter_mut() {
                    if name.starts_with(namespace.as_str()) {
                        *value = Value::String(constraint.clone());
                        summary.pinned_dependencies.push(name.clone());
                    }
                }
            }
        }

        for directive in STABILITY_DIRECTIVES {
            if manifest.shift_remove(directive).is_some() {
                summary.removed_directives.push(directive.to_string());
            }
        }

        std::fs::write(manifest_path, to_pretty_json(&manifest)?)?;

        log::debug!(
            "Rewrote {}: php {}, {} pinned",
            manifest_path.display(),
            summary.runtime_constraint,
            summary.pinned_dependencies.len()
        );
        Ok(summary)
    }
}

fn section_mut<'a>(manifest: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    manifest.get_mut(key).and_then(Value::as_object_mut)
}

fn malformed(path: &Path, reason: String) -> crate::error::DevKitError {
    ConfigError::ManifestMalformed {
        path: PathBuf::from(path),
        reason,
    }
    .into()
}

/// Four-space indented JSON with a trailing newline
fn to_pretty_json(value: &impl Serialize) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
