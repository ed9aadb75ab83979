//! Registry loading and project selection.

use super::{BranchSpec, DependencyGroup, GlobalSettings, LabelSpec, Project};
use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The validated project registry
#[derive(Debug, Clone)]
pub struct Registry {
    /// Directory relative template paths resolve against
    base_dir: PathBuf,
    /// Organization-wide settings
    pub settings: GlobalSettings,
    /// Dependency groups pinned per branch
    pub dependency_groups: BTreeMap<String, DependencyGroup>,
    /// Labels every repository should carry
    pub labels: BTreeMap<String, LabelSpec>,
    /// Projects in declaration order
    pub projects: Vec<Project>,
}

#[derive(Deserialize)]
struct RawRegistry {
    #[serde(default)]
    devkit: GlobalSettings,
    #[serde(default = "default_dependency_groups")]
    dependency_groups: BTreeMap<String, DependencyGroup>,
    #[serde(default)]
    labels: BTreeMap<String, LabelSpec>,
    #[serde(default)]
    projects: toml::Table,
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    excluded_files: Vec<String>,
    #[serde(default = "default_true")]
    docs_target: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    branches: toml::Table,
}

fn default_true() -> bool {
    true
}

fn default_dependency_groups() -> BTreeMap<String, DependencyGroup> {
    BTreeMap::from([(
        "symfony".to_string(),
        DependencyGroup {
            namespace: "symfony/".to_string(),
        },
    )])
}

impl Registry {
    /// Load the registry from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RegistryUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_toml_str(&content, base_dir)
    }

    /// Parse registry content, resolving relative paths against `base_dir`
    pub fn from_toml_str(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let raw: RawRegistry = toml::from_str(content)?;

        if raw.projects.is_empty() {
            return Err(ConfigError::InvalidRegistry {
                reason: "at least one project must be declared under [projects]".to_string(),
            }
            .into());
        }

        let mut projects = Vec::with_capacity(raw.projects.len());
        for (name, value) in raw.projects {
            let raw_project: RawProject = value.try_into().map_err(|e: toml::de::Error| {
                ConfigError::InvalidRegistry {
                    reason: format!("project '{}': {}", name, e),
                }
            })?;

            let mut branches = Vec::with_capacity(raw_project.branches.len());
            for (branch_name, branch_value) in raw_project.branches {
                let mut spec: BranchSpec =
                    branch_value.try_into().map_err(|e: toml::de::Error| {
                        ConfigError::InvalidRegistry {
                            reason: format!(
                                "project '{}', branch '{}': {}",
                                name,
                                branch_name,
                                e
                            ),
                        }
                    })?;
                spec.name = branch_name;
                branches.push(spec);
            }

            projects.push(Project {
                name,
                excluded_files: raw_project.excluded_files,
                docs_target: raw_project.docs_target,
                description: raw_project.description,
                branches,
            });
        }

        Ok(Self {
            base_dir: base_dir.into(),
            settings: raw.devkit,
            dependency_groups: raw.dependency_groups,
            labels: raw.labels,
            projects,
        })
    }

    /// Find a project by name
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Resolve the requested project names.
    ///
    /// An empty request selects every project in declaration order. Any
    /// requested name missing from the registry fails the whole selection.
    pub fn select(&self, requested: &[String]) -> Result<Vec<&Project>> {
        if requested.is_empty() {
            return Ok(self.projects.iter().collect());
        }

        let missing: Vec<String> = requested
            .iter()
            .filter(|name| self.project(name).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::UnconfiguredProjects { projects: missing }.into());
        }

        Ok(requested.iter().filter_map(|name| self.project(name)).collect())
    }

    /// Absolute location of the template tree
    pub fn template_root(&self) -> PathBuf {
        self.base_dir.join(&self.settings.template_root)
    }

    /// Absolute location of the partials directory, if configured
    pub fn partials_dir(&self) -> Option<PathBuf> {
        self.settings
            .partials_dir
            .as_ref()
            .map(|dir| self.base_dir.join(dir))
    }

    /// Global variables exposed to structured templates
    pub fn global_variables(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let mut variables = match serde_json::to_value(&self.settings)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        variables.insert("labels".to_string(), serde_json::to_value(&self.labels)?);
        variables.insert(
            "dependency_groups".to_string(),
            serde_json::to_value(&self.dependency_groups)?,
        );
        Ok(variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"
[devkit]
default_branch = "master"
partials_dir = "templates"

[labels.bug]
color = "d73a4a"

[projects.zeta]
description = "Declared first"

[projects.zeta.branches.master]
php = ["7.2"]

[projects.zeta.branches."4.x"]
php = ["7.1", "7.2"]
versions = { symfony = ["3.4", "4.1"] }
docs_path = "docs"

[projects.zeta.branches."3.x"]
php = ["5.6", "7.0"]

[projects.alpha]
excluded_files = [".github/CODEOWNERS"]
docs_target = false
"#;

    #[test]
    fn test_declaration_order_is_preserved() {
        let registry = Registry::from_toml_str(REGISTRY, "/etc/devkit").unwrap();

        let names: Vec<_> = registry.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);

        let zeta = registry.project("zeta").unwrap();
        assert_eq!(zeta.branch_names(), ["master", "4.x", "3.x"]);
    }

    #[test]
    fn test_defaults_are_applied() {
        let registry = Registry::from_toml_str(REGISTRY, "/etc/devkit").unwrap();

        let alpha = registry.project("alpha").unwrap();
        assert!(!alpha.docs_target);
        assert!(alpha.branches.is_empty());

        let zeta = registry.project("zeta").unwrap();
        assert!(zeta.docs_target);
        let master = zeta.branch("master").unwrap();
        assert_eq!(master.docs_path, "Resources/doc");
        assert_eq!(master.target_branch, "master");
        assert_eq!(master.deprecation_warnings, 24);
        assert_eq!(zeta.branch("4.x").unwrap().docs_path, "docs");

        assert_eq!(registry.dependency_groups["symfony"].namespace, "symfony/");
        assert_eq!(registry.settings.companion_suffix, "-dev-kit");
    }

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let registry = Registry::from_toml_str(REGISTRY, "/etc/devkit").unwrap();
        assert_eq!(registry.template_root(), PathBuf::from("/etc/devkit/project"));
        assert_eq!(
            registry.partials_dir(),
            Some(PathBuf::from("/etc/devkit/templates"))
        );
    }

    #[test]
    fn test_select_rejects_unconfigured_projects() {
        let registry = Registry::from_toml_str(REGISTRY, ".").unwrap();

        let err = registry
            .select(&["zeta".to_string(), "ghost".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("not configured: ghost"));

        let all = registry.select(&[]).unwrap();
        assert_eq!(all.len(), 2);

        let one = registry.select(&["alpha".to_string()]).unwrap();
        assert_eq!(one[0].name, "alpha");
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let err = Registry::from_toml_str("[devkit]\n", ".").unwrap_err();
        assert!(err.to_string().contains("at least one project"));
    }
}
