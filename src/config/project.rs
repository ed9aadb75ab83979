//! Per-project and per-branch configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A configured repository and its maintained branches, in declaration order
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Project name (package name without vendor)
    pub name: String,
    /// Template paths never written into this repository
    pub excluded_files: Vec<String>,
    /// Whether the project publishes documentation
    pub docs_target: bool,
    /// Free-form description
    pub description: String,
    /// Branches, first declared = unstable
    #[serde(skip)]
    pub branches: Vec<BranchSpec>,
}

impl Project {
    /// Look up a branch by name
    pub fn branch(&self, name: &str) -> Option<&BranchSpec> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// Branch names in declaration order
    pub fn branch_names(&self) -> Vec<&str> {
        self.branches.iter().map(|b| b.name.as_str()).collect()
    }

    /// Unstable/stable/legacy roles derived from declaration order
    pub fn roles(&self) -> Option<BranchRoles> {
        BranchRoles::from_declared(&self.branch_names())
    }
}

/// Configuration of one maintained branch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchSpec {
    /// Branch name, taken from the table key
    #[serde(skip)]
    pub name: String,
    /// Runtime (PHP) versions supported on this branch
    pub php: Vec<String>,
    /// Services the CI needs
    pub services: Vec<String>,
    /// Runtime version used for coverage/lint jobs
    pub target_php: Option<String>,
    /// Dependency group → versions supported
    pub versions: BTreeMap<String, Vec<String>>,
    /// Dependency group → versions allowed to fail in CI
    pub failing_allowed_versions: BTreeMap<String, Vec<String>>,
    /// Branch that pull requests for this branch merge into
    pub target_branch: String,
    /// Path of the documentation inside the repository
    pub docs_path: String,
    /// Extra documentation snippet
    pub docs_extra: String,
    /// Number of deprecation warnings tolerated
    pub deprecation_warnings: u32,
    /// Minimum dependency stability
    pub minimum_stability: String,
    /// Run tests without a memory limit
    pub unlimited_memory: bool,
    /// Maintenance task names exposed through the Makefile
    pub make_tasks: Vec<String>,
}

impl Default for BranchSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            php: Vec::new(),
            services: Vec::new(),
            target_php: None,
            versions: BTreeMap::new(),
            failing_allowed_versions: BTreeMap::new(),
            target_branch: "master".to_string(),
            docs_path: "Resources/doc".to_string(),
            docs_extra: String::new(),
            deprecation_warnings: 24,
            minimum_stability: "prod".to_string(),
            unlimited_memory: false,
            make_tasks: Vec::new(),
        }
    }
}

/// Release roles of a project's branches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRoles {
    /// First declared branch
    pub unstable: String,
    /// Second declared branch, else unstable
    pub stable: String,
    /// Third declared branch, else stable
    pub legacy: String,
}

impl BranchRoles {
    /// Derive roles from branch names in declaration order.
    ///
    /// Returns `None` when no branch is declared.
    pub fn from_declared(names: &[&str]) -> Option<Self> {
        let unstable = names.first()?.to_string();
        let stable = names.get(1).map_or_else(|| unstable.clone(), |s| s.to_string());
        let legacy = names.get(2).map_or_else(|| stable.clone(), |s| s.to_string());

        Some(Self {
            unstable,
            stable,
            legacy,
        })
    }
}
