//! Organization-wide settings shared by every project.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings found under the `[devkit]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Primary integration branch every repository must carry
    pub default_branch: String,
    /// Homepage pushed to repository metadata
    pub homepage: String,
    /// Root of the template tree mirrored into every branch
    pub template_root: PathBuf,
    /// Directory of handlebars partials available to every template
    pub partials_dir: Option<PathBuf>,
    /// Suffix appended to a release branch to name its companion branch
    pub companion_suffix: String,
    /// Manifest file rewritten on every branch, relative to the repository root
    pub manifest_file: String,
    /// Status check contexts required by branch protection
    pub required_status_checks: Vec<String>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            default_branch: "master".to_string(),
            homepage: String::new(),
            template_root: PathBuf::from("project"),
            partials_dir: None,
            companion_suffix: "-dev-kit".to_string(),
            manifest_file: "composer.json".to_string(),
            required_status_checks: vec![
                "continuous-integration/travis-ci".to_string(),
                "continuous-integration/styleci/pr".to_string(),
            ],
        }
    }
}

/// A dependency group whose versions are pinned per branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    /// Package name prefix identifying the group's members, e.g. `symfony/`
    pub namespace: String,
}

/// A label every repository should carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Hex color without the leading `#`
    pub color: String,
}
