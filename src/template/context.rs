//! Values exposed to templates for one project branch.

use crate::config::{BranchRoles, BranchSpec, Project};
use crate::error::{ConfigError, Result};
use crate::packagist::PackageInfo;
use serde::Serialize;
use serde_json::{Map, Value};

/// Derived per-branch template values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// Human readable package title
    pub package_title: String,
    /// Package description from the package registry
    pub package_description: String,
    /// Full package name, `vendor/name`
    pub packagist_name: String,
    /// Same as `packagist_name`
    pub package_name: String,
    /// Repository name on the hosting service
    pub repository_name: String,
    /// Branch being rendered
    pub current_branch: String,
    /// First declared branch
    pub unstable_branch: String,
    /// Second declared branch
    pub stable_branch: String,
    /// Third declared branch
    pub legacy_branch: String,
    /// Documentation path of the current branch
    pub docs_path: String,
    /// Package name without vendor prefix and `-bundle` suffix
    pub website_path: String,
}

impl TemplateContext {
    /// Build the context of `branch_name`
    pub fn new(
        package: &PackageInfo,
        repository_name: &str,
        packagist_group: &str,
        project: &Project,
        branch_name: &str,
    ) -> Result<Self> {
        let branch = project
            .branch(branch_name)
            .ok_or_else(|| unknown_branch(project, branch_name))?;
        let roles = project
            .roles()
            .ok_or_else(|| unknown_branch(project, branch_name))?;
        let BranchRoles {
            unstable,
            stable,
            legacy,
        } = roles;

        Ok(Self {
            package_title: package_title(&package.name),
            package_description: package.description.clone(),
            packagist_name: package.name.clone(),
            package_name: package.name.clone(),
            repository_name: repository_name.to_string(),
            current_branch: branch_name.to_string(),
            unstable_branch: unstable,
            stable_branch: stable,
            legacy_branch: legacy,
            docs_path: branch.docs_path.clone(),
            website_path: website_path(&package.name, packagist_group),
        })
    }

    /// Replace the literal placeholder tokens of a plain file
    pub fn substitute(&self, content: &str) -> String {
        let replacements = [
            ("{{ package_title }}", &self.package_title),
            ("{{ package_description }}", &self.package_description),
            ("{{ packagist_name }}", &self.packagist_name),
            ("{{ repository_name }}", &self.repository_name),
            ("{{ current_branch }}", &self.current_branch),
            ("{{ unstable_branch }}", &self.unstable_branch),
            ("{{ stable_branch }}", &self.stable_branch),
            ("{{ legacy_branch }}", &self.legacy_branch),
            ("{{ docs_path }}", &self.docs_path),
            ("{{ website_path }}", &self.website_path),
        ];

        replacements
            .into_iter()
            .fold(content.to_string(), |acc, (token, value)| acc.replace(token, value))
    }

    /// Variables of a structured template.
    ///
    /// Layers are merged in order, later keys winning: global settings, project,
    /// branch, then the derived values of this context. The title spells the
    /// `cmf` vendor as `CMF`, unlike the plain-file token.
    pub fn variables(
        &self,
        globals: &Map<String, Value>,
        project: &Project,
        branch: &BranchSpec,
    ) -> Result<Map<String, Value>> {
        let mut variables = globals.clone();
        for layer in [
            serde_json::to_value(project)?,
            serde_json::to_value(branch)?,
            serde_json::to_value(self)?,
        ] {
            if let Value::Object(map) = layer {
                variables.extend(map);
            }
        }
        variables.insert(
            "package_title".to_string(),
            Value::from(package_title(&self.packagist_name.replace("cmf", "CMF"))),
        );
        variables.insert("branches".to_string(), serde_json::to_value(project.branch_names())?);
        Ok(variables)
    }
}

fn unknown_branch(project: &Project, branch_name: &str) -> crate::error::DevKitError {
    ConfigError::UnknownBranch {
        project: project.name.clone(),
        branch: branch_name.to_string(),
    }
    .into()
}

/// `acme/foo-bar` becomes `Acme Foo Bar`
fn package_title(package_name: &str) -> String {
    package_name
        .replace(['/', '-'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn website_path(package_name: &str, packagist_group: &str) -> String {
    package_name
        .replace(&format!("{}/", packagist_group), "")
        .replace("-bundle", "")
}
