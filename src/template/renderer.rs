//! Mirrors the template tree into a working copy.

use super::{EntryKind, ExclusionSet, TEMPLATE_SUFFIX, TemplateContext, TemplateTree};
use crate::config::Project;
use crate::error::{ConfigError, Result};
use crate::packagist::PackageInfo;
use handlebars::Handlebars;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a render pass touched, paths relative to the destination root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Files written
    pub rendered: Vec<PathBuf>,
    /// Directories created
    pub created_directories: Vec<PathBuf>,
    /// Template paths skipped by exclusion
    pub skipped: Vec<PathBuf>,
}

/// Renders the template tree for one package
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    globals: Map<String, Value>,
    package: PackageInfo,
    repository_name: String,
    packagist_group: String,
}

impl TemplateRenderer {
    /// Create a renderer for `package`.
    ///
    /// `globals` is the lowest variable layer of structured templates.
    pub fn new(
        globals: Map<String, Value>,
        package: PackageInfo,
        packagist_group: impl Into<String>,
    ) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        let repository_name = package.repository_name();
        Self {
            handlebars,
            globals,
            package,
            repository_name,
            packagist_group: packagist_group.into(),
        }
    }

    /// Register every `.hbs` file below `dir` as a partial named by its
    /// relative path without suffix, e.g. `layout/readme`.
    pub fn register_partials(&mut self, dir: &Path) -> Result<usize> {
        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_SUFFIX)
            {
                continue;
            }

            let name = path
                .strip_prefix(dir)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read_to_string(path)?;
            self.handlebars
                .register_partial(&name, content)
                .map_err(|e| ConfigError::Template {
                    template: name.clone(),
                    reason: e.to_string(),
                })?;

            log::debug!("Registered partial {}", name);
            count += 1;
        }
        Ok(count)
    }

    /// Mirror `source_root` into `dest_root` for `branch_name` of `project`
    pub fn render(
        &self,
        source_root: &Path,
        dest_root: &Path,
        project: &Project,
        branch_name: &str,
    ) -> Result<RenderSummary> {
        let context = TemplateContext::new(
            &self.package,
            &self.repository_name,
            &self.packagist_group,
            project,
            branch_name,
        )?;
        let branch = project
            .branch(branch_name)
            .ok_or_else(|| ConfigError::UnknownBranch {
                project: project.name.clone(),
                branch: branch_name.to_string(),
            })?;
        let variables = context.variables(&self.globals, project, branch)?;

        let tree = TemplateTree::new(source_root, ExclusionSet::new(&project.excluded_files)?);
        let mut summary = RenderSummary::default();

        for entry in tree.entries() {
            let entry = entry?;
            if entry.excluded {
                log::debug!("Skipping excluded {}", entry.relative.display());
                summary.skipped.push(entry.relative);
                continue;
            }

            let source = source_root.join(&entry.relative);
            let is_template = entry.kind == EntryKind::File
                && entry.relative.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_SUFFIX);
            let relative_dest = if is_template {
                entry.relative.with_extension("")
            } else {
                entry.relative.clone()
            };
            let destination = dest_root.join(&relative_dest);

            if EntryKind::of(&destination).is_some_and(|existing| existing != entry.kind) {
                return Err(ConfigError::TypeMismatch {
                    source_path: source,
                    destination,
                }
                .into());
            }

            if entry.kind == EntryKind::Directory {
                if !destination.exists() {
                    std::fs::create_dir_all(&destination)?;
                    summary.created_directories.push(relative_dest);
                }
                continue;
            }

            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let raw = std::fs::read(&source)?;
            let content = if is_template {
                let template = String::from_utf8_lossy(&raw);
                self.handlebars
                    .render_template(&template, &variables)
                    .map_err(|e| ConfigError::Template {
                        template: entry.relative.display().to_string(),
                        reason: e.to_string(),
                    })?
                    .into_bytes()
            } else {
                match String::from_utf8(raw) {
                    Ok(text) => context.substitute(&text).into_bytes(),
                    Err(binary) => binary.into_bytes(),
                }
            };

            std::fs::write(&destination, content)?;
            std::fs::set_permissions(&destination, std::fs::metadata(&source)?.permissions())?;
            summary.rendered.push(relative_dest);
        }

        log::info!(
            "Rendered {} files into {} ({} skipped)",
            summary.rendered.len(),
            dest_root.display(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}
