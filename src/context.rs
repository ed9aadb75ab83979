//! Settings shared by every project of a run.

use crate::cli::Args;
use crate::config::{Project, Registry};
use crate::dispatch::desired_settings;
use crate::error::{CliError, Result};
use crate::github::RepositoryInfo;
use crate::manifest::ManifestRewriter;
use crate::packagist::PackageInfo;
use crate::template::TemplateRenderer;
use std::path::PathBuf;

const HOSTING_HOST: &str = "github.com";

/// Registry plus identity, built once per run and borrowed by every step
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Loaded registry
    pub registry: Registry,
    /// Organization owning every repository
    pub organization: String,
    /// Package registry vendor
    pub packagist_group: String,
    /// Homepage pushed to repository settings
    pub homepage: String,
    /// Directory receiving the clones
    pub workdir: PathBuf,
    user: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl RunContext {
    /// Assemble the context from a loaded registry and the command line
    pub fn new(registry: Registry, args: &Args) -> Result<Self> {
        let organization = args
            .org
            .clone()
            .filter(|org| !org.trim().is_empty())
            .ok_or_else(|| CliError::MissingArgument {
                argument: "--org (or GITHUB_GROUP)".to_string(),
            })?;
        let packagist_group = args
            .packagist_group
            .clone()
            .unwrap_or_else(|| organization.clone());
        let homepage = args
            .homepage
            .clone()
            .unwrap_or_else(|| registry.settings.homepage.clone());
        let workdir = args.workdir.clone().unwrap_or_else(default_workdir);

        Ok(Self {
            registry,
            organization,
            packagist_group,
            homepage,
            workdir,
            user: args.user.clone(),
            email: args.email.clone(),
            token: args.token.clone(),
        })
    }

    /// Hosting API token, if any
    pub fn token(&self) -> Option<String> {
        self.token.clone()
    }

    /// Package registry name of a project, `{vendor}/{project}`
    pub fn package_name(&self, project: &Project) -> String {
        format!("{}/{}", self.packagist_group, project.name)
    }

    /// Committer name and email, required to push
    pub fn identity(&self) -> Result<(&str, &str)> {
        let user = self.user.as_deref().ok_or_else(|| CliError::MissingArgument {
            argument: "--user (or GITHUB_USER)".to_string(),
        })?;
        let email = self.email.as_deref().ok_or_else(|| CliError::MissingArgument {
            argument: "--email (or GITHUB_EMAIL)".to_string(),
        })?;
        Ok((user, email))
    }

    /// Authenticated clone URL of a repository
    pub fn clone_url(&self, repository: &str) -> Result<String> {
        let (user, _) = self.identity()?;
        let token = self.token.as_deref().ok_or_else(|| CliError::MissingArgument {
            argument: "--token (or GITHUB_OAUTH_TOKEN)".to_string(),
        })?;
        Ok(format!(
            "https://{}:{}@{}/{}/{}",
            user, token, HOSTING_HOST, self.organization, repository
        ))
    }

    /// Local clone location of a repository
    pub fn clone_path(&self, repository: &str) -> PathBuf {
        self.workdir.join(repository)
    }

    /// Repository settings every repository should carry
    pub fn desired_settings(&self) -> RepositoryInfo {
        desired_settings(&self.homepage, &self.registry.settings.default_branch)
    }

    /// Renderer for one package, with the registry's partials registered
    pub fn renderer(&self, package: PackageInfo) -> Result<TemplateRenderer> {
        let mut renderer = TemplateRenderer::new(
            self.registry.global_variables()?,
            package,
            self.packagist_group.clone(),
        );
        if let Some(dir) = self.registry.partials_dir() {
            let count = renderer.register_partials(&dir)?;
            log::debug!("{} partials registered from {}", count, dir.display());
        }
        Ok(renderer)
    }

    /// Manifest rewriter for the registry's dependency groups
    pub fn rewriter(&self) -> ManifestRewriter {
        ManifestRewriter::new(self.registry.dependency_groups.clone())
    }
}

fn default_workdir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dev-kit")
}
