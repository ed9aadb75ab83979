//! Dispatch command: settings, labels, protection and the file cascade.

use super::helpers::{Selection, absorb_recoverable, select_projects};
use crate::cli::{Args, OutputManager, RuntimeConfig};
use crate::config::{Project, Registry};
use crate::context::RunContext;
use crate::dispatch::{
    BranchCascade, BranchOutcome, CascadeOptions, protect_branches, sync_labels, sync_repository,
};
use crate::error::Result;
use crate::git::SystemGit;
use crate::github::{GitHubClient, HostingApi};
use crate::packagist::{PackageInfo, PackageRegistry, PackagistClient};

/// Execute the dispatch command
pub(super) async fn execute_dispatch(
    args: &Args,
    config: &RuntimeConfig,
    projects: &[String],
    apply: bool,
    with_files: bool,
) -> Result<i32> {
    let output = config.output();
    let registry = Registry::load(&args.config)?;

    let names = match select_projects(&registry, projects, output)? {
        Selection::Projects(names) => names,
        Selection::Unconfigured => return Ok(1),
    };

    let context = RunContext::new(registry, args)?;
    let hosting = GitHubClient::new(context.organization.clone(), context.token())?;
    let packages = PackagistClient::new();

    if !apply {
        output.comment("Dry run, pass --apply to perform the changes.")?;
    }

    for name in &names {
        let Some(project) = context.registry.project(name) else {
            continue;
        };
        let result =
            dispatch_project(&context, &hosting, &packages, project, apply, with_files, output)
                .await;
        absorb_recoverable(result, output)?;
    }

    Ok(0)
}

async fn dispatch_project<H: HostingApi, P: PackageRegistry>(
    context: &RunContext,
    hosting: &H,
    packages: &P,
    project: &Project,
    apply: bool,
    with_files: bool,
    output: &OutputManager,
) -> Result<()> {
    let package = packages.package(&context.package_name(project)).await?;
    let repository = package.repository_name();
    output.title(&package.name)?;

    sync_repository(hosting, &repository, &context.desired_settings(), apply, output).await?;
    sync_labels(hosting, &repository, &context.registry.labels, apply, output).await?;
    protect_branches(
        hosting,
        &repository,
        &project.branch_names(),
        &context.registry.settings.required_status_checks,
        apply,
        output,
    )
    .await?;

    if with_files {
        dispatch_files(context, hosting, package, &repository, project, apply, output).await?;
    }
    Ok(())
}

async fn dispatch_files<H: HostingApi>(
    context: &RunContext,
    hosting: &H,
    package: PackageInfo,
    repository: &str,
    project: &Project,
    apply: bool,
    output: &OutputManager,
) -> Result<()> {
    if project.branches.is_empty() {
        log::info!("{} declares no branch, nothing to dispatch", project.name);
        return Ok(());
    }

    let (user, email) = context.identity()?;
    let git = SystemGit::clone_fresh(&context.clone_url(repository)?, &context.clone_path(repository))
        .await?;
    git.configure_identity(user, email).await?;

    let renderer = context.renderer(package)?;
    let rewriter = context.rewriter();
    let cascade = BranchCascade::new(
        hosting,
        &git,
        &renderer,
        &rewriter,
        CascadeOptions::from_registry(&context.registry, apply),
        output,
    );

    let report = cascade.run(project, repository).await?;
    for branch in &report.branches {
        match &branch.outcome {
            BranchOutcome::PendingCompanion { companion } => output.comment(&format!(
                "{} skipped: {} is waiting to be merged.",
                branch.branch, companion
            ))?,
            BranchOutcome::NotMerged { previous, ahead_by } => output.comment(&format!(
                "{} skipped: {} is {} commit(s) ahead of it.",
                branch.branch, previous, ahead_by
            ))?,
            BranchOutcome::Unchanged | BranchOutcome::Changed { .. } => {}
        }
    }
    Ok(())
}
