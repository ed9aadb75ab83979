//! Release check command.

use super::helpers::{Selection, absorb_recoverable, select_projects};
use crate::cli::{Args, OutputManager, RuntimeConfig};
use crate::config::{Project, Registry};
use crate::context::RunContext;
use crate::error::Result;
use crate::github::{GitHubClient, HostingApi};
use crate::packagist::{PackageRegistry, PackagistClient};
use crate::release::{ComplianceReport, ReleaseCheck, ReleaseChecker, StabilityVerdict};

/// Execute the release-check command
pub(super) async fn execute_release_check(
    args: &Args,
    config: &RuntimeConfig,
    projects: &[String],
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

    let mut suggested_actions = Vec::new();
    for name in &names {
        let Some(project) = context.registry.project(name) else {
            continue;
        };
        let result = check_project(&context, &hosting, &packages, project, output).await;
        if let Some(Some(action)) = absorb_recoverable(result, output)? {
            suggested_actions.push(action);
        }
    }

    if !suggested_actions.is_empty() {
        output.section("Suggested actions")?;
        for action in &suggested_actions {
            output.indent(action)?;
        }
    }

    Ok(0)
}

async fn check_project<H: HostingApi, P: PackageRegistry>(
    context: &RunContext,
    hosting: &H,
    packages: &P,
    project: &Project,
    output: &OutputManager,
) -> Result<Option<String>> {
    let package = packages.package(&context.package_name(project)).await?;
    output.title(&package.name)?;
    output.section("Validations")?;

    let checker = ReleaseChecker::new(hosting, context.registry.settings.default_branch.clone());
    match checker.check(&package.repository_name()).await? {
        ReleaseCheck::NoReleases { repository } => {
            output.error(&format!("No releases found for {}", repository));
            Ok(None)
        }
        ReleaseCheck::Report(report) => {
            print_report(&report, output)?;
            Ok(Some(report.suggested_action()))
        }
    }
}

fn print_report(report: &ComplianceReport, output: &OutputManager) -> std::io::Result<()> {
    let names: Vec<&str> = report.releases.iter().map(|r| r.name.as_str()).collect();
    output.println("All releases")?;
    output.indent(&names.join(", "))?;

    output.println("Stable releases")?;
    let annotated: Vec<String> = report
        .stable_releases
        .iter()
        .map(|(release, verdict)| match verdict {
            StabilityVerdict::Valid => format!("{} (stable)", release.name),
            StabilityVerdict::Invalid(reason) => format!("{} ({}) !", release.name, reason),
        })
        .collect();
    output.indent(&annotated.join(", "))?;

    if let Some(latest) = report.latest() {
        output.println(&format!("Latest Release: {}", latest.name))?;
    }
    output.println(&format!("All Branches: {}", report.branches.join(", ")))?;
    output.println(&format!(
        "Expected Branches: {}",
        report.expected_branches.join(", ")
    ))?;
    if report.missing_branches.is_empty() {
        output.success("No missing branch.")
    } else {
        output.warn(&format!(
            "Missing branches: {}",
            report.missing_branches.join(", ")
        ))
    }
}
