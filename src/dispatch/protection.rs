//! Branch protection push.

use crate::cli::OutputManager;
use crate::error::Result;
use crate::github::HostingApi;
use serde_json::{Value, json};

/// Protection applied to every maintained branch
pub fn protection_policy(status_checks: &[String]) -> Value {
    json!({
        "required_status_checks": {
            "strict": false,
            "contexts": status_checks,
        },
        "required_pull_request_reviews": {
            "dismissal_restrictions": {
                "users": [],
                "teams": [],
            },
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": true,
        },
        "restrictions": null,
        "enforce_admins": false,
    })
}

/// Protect every branch; only in apply mode. Returns the number of branches updated.
pub async fn protect_branches<H: HostingApi>(
    hosting: &H,
    repository: &str,
    branches: &[&str],
    status_checks: &[String],
    apply: bool,
    output: &OutputManager,
) -> Result<usize> {
    output.section("Branches protection")?;
    if !apply {
        return Ok(0);
    }

    let policy = protection_policy(status_checks);
    for branch in branches {
        hosting.protect_branch(repository, branch, &policy).await?;
        log::debug!("Protected {}:{}", repository, branch);
    }
    output.comment("Branches protection applied.")?;
    Ok(branches.len())
}
