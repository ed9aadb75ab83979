//! Repository settings sync.

use super::NOTHING_CHANGED;
use crate::cli::OutputManager;
use crate::error::Result;
use crate::github::{HostingApi, RepositoryInfo};
use serde_json::Value;

/// Settings every repository of the organization should carry
pub fn desired_settings(homepage: &str, default_branch: &str) -> RepositoryInfo {
    let mut settings = RepositoryInfo::new();
    settings.insert("homepage".into(), Value::from(homepage));
    settings.insert("has_issues".into(), Value::Bool(true));
    settings.insert("has_projects".into(), Value::Bool(true));
    settings.insert("has_wiki".into(), Value::Bool(false));
    settings.insert("default_branch".into(), Value::from(default_branch));
    settings.insert("allow_squash_merge".into(), Value::Bool(true));
    settings.insert("allow_merge_commit".into(), Value::Bool(false));
    settings.insert("allow_rebase_merge".into(), Value::Bool(true));
    settings
}

/// Desired keys whose live value differs, desired order kept
pub fn settings_delta(current: &RepositoryInfo, desired: &RepositoryInfo) -> RepositoryInfo {
    desired
        .iter()
        .filter(|(key, value)| current.get(key.as_str()) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Report, and in apply mode patch, the settings that differ
pub async fn sync_repository<H: HostingApi>(
    hosting: &H,
    repository: &str,
    desired: &RepositoryInfo,
    apply: bool,
    output: &OutputManager,
) -> Result<RepositoryInfo> {
    output.section("Repository")?;

    let current = hosting.repository(repository).await?;
    let delta = settings_delta(&current, desired);
    if delta.is_empty() {
        output.comment(NOTHING_CHANGED)?;
        return Ok(delta);
    }

    let keys: Vec<&str> = delta.keys().map(String::as_str).collect();
    output.comment(&format!("Following info have to be changed: {}.", keys.join(", ")))?;

    if apply {
        let mut patch = delta.clone();
        patch.insert("name".into(), Value::from(repository));
        hosting.update_repository(repository, &patch).await?;
        log::info!("Updated {} settings of {}", delta.len(), repository);
    }
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_keeps_only_differences() {
        let desired = desired_settings("https://example.org", "master");
        let mut current = desired.clone();
        current.insert("has_wiki".into(), Value::Bool(true));
        current.insert("default_branch".into(), Value::from("main"));
        current.insert("stargazers_count".into(), Value::from(42));

        let delta = settings_delta(&current, &desired);
        let keys: Vec<&String> = delta.keys().collect();
        assert_eq!(keys, ["has_wiki", "default_branch"]);
        assert_eq!(delta["has_wiki"], Value::Bool(false));
    }

    #[test]
    fn test_missing_keys_are_differences() {
        let desired = desired_settings("", "master");
        let delta = settings_delta(&RepositoryInfo::new(), &desired);
        assert_eq!(delta.len(), desired.len());
    }
}
