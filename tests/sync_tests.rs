mod common;

use common::FakeHosting;
use devkit_dispatch::cli::OutputManager;
use devkit_dispatch::config::LabelSpec;
use devkit_dispatch::dispatch::{
    LabelState, desired_settings, protect_branches, sync_labels, sync_repository,
};
use devkit_dispatch::github::Label;
use serde_json::Value;
use std::collections::BTreeMap;

fn quiet() -> OutputManager {
    OutputManager::new(false, true)
}

fn configured_labels() -> BTreeMap<String, LabelSpec> {
    BTreeMap::from([
        ("bug".to_string(), LabelSpec { color: "ee0701".to_string() }),
        ("docs".to_string(), LabelSpec { color: "0e8a16".to_string() }),
    ])
}

#[tokio::test]
async fn test_repository_dry_run_only_reports() {
    let hosting = FakeHosting::default();
    hosting
        .repository
        .borrow_mut()
        .insert("has_wiki".into(), Value::Bool(true));

    let delta = sync_repository(
        &hosting,
        "DemoBundle",
        &desired_settings("https://example.org", "master"),
        false,
        &quiet(),
    )
    .await
    .unwrap();

    assert!(delta.contains_key("has_wiki"));
    assert!(delta.contains_key("homepage"));
    assert!(hosting.calls_starting_with("update_repository").is_empty());
}

#[tokio::test]
async fn test_repository_apply_patches_delta_with_name() {
    let hosting = FakeHosting::default();
    let desired = desired_settings("https://example.org", "master");
    *hosting.repository.borrow_mut() = desired.clone();
    hosting
        .repository
        .borrow_mut()
        .insert("default_branch".into(), Value::from("main"));

    sync_repository(&hosting, "DemoBundle", &desired, true, &quiet())
        .await
        .unwrap();

    assert_eq!(
        hosting.calls_starting_with("update_repository"),
        ["update_repository DemoBundle default_branch,name"]
    );

    // Second pass finds nothing left to change.
    let delta = sync_repository(&hosting, "DemoBundle", &desired, true, &quiet())
        .await
        .unwrap();
    assert!(delta.is_empty());
    assert_eq!(hosting.calls_starting_with("update_repository").len(), 1);
}

#[tokio::test]
async fn test_labels_apply() {
    let hosting = FakeHosting::default();
    *hosting.labels.borrow_mut() = vec![
        Label {
            name: "bug".to_string(),
            color: "ffffff".to_string(),
        },
        Label {
            name: "Wontfix".to_string(),
            color: "000000".to_string(),
        },
    ];

    let changes = sync_labels(&hosting, "DemoBundle", &configured_labels(), true, &quiet())
        .await
        .unwrap();

    let states: Vec<(&str, LabelState)> = changes
        .iter()
        .map(|change| (change.name.as_str(), change.state))
        .collect();
    assert_eq!(
        states,
        [
            ("bug", LabelState::Updated),
            ("docs", LabelState::Created),
            ("Wontfix", LabelState::Deleted),
        ]
    );
    assert_eq!(
        *hosting.calls.borrow(),
        ["update_label bug ee0701", "create_label docs", "delete_label Wontfix"]
    );
}

#[tokio::test]
async fn test_labels_dry_run_leaves_remote_alone() {
    let hosting = FakeHosting::default();

    let changes = sync_labels(&hosting, "DemoBundle", &configured_labels(), false, &quiet())
        .await
        .unwrap();

    assert_eq!(changes.len(), 2);
    assert!(hosting.calls.borrow().is_empty());
    assert!(hosting.labels.borrow().is_empty());
}

#[tokio::test]
async fn test_protection_only_in_apply_mode() {
    let hosting = FakeHosting::default();
    let checks = vec!["ci/build".to_string()];

    let protected = protect_branches(&hosting, "DemoBundle", &["master", "3.x"], &checks, false, &quiet())
        .await
        .unwrap();
    assert_eq!(protected, 0);
    assert!(hosting.calls.borrow().is_empty());

    let protected = protect_branches(&hosting, "DemoBundle", &["master", "3.x"], &checks, true, &quiet())
        .await
        .unwrap();
    assert_eq!(protected, 2);
    assert_eq!(
        *hosting.calls.borrow(),
        ["protect_branch master", "protect_branch 3.x"]
    );
}
