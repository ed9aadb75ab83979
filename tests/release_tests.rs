mod common;

use common::{FakeHosting, release};
use devkit_dispatch::release::{ReleaseCheck, ReleaseChecker, StabilityVerdict};

fn report_of(check: ReleaseCheck) -> devkit_dispatch::release::ComplianceReport {
    match check {
        ReleaseCheck::Report(report) => report,
        other => panic!("expected a report, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expected_branches_from_stable_releases() {
    let mut hosting = FakeHosting::with_branches(&["master", "3.x"]);
    hosting.releases = vec![
        release(1, "DemoBundle", "3.0.0", false),
        release(2, "DemoBundle", "3.1.0", false),
        release(3, "DemoBundle", "4.0.0-alpha", true),
    ];

    let report = report_of(
        ReleaseChecker::new(&hosting, "master")
            .check("DemoBundle")
            .await
            .unwrap(),
    );

    let names: Vec<&str> = report.releases.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["4.0.0-alpha", "3.1.0", "3.0.0"]);
    assert_eq!(report.latest().map(|r| r.name.as_str()), Some("4.0.0-alpha"));

    let stable: Vec<&str> = report.really_stable().map(|r| r.name.as_str()).collect();
    assert_eq!(stable, ["3.1.0", "3.0.0"]);
    assert_eq!(report.expected_branches, ["3.x", "master"]);
    assert!(report.missing_branches.is_empty());
}

#[tokio::test]
async fn test_missing_maintenance_branch() {
    let mut hosting = FakeHosting::with_branches(&["master"]);
    hosting.releases = vec![
        release(1, "DemoBundle", "1.4.2", false),
        release(2, "DemoBundle", "2.0.0", false),
    ];

    let report = report_of(
        ReleaseChecker::new(&hosting, "master")
            .check("DemoBundle")
            .await
            .unwrap(),
    );

    assert_eq!(report.expected_branches, ["2.x", "1.x", "master"]);
    assert_eq!(report.missing_branches, ["2.x", "1.x"]);
    assert_eq!(
        report.suggested_action(),
        "You should add following branches: 2.x, 1.x, master on repository."
    );
}

#[tokio::test]
async fn test_releases_of_other_repositories_are_ignored() {
    let mut hosting = FakeHosting::with_branches(&["master"]);
    hosting.releases = vec![
        release(1, "DemoBundle", "1.0.0", false),
        release(2, "OtherBundle", "5.0.0", false),
    ];

    let report = report_of(
        ReleaseChecker::new(&hosting, "master")
            .check("DemoBundle")
            .await
            .unwrap(),
    );

    assert_eq!(report.releases.len(), 1);
    assert_eq!(report.expected_branches, ["1.x", "master"]);
    assert_eq!(report.missing_branches, ["1.x"]);
}

#[tokio::test]
async fn test_no_releases() {
    let hosting = FakeHosting::with_branches(&["master"]);

    let check = ReleaseChecker::new(&hosting, "master")
        .check("DemoBundle")
        .await
        .unwrap();

    assert_eq!(
        check,
        ReleaseCheck::NoReleases {
            repository: "DemoBundle".to_string()
        }
    );
    // Branches are never fetched without releases.
    assert!(hosting.calls_starting_with("branches").is_empty());
}

#[tokio::test]
async fn test_mislabelled_stable_release() {
    let mut hosting = FakeHosting::with_branches(&["master"]);
    hosting.releases = vec![
        release(1, "DemoBundle", "1.2.0-beta", false),
        release(2, "DemoBundle", "nightly", false),
    ];

    let report = report_of(
        ReleaseChecker::new(&hosting, "master")
            .check("DemoBundle")
            .await
            .unwrap(),
    );

    let verdicts: Vec<(&str, &StabilityVerdict)> = report
        .stable_releases
        .iter()
        .map(|(release, verdict)| (release.name.as_str(), verdict))
        .collect();
    assert_eq!(
        verdicts,
        [
            ("1.2.0-beta", &StabilityVerdict::Invalid("beta".to_string())),
            ("nightly", &StabilityVerdict::Invalid("not a version".to_string())),
        ]
    );
    assert_eq!(report.really_stable().count(), 0);
    assert_eq!(report.expected_branches, ["master"]);
}

#[tokio::test]
async fn test_build_metadata_does_not_make_a_release_stable() {
    let mut hosting = FakeHosting::with_branches(&["master"]);
    hosting.releases = vec![
        release(1, "DemoBundle", "1.2.0-beta+001", false),
        release(2, "DemoBundle", "2.0.0-RC1+build.5", false),
        release(3, "DemoBundle", "1.1.0+20240101", false),
    ];

    let report = report_of(
        ReleaseChecker::new(&hosting, "master")
            .check("DemoBundle")
            .await
            .unwrap(),
    );

    let verdicts: Vec<(&str, &StabilityVerdict)> = report
        .stable_releases
        .iter()
        .map(|(release, verdict)| (release.name.as_str(), verdict))
        .collect();
    assert_eq!(
        verdicts,
        [
            ("2.0.0-RC1+build.5", &StabilityVerdict::Invalid("RC".to_string())),
            ("1.2.0-beta+001", &StabilityVerdict::Invalid("beta".to_string())),
            ("1.1.0+20240101", &StabilityVerdict::Valid),
        ]
    );
    assert_eq!(report.expected_branches, ["1.x", "master"]);
}
