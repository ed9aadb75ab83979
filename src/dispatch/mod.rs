//! Per-project synchronization: repository settings, labels, branch
//! protection and the file cascade across release branches.

mod cascade;
mod labels;
mod protection;
mod repository;

pub use cascade::{
    BranchCascade, BranchOutcome, BranchReport, CascadeOptions, CascadeReport, PullRequestStatus,
    WorkingBranchPair,
};
pub use labels::{LabelChange, LabelState, plan_labels, sync_labels};
pub use protection::{protect_branches, protection_policy};
pub use repository::{desired_settings, settings_delta, sync_repository};

/// Reported whenever a step has nothing to do
pub const NOTHING_CHANGED: &str = "Nothing to be changed.";
