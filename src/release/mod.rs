//! Release compliance checking.
//!
//! Every really stable release `X.Y.Z` implies a maintenance branch `X.x`.
//! The checker compares the branches that should exist against the ones that do.

mod checker;
mod model;
mod stability;

pub use checker::{ComplianceReport, ReleaseCheck, ReleaseChecker, StabilityVerdict};
pub use model::Release;
pub use stability::{Stability, compare_versions, parse_lenient};
