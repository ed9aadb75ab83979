//! Manifest (composer.json) constraint rewriting.
//!
//! Every branch pins its runtime and framework version ranges in the manifest;
//! the ranges are derived from the branch configuration on each run.

mod constraint;
mod rewriter;

pub use constraint::evaluate_version_constraint;
pub use rewriter::{ManifestRewriter, RewriteSummary};
