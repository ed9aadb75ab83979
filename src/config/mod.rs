//! Project registry: the ordered project → branch configuration every command reads.
//!
//! The registry is a single TOML file. Declaration order of projects and of the
//! branches inside a project is significant and is preserved when loading.

mod project;
mod registry;
mod settings;

pub use project::{BranchRoles, BranchSpec, Project};
pub use registry::Registry;
pub use settings::{DependencyGroup, GlobalSettings, LabelSpec};
