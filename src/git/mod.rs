//! Git operations for the branch cascade.
//!
//! The dispatcher talks to a local clone through the WorkingCopy trait; the
//! production implementation shells out to the system git executable.

mod operations;
mod system_git;

pub use operations::{BranchListing, WorkingCopy};
pub use system_git::SystemGit;
