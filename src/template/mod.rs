//! Template tree mirroring.
//!
//! The template root is walked once per branch. Files ending in `.hbs` are
//! rendered by handlebars, every other file gets a fixed set of placeholder
//! tokens substituted verbatim.

mod context;
mod renderer;
mod tree;

pub use context::TemplateContext;
pub use renderer::{RenderSummary, TemplateRenderer};
pub use tree::{EntryKind, ExclusionSet, TemplateEntry, TemplateTree};

/// Suffix marking a structured template
pub const TEMPLATE_SUFFIX: &str = "hbs";
