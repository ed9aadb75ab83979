//! Lazy traversal of the template root.

use crate::error::{ConfigError, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of a template entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

impl EntryKind {
    /// Kind of an existing path, `None` when it does not exist
    pub fn of(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        Some(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }
}

/// One entry below the template root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Path relative to the template root
    pub relative: PathBuf,
    /// File or directory
    pub kind: EntryKind,
    /// Matched an excluded-file pattern
    pub excluded: bool,
}

/// Compiled excluded-file patterns of a project
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<Pattern>,
}

impl ExclusionSet {
    /// Compile glob patterns; a literal path matches only itself
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p.trim_start_matches("./").trim_end_matches('/')).map_err(|e| {
                    ConfigError::InvalidPattern {
                        pattern: p.to_string(),
                        reason: e.to_string(),
                    }
                    .into()
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Whether a path relative to the template root is excluded
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = to_slash(relative);
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(&normalized, options))
    }
}

/// Forward-slash form of a relative path
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Restartable walk over a template root, pruning excluded paths
#[derive(Debug, Clone)]
pub struct TemplateTree {
    root: PathBuf,
    exclusions: ExclusionSet,
}

impl TemplateTree {
    /// Walk `root`, skipping anything matched by `exclusions`
    pub fn new(root: impl Into<PathBuf>, exclusions: ExclusionSet) -> Self {
        Self {
            root: root.into(),
            exclusions,
        }
    }

    /// Entries in file-name order, parents before children.
    ///
    /// Each call starts a fresh walk. Excluded entries are yielded flagged so
    /// callers can report them, and excluded directories are not descended into.
    pub fn entries(&self) -> impl Iterator<Item = Result<TemplateEntry>> + '_ {
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        std::iter::from_fn(move || {
            let entry = match walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(e) => {
                    return Some(Err(
                        anyhow::anyhow!("{}: {}", entry.path().display(), e).into()
                    ));
                }
            };
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let excluded = self.exclusions.is_excluded(&relative);
            if excluded && kind == EntryKind::Directory {
                walker.skip_current_dir();
            }

            Some(Ok(TemplateEntry {
                relative,
                kind,
                excluded,
            }))
        })
    }
}
