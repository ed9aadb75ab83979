//! Label sync.

use super::NOTHING_CHANGED;
use crate::cli::OutputManager;
use crate::config::LabelSpec;
use crate::error::Result;
use crate::github::{HostingApi, Label};
use std::collections::BTreeMap;
use std::fmt;

/// What happens to a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    /// Present but not configured
    Deleted,
    /// Configured with another color
    Updated,
    /// Configured but absent
    Created,
}

impl fmt::Display for LabelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LabelState::Deleted => "Deleted",
            LabelState::Updated => "Updated",
            LabelState::Created => "Created",
        })
    }
}

/// One planned label mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChange {
    /// Label name
    pub name: String,
    /// Live color, if the label exists
    pub actual_color: Option<String>,
    /// Configured color, if the label is configured
    pub needed_color: Option<String>,
    /// Mutation
    pub state: LabelState,
}

impl LabelChange {
    fn row(&self) -> Vec<String> {
        let color = |c: &Option<String>| c.as_ref().map_or_else(|| "N/A".to_string(), |c| format!("#{}", c));
        vec![
            self.name.clone(),
            color(&self.actual_color),
            color(&self.needed_color),
            self.state.to_string(),
        ]
    }
}

/// Changes turning `live` into `configured`, sorted by name ignoring case
pub fn plan_labels(configured: &BTreeMap<String, LabelSpec>, live: &[Label]) -> Vec<LabelChange> {
    let mut changes: Vec<LabelChange> = live
        .iter()
        .filter_map(|label| match configured.get(&label.name) {
            None => Some(LabelChange {
                name: label.name.clone(),
                actual_color: Some(label.color.clone()),
                needed_color: None,
                state: LabelState::Deleted,
            }),
            Some(spec) if spec.color != label.color => Some(LabelChange {
                name: label.name.clone(),
                actual_color: Some(label.color.clone()),
                needed_color: Some(spec.color.clone()),
                state: LabelState::Updated,
            }),
            Some(_) => None,
        })
        .collect();

    changes.extend(
        configured
            .iter()
            .filter(|(name, _)| !live.iter().any(|label| &label.name == *name))
            .map(|(name, spec)| LabelChange {
                name: name.clone(),
                actual_color: None,
                needed_color: Some(spec.color.clone()),
                state: LabelState::Created,
            }),
    );

    changes.sort_by_key(|change| change.name.to_lowercase());
    changes
}

/// Report, and in apply mode perform, the label changes of a repository
pub async fn sync_labels<H: HostingApi>(
    hosting: &H,
    repository: &str,
    configured: &BTreeMap<String, LabelSpec>,
    apply: bool,
    output: &OutputManager,
) -> Result<Vec<LabelChange>> {
    output.section("Labels")?;

    let live = hosting.labels(repository).await?;
    let changes = plan_labels(configured, &live);
    if changes.is_empty() {
        output.comment(NOTHING_CHANGED)?;
        return Ok(changes);
    }

    let rows: Vec<Vec<String>> = changes.iter().map(LabelChange::row).collect();
    output.table(&["Name", "Actual color", "Needed Color", "State"], &rows)?;

    if apply {
        for change in &changes {
            match (change.state, &change.needed_color) {
                (LabelState::Deleted, _) => hosting.delete_label(repository, &change.name).await?,
                (LabelState::Updated, Some(color)) => {
                    let label = Label {
                        name: change.name.clone(),
                        color: color.clone(),
                    };
                    hosting.update_label(repository, &change.name, &label).await?
                }
                (LabelState::Created, Some(color)) => {
                    let label = Label {
                        name: change.name.clone(),
                        color: color.clone(),
                    };
                    hosting.create_label(repository, &label).await?
                }
                (_, None) => {}
            }
        }
        output.success("Labels successfully updated.")?;
    }
    Ok(changes)
}
