//! Diff selection handle carried by each file change.
//!
//! Partial-file and partial-hunk staging is owned by the staging layer; the
//! status engine only ever creates the initial "everything selected" handle.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffSelectionType {
    #[default]
    All,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSelection {
    default_selection: DiffSelectionType,
}

impl DiffSelection {
    pub fn from_initial_selection(selection: DiffSelectionType) -> Self {
        Self {
            default_selection: selection,
        }
    }

    /// Every line of the file selected.
    pub fn all() -> Self {
        Self::from_initial_selection(DiffSelectionType::All)
    }

    pub fn selection_type(&self) -> DiffSelectionType {
        self.default_selection
    }
}
