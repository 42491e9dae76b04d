//! Build the working directory file list from decoded entries.
//!
//! Entries are consumed in the order git reported them and the output keeps
//! that order. Files are keyed by path so that at most one change per path
//! survives.

use indexmap::IndexMap;

use super::decode::{GitStatusEntry, SemanticStatus};
use super::tokenize::RawEntry;
use super::{AppFileStatus, FileChange, WorkingDirectoryState};
use crate::git::diff::DiffSelection;

#[derive(Debug, Default)]
pub struct Reconciler {
    files: IndexMap<String, FileChange>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: &RawEntry<'_>, status: SemanticStatus) {
        match status {
            // Staged for addition, then removed from disk: it won't be part of
            // the next commit, so it isn't a pending change.
            SemanticStatus::Ordinary {
                index: GitStatusEntry::Added,
                working_tree: GitStatusEntry::Deleted,
                ..
            } => {
                log::trace!("Skipping added-then-deleted {}", entry.path);
                return;
            }
            // A staged delete followed by a new file at the same path: the file
            // on disk wins and moves to the untracked position.
            SemanticStatus::Untracked => {
                if self.files.shift_remove(entry.path).is_some() {
                    log::trace!("Untracked {} replaces earlier entry", entry.path);
                }
            }
            _ => {}
        }

        let change = FileChange {
            path: entry.path.to_string(),
            status: AppFileStatus::from(&status),
            old_path: entry.old_path().map(str::to_string),
            staged: is_staged(entry.status_code),
            selection: DiffSelection::all(),
            status_code: entry.status_code.to_string(),
        };
        log::trace!("{} {} [{}]", change.status, change.path, change.status_code);
        // A repeated path keeps its first position and takes the later value
        self.files.insert(change.path.clone(), change);
    }

    pub fn finish(self) -> WorkingDirectoryState {
        WorkingDirectoryState {
            files: self.files.into_values().collect(),
            includes_untracked: true,
        }
    }
}

/// `A.` and `M.` are staged; `.M` and `?` are not.
pub fn is_staged(status_code: &str) -> bool {
    let code = status_code.trim();
    code.chars().count() == 2 && code.ends_with('.')
}
