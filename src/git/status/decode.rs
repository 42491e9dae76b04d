//! Decode `XY` status codes into semantic statuses.

use super::tokenize::{EntryKind, RawEntry};
use crate::git::StatusParseError;

/// State of one column (index or working tree) of an `XY` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStatusEntry {
    Unchanged,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    UpdatedButUnmerged,
    /// File type changed (regular file, symlink, submodule)
    TypeChanged,
}

impl GitStatusEntry {
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            '.' => Self::Unchanged,
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            'U' => Self::UpdatedButUnmerged,
            'T' => Self::TypeChanged,
            _ => return None,
        })
    }
}

/// The observable change of an ordinary (`1`) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinaryChange {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticStatus {
    Ordinary {
        change: OrdinaryChange,
        index: GitStatusEntry,
        working_tree: GitStatusEntry,
    },
    Renamed {
        index: GitStatusEntry,
        working_tree: GitStatusEntry,
    },
    Copied {
        index: GitStatusEntry,
        working_tree: GitStatusEntry,
    },
    Conflicted {
        index: GitStatusEntry,
        working_tree: GitStatusEntry,
    },
    Untracked,
}

/// Decode a raw entry into exactly one semantic status.
pub fn map_status(entry: &RawEntry<'_>) -> Result<SemanticStatus, StatusParseError> {
    if entry.kind == EntryKind::Untracked {
        return Ok(SemanticStatus::Untracked);
    }

    let (index, working_tree) = split_code(entry.status_code)?;
    match entry.kind {
        EntryKind::Ordinary => {
            let change = ordinary_change(index, working_tree).ok_or_else(|| {
                StatusParseError::UnexpectedStatusCode {
                    marker: entry.marker(),
                    code: entry.status_code.to_string(),
                }
            })?;
            Ok(SemanticStatus::Ordinary {
                change,
                index,
                working_tree,
            })
        }
        EntryKind::RenamedOrCopied { score, .. } => {
            if is_copy(score, index, working_tree) {
                Ok(SemanticStatus::Copied {
                    index,
                    working_tree,
                })
            } else {
                Ok(SemanticStatus::Renamed {
                    index,
                    working_tree,
                })
            }
        }
        EntryKind::Unmerged => Ok(SemanticStatus::Conflicted {
            index,
            working_tree,
        }),
        EntryKind::Untracked => Ok(SemanticStatus::Untracked),
    }
}

fn split_code(code: &str) -> Result<(GitStatusEntry, GitStatusEntry), StatusParseError> {
    let unknown = || StatusParseError::UnknownFileStatus {
        code: code.to_string(),
    };
    let mut chars = code.chars();
    let (Some(x), Some(y), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(unknown());
    };
    let index = GitStatusEntry::from_code(x).ok_or_else(unknown)?;
    let working_tree = GitStatusEntry::from_code(y).ok_or_else(unknown)?;
    Ok((index, working_tree))
}

/// The working-tree column wins when both columns changed.
fn ordinary_change(
    index: GitStatusEntry,
    working_tree: GitStatusEntry,
) -> Option<OrdinaryChange> {
    let changed = [working_tree, index]
        .into_iter()
        .find(|column| *column != GitStatusEntry::Unchanged)?;
    match changed {
        GitStatusEntry::Added => Some(OrdinaryChange::Added),
        GitStatusEntry::Modified | GitStatusEntry::TypeChanged => Some(OrdinaryChange::Modified),
        GitStatusEntry::Deleted => Some(OrdinaryChange::Deleted),
        GitStatusEntry::Unchanged
        | GitStatusEntry::Renamed
        | GitStatusEntry::Copied
        | GitStatusEntry::UpdatedButUnmerged => None,
    }
}

/// The score field (`R100`, `C75`) decides; the `XY` letters are the fallback.
fn is_copy(score: &str, index: GitStatusEntry, working_tree: GitStatusEntry) -> bool {
    match score.chars().next() {
        Some('C') => true,
        Some('R') => false,
        _ => index == GitStatusEntry::Copied || working_tree == GitStatusEntry::Copied,
    }
}
