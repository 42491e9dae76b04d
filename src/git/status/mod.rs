//! Working tree status from `git status --porcelain=2 -z`.
//!
//! Parsing runs in one pass over a single token stream:
//!
//! | Stage | Module | Produces |
//! |-------|--------|----------|
//! | Tokenize | [`tokenize`] | [`RawRecord`]s |
//! | Decode | [`decode`] | [`SemanticStatus`] per entry |
//! | Reconcile | [`reconcile`] | [`WorkingDirectoryState`] |
//! | Headers | [`branch`] | [`BranchState`] |
//!
//! [`parse_status`] is pure and reentrant. Running git is the job of
//! [`Repository::status`](crate::git::Repository::status).

pub mod branch;
pub mod decode;
pub mod reconcile;
pub mod tokenize;

use serde::Serialize;

pub use branch::{AheadBehind, BranchState};
pub use decode::{GitStatusEntry, OrdinaryChange, SemanticStatus};
pub use tokenize::{EntryKind, RawEntry, RawRecord};

use crate::git::StatusParseError;
use crate::git::diff::DiffSelection;
use reconcile::Reconciler;

/// Arguments passed to git after `status`.
pub const STATUS_ARGS: &[&str] = &[
    "status",
    "--untracked-files=all",
    "--branch",
    "--porcelain=2",
    "-z",
];

/// The externally visible simplification of [`SemanticStatus`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppFileStatus {
    New,
    Modified,
    Deleted,
    Copied,
    Renamed,
    Conflicted,
}

impl AppFileStatus {
    /// Single-column symbol used in text output.
    pub fn symbol(self) -> char {
        match self {
            AppFileStatus::New => 'A',
            AppFileStatus::Modified => 'M',
            AppFileStatus::Deleted => 'D',
            AppFileStatus::Copied => 'C',
            AppFileStatus::Renamed => 'R',
            AppFileStatus::Conflicted => 'U',
        }
    }
}

impl From<&SemanticStatus> for AppFileStatus {
    fn from(status: &SemanticStatus) -> Self {
        match status {
            SemanticStatus::Ordinary { change, .. } => match change {
                OrdinaryChange::Added => AppFileStatus::New,
                OrdinaryChange::Modified => AppFileStatus::Modified,
                OrdinaryChange::Deleted => AppFileStatus::Deleted,
            },
            SemanticStatus::Renamed { .. } => AppFileStatus::Renamed,
            SemanticStatus::Copied { .. } => AppFileStatus::Copied,
            SemanticStatus::Conflicted { .. } => AppFileStatus::Conflicted,
            SemanticStatus::Untracked => AppFileStatus::New,
        }
    }
}

/// One changed path in the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub status: AppFileStatus,
    /// Original path of a rename or copy
    pub old_path: Option<String>,
    /// The working tree has nothing beyond what is already staged
    pub staged: bool,
    pub selection: DiffSelection,
    /// Raw `XY` code, or `?` for untracked files
    pub status_code: String,
}

impl FileChange {
    pub fn is_untracked(&self) -> bool {
        self.status_code == "?"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkingDirectoryState {
    /// In the order git reported them
    pub files: Vec<FileChange>,
    pub includes_untracked: bool,
}

impl WorkingDirectoryState {
    pub fn find(&self, path: &str) -> Option<&FileChange> {
        self.files.iter().find(|file| file.path == path)
    }

    pub fn staged_files(&self) -> impl Iterator<Item = &FileChange> {
        self.files.iter().filter(|file| file.staged)
    }

    pub fn unstaged_files(&self) -> impl Iterator<Item = &FileChange> {
        self.files.iter().filter(|file| !file.staged)
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResult {
    pub branch: Option<String>,
    pub upstream: Option<String>,
    pub tip: Option<String>,
    pub ahead_behind: Option<AheadBehind>,
    /// False only when git reported that the path is not a repository
    pub exists: bool,
    pub working_directory: WorkingDirectoryState,
}

impl StatusResult {
    pub fn new(branch: BranchState, working_directory: WorkingDirectoryState) -> Self {
        let BranchState {
            branch,
            upstream,
            tip,
            ahead_behind,
        } = branch;
        Self {
            branch,
            upstream,
            tip,
            ahead_behind,
            exists: true,
            working_directory,
        }
    }

    /// Result for a path that is not inside a repository.
    pub fn missing() -> Self {
        Self {
            exists: false,
            ..Self::new(BranchState::default(), WorkingDirectoryState::default())
        }
    }
}

/// Parse porcelain v2 output into a complete status.
///
/// Either every record decodes or the whole call fails; no partial file list
/// is ever returned.
pub fn parse_status(output: &str) -> Result<StatusResult, StatusParseError> {
    let mut branch = BranchState::default();
    let mut reconciler = Reconciler::new();

    for record in tokenize::records(output) {
        match record? {
            RawRecord::Header { value } => branch.apply_header(value),
            RawRecord::Entry(entry) => {
                let status = decode::map_status(&entry)?;
                reconciler.push(&entry, status);
            }
        }
    }

    Ok(StatusResult::new(branch, reconciler.finish()))
}
