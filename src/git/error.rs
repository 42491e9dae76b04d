//! Git error types
//!
//! Uses anyhow for error propagation. `GitError` covers failures of the git
//! process itself; `StatusParseError` covers output that could not be decoded.
//! Both are plain enums so callers can `downcast_ref` them out of an
//! `anyhow::Error` when they need special handling.

use std::path::PathBuf;

/// Failure reported by (or while running) the git executable.
#[derive(Debug)]
pub enum GitError {
    /// The git process could not be spawned or waited on
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// git exited with a non-zero status
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
    /// The working directory is not inside a git repository
    NotARepository { path: PathBuf },
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::Spawn { program, source } => {
                write!(f, "Failed to execute {program}: {source}")
            }
            GitError::CommandFailed {
                command,
                exit_code,
                stderr,
            } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    write!(f, "{command} exited with status {exit_code}")
                } else {
                    write!(f, "{command} exited with status {exit_code}: {stderr}")
                }
            }
            GitError::NotARepository { path } => {
                write!(f, "Not a git repository: {}", path.display())
            }
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A status record that could not be decoded.
///
/// Any of these aborts the whole parse: a partially reconciled file list could
/// misrepresent the repository and drive the wrong staging or commit actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusParseError {
    /// Record starts with a marker other than `# 1 2 u ? !`
    UnknownMarker { marker: char, record: String },
    /// A column of the `XY` code is not a known status letter
    UnknownFileStatus { code: String },
    /// Known letters in a combination the record type cannot carry
    UnexpectedStatusCode { marker: char, code: String },
    /// Record is missing fields its marker requires
    MalformedRecord { record: String },
    /// A rename/copy record was not followed by its original path
    MissingOriginalPath { path: String },
}

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusParseError::UnknownMarker { marker, record } => {
                write!(f, "Unknown status record marker '{marker}' in {record:?}")
            }
            StatusParseError::UnknownFileStatus { code } => {
                write!(f, "Unknown file status {code:?}")
            }
            StatusParseError::UnexpectedStatusCode { marker, code } => {
                write!(f, "Unexpected status code {code:?} for '{marker}' record")
            }
            StatusParseError::MalformedRecord { record } => {
                write!(f, "Malformed status record {record:?}")
            }
            StatusParseError::MissingOriginalPath { path } => {
                write!(f, "Rename/copy record for {path:?} has no original path")
            }
        }
    }
}

impl std::error::Error for StatusParseError {}

/// Extract the exit code git reported, if the error came from a git process.
pub fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<GitError>().and_then(|e| match e {
        GitError::CommandFailed { exit_code, .. } => Some(*exit_code),
        GitError::Spawn { .. } | GitError::NotARepository { .. } => None,
    })
}

/// Check if the error means "this path is not a git repository".
pub fn is_not_a_repository(err: &anyhow::Error) -> bool {
    err.downcast_ref::<GitError>()
        .is_some_and(|e| matches!(e, GitError::NotARepository { .. }))
}
