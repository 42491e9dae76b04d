//! Working tree status for Repository.

use anyhow::Context;

use super::Repository;
use crate::git::is_not_a_repository;
use crate::git::status::{STATUS_ARGS, StatusResult, parse_status};

impl Repository {
    /// Get branch metadata and the reconciled list of changed files.
    ///
    /// Runs `git status --untracked-files=all --branch --porcelain=2 -z`.
    /// A non-zero exit is returned as a [`GitError`](crate::git::GitError)
    /// without parsing anything; an undecodable record fails the whole call.
    pub fn status(&self) -> anyhow::Result<StatusResult> {
        let mut args = Vec::with_capacity(STATUS_ARGS.len() + 1);
        if self.no_optional_locks {
            args.push("--no-optional-locks");
        }
        args.extend_from_slice(STATUS_ARGS);

        let stdout = self.run_command(&args)?;
        let result = parse_status(&stdout).with_context(|| {
            format!("Failed to parse git status for {}", self.path.display())
        })?;

        log::debug!(
            "Status for {}: {} changed files",
            self.path.display(),
            result.working_directory.files.len()
        );
        Ok(result)
    }

    /// Like [`status`](Self::status), but a path outside any repository
    /// yields [`StatusResult::missing`] instead of an error.
    pub fn status_if_exists(&self) -> anyhow::Result<StatusResult> {
        match self.status() {
            Err(err) if is_not_a_repository(&err) => {
                log::debug!("{} is not a git repository", self.path.display());
                Ok(StatusResult::missing())
            }
            result => result,
        }
    }
}
