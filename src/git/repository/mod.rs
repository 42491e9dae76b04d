//! Repository - git command execution for a working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::GitstateConfig;
use crate::git::GitError;
use crate::shell_exec::Cmd;

mod status;

/// What git printed and how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<std::process::Output> for GitOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            // None means terminated by signal
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Repository handle for running git commands against one working directory.
///
/// # Examples
///
/// ```no_run
/// use gitstate::git::Repository;
///
/// let repo = Repository::at("/path/to/repo");
/// let status = repo.status()?;
/// for file in status.working_directory.staged_files() {
///     println!("{}", file.path);
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    git_binary: String,
    timeout: Option<Duration>,
    no_optional_locks: bool,
}

impl Repository {
    /// Create a repository handle at `path` with default settings.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, &GitstateConfig::default())
    }

    /// Create a repository handle for the current directory.
    pub fn current() -> Self {
        Self::at(".")
    }

    pub fn with_config(path: impl Into<PathBuf>, config: &GitstateConfig) -> Self {
        Self {
            path: path.into(),
            git_binary: config.git_binary.clone(),
            timeout: config.timeout(),
            no_optional_locks: config.no_optional_locks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run git and capture its output, whatever the exit status.
    ///
    /// Only failing to run git at all is an error here. `label` tags the
    /// command in debug logs.
    pub fn run_git(&self, args: &[&str], label: &str) -> anyhow::Result<GitOutput> {
        let mut cmd = Cmd::new(self.git_binary.as_str())
            .args(args.iter().copied())
            .current_dir(&self.path)
            .context(label)
            // Keep stderr in English so failures can be classified
            .env("LC_ALL", "C");
        if let Some(timeout) = self.timeout {
            cmd = cmd.timeout(timeout);
        }

        let output = cmd.run().map_err(|source| GitError::Spawn {
            program: self.git_binary.clone(),
            source,
        })?;
        Ok(GitOutput::from(output))
    }

    /// Run git and return stdout, turning a non-zero exit into a [`GitError`].
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        // Label by subcommand, skipping global flags like --no-optional-locks
        let label = args
            .iter()
            .copied()
            .find(|arg| !arg.starts_with('-'))
            .unwrap_or("git");
        let output = self.run_git(args, label)?;
        if output.success() {
            return Ok(output.stdout);
        }

        if output.stderr.contains("not a git repository") {
            return Err(GitError::NotARepository {
                path: self.path.clone(),
            }
            .into());
        }
        Err(GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            exit_code: output.exit_code,
            stderr: output.stderr,
        }
        .into())
    }
}
