use std::path::{Path, PathBuf};
use std::process::Command;

use rstest::fixture;
use tempfile::TempDir;

/// A throwaway repository with an isolated git environment.
///
/// Every git invocation goes through [`TestRepo::git_command`], which carries
/// the isolation variables, so tests never depend on the host's git config.
pub struct TestRepo {
    temp_dir: TempDir, // Keep temp_dir alive for the repo's lifetime
    root: PathBuf,
}

impl TestRepo {
    /// Create a new repository on branch `main` with no commits.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // Subdirectory so clones can live next to it
        let root = temp_dir.path().join("main");
        std::fs::create_dir(&root).expect("Failed to create main repo directory");
        // Canonicalize to resolve symlinks (important on macOS where /var is symlink to /private/var)
        let root = root
            .canonicalize()
            .expect("Failed to canonicalize temp path");

        let repo = Self { temp_dir, root };
        repo.git(&["init", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// A path inside the temp directory that is not part of any repository.
    pub fn scratch_dir(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&path).expect("Failed to create scratch directory");
        path
    }

    /// A git command rooted at this repository with isolated config.
    pub fn git_command(&self) -> Command {
        git_command_in(&self.root)
    }

    /// Run git and panic with its output if it fails.
    pub fn git(&self, args: &[&str]) -> String {
        run_checked(self.git_command().args(args), args)
    }

    /// Write `contents` to a file relative to the repo root, creating parent directories.
    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
    }

    pub fn remove_file(&self, relative: &str) {
        std::fs::remove_file(self.root.join(relative)).expect("Failed to remove file");
    }

    /// Create a commit that writes `message` to `file.txt`.
    pub fn commit(&self, message: &str) {
        self.write_file("file.txt", message);
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    pub fn head_sha(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    pub fn detach_head(&self) {
        let sha = self.head_sha();
        self.git(&["checkout", "--detach", &sha]);
    }

    /// Clone this repository next to it. The clone's `main` tracks `origin/main`.
    pub fn clone_to(&self, name: &str) -> TestClone {
        let path = self.temp_dir.path().join(name);
        let root = self.root.to_str().expect("temp path is UTF-8");
        let dest = path.to_str().expect("temp path is UTF-8");
        run_checked(
            git_command_in(self.temp_dir.path()).args(["clone", root, dest]),
            &["clone"],
        );
        let clone = TestClone {
            root: path.canonicalize().expect("Failed to canonicalize clone path"),
        };
        clone.git(&["config", "user.name", "Test User"]);
        clone.git(&["config", "user.email", "test@example.com"]);
        clone
    }
}

/// A clone of a [`TestRepo`]; lives inside the parent's temp directory.
pub struct TestClone {
    root: PathBuf,
}

impl TestClone {
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn git(&self, args: &[&str]) -> String {
        run_checked(git_command_in(&self.root).args(args), args)
    }

    pub fn commit(&self, message: &str) {
        std::fs::write(self.root.join("file.txt"), message).expect("Failed to write file");
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }
}

fn git_command_in(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir)
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_SYSTEM", "/dev/null")
        .env("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z")
        .env("GIT_COMMITTER_DATE", "2025-01-01T00:00:00Z")
        .env("LC_ALL", "C")
        .env("LANG", "C");
    cmd
}

fn run_checked(cmd: &mut Command, args: &[&str]) -> String {
    let output = cmd.output().expect("Failed to execute git");
    if !output.status.success() {
        panic!(
            "git {} failed:\nstdout: {}\nstderr: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Empty repository: branch `main`, no commits.
#[fixture]
pub fn empty_repo() -> TestRepo {
    TestRepo::new()
}

/// Repository with one commit on `main`.
#[fixture]
pub fn repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.commit("Initial commit");
    repo
}
