//! `Repository::status` against real repositories.

use gitstate::git::{AheadBehind, AppFileStatus, FileChange, GitError, Repository, StatusResult};
use gitstate::git::is_not_a_repository;
use rstest::rstest;

use crate::common::{TestRepo, empty_repo, repo};

fn status(repo: &TestRepo) -> StatusResult {
    Repository::at(repo.root_path()).status().unwrap()
}

fn only_file(result: &StatusResult) -> &FileChange {
    let files = &result.working_directory.files;
    assert_eq!(files.len(), 1, "expected exactly one change: {files:#?}");
    &files[0]
}

#[rstest]
fn test_clean_repository(repo: TestRepo) {
    let result = status(&repo);

    assert!(result.exists);
    assert_eq!(result.branch.as_deref(), Some("main"));
    assert_eq!(result.tip, Some(repo.head_sha()));
    assert_eq!(result.upstream, None);
    assert_eq!(result.ahead_behind, None);
    assert!(result.working_directory.is_clean());
    assert!(result.working_directory.includes_untracked);
}

#[rstest]
fn test_repository_without_commits(empty_repo: TestRepo) {
    let result = status(&empty_repo);

    assert_eq!(result.branch.as_deref(), Some("main"));
    assert_eq!(result.tip, None);
    assert!(result.working_directory.is_clean());
}

#[rstest]
fn test_untracked_file(repo: TestRepo) {
    repo.write_file("notes.txt", "hello");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "notes.txt");
    assert_eq!(file.status, AppFileStatus::New);
    assert!(file.is_untracked());
    assert!(!file.staged);
}

#[rstest]
fn test_untracked_files_in_new_directory_are_listed_individually(repo: TestRepo) {
    repo.write_file("dir/a.txt", "a");
    repo.write_file("dir/nested/b.txt", "b");

    let result = status(&repo);
    let mut paths: Vec<_> = result
        .working_directory
        .files
        .iter()
        .map(|f| f.path.as_str())
        .collect();
    paths.sort_unstable();
    assert_eq!(paths, ["dir/a.txt", "dir/nested/b.txt"]);
}

#[rstest]
fn test_staged_new_file(repo: TestRepo) {
    repo.write_file("new.txt", "content");
    repo.git(&["add", "new.txt"]);

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.status, AppFileStatus::New);
    assert_eq!(file.status_code, "A.");
    assert!(file.staged);
    assert!(!file.is_untracked());
}

#[rstest]
fn test_unstaged_modification(repo: TestRepo) {
    repo.write_file("file.txt", "changed");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "file.txt");
    assert_eq!(file.status, AppFileStatus::Modified);
    assert_eq!(file.status_code, ".M");
    assert!(!file.staged);
    assert_eq!(result.working_directory.unstaged_files().count(), 1);
}

#[rstest]
fn test_staged_then_modified_again_is_not_staged(repo: TestRepo) {
    repo.write_file("file.txt", "first");
    repo.git(&["add", "file.txt"]);
    repo.write_file("file.txt", "second");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.status_code, "MM");
    assert_eq!(file.status, AppFileStatus::Modified);
    assert!(!file.staged);
}

#[rstest]
fn test_deleted_file(repo: TestRepo) {
    repo.remove_file("file.txt");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.status, AppFileStatus::Deleted);
    assert!(!file.staged);
}

#[rstest]
fn test_staged_delete_with_file_back_on_disk(repo: TestRepo) {
    repo.git(&["rm", "--cached", "file.txt"]);

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "file.txt");
    assert_eq!(file.status, AppFileStatus::New);
    assert!(file.is_untracked());
}

#[rstest]
fn test_added_then_deleted_is_not_reported(repo: TestRepo) {
    repo.write_file("temp.txt", "temp");
    repo.git(&["add", "temp.txt"]);
    repo.remove_file("temp.txt");

    let result = status(&repo);
    assert!(
        result.working_directory.is_clean(),
        "{:#?}",
        result.working_directory
    );
}

#[rstest]
fn test_staged_rename(repo: TestRepo) {
    repo.git(&["mv", "file.txt", "moved.txt"]);

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "moved.txt");
    assert_eq!(file.old_path.as_deref(), Some("file.txt"));
    assert_eq!(file.status, AppFileStatus::Renamed);
    assert!(file.staged);
}

#[rstest]
fn test_paths_with_spaces_and_unicode(repo: TestRepo) {
    repo.write_file("with space/naïve file.txt", "x");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "with space/naïve file.txt");
}

#[rstest]
fn test_detached_head(repo: TestRepo) {
    repo.detach_head();

    let result = status(&repo);
    assert_eq!(result.branch, None);
    assert_eq!(result.tip, Some(repo.head_sha()));
}

#[rstest]
fn test_clone_tracks_upstream(repo: TestRepo) {
    let clone = repo.clone_to("clone");

    let result = Repository::at(clone.root_path()).status().unwrap();
    assert_eq!(result.branch.as_deref(), Some("main"));
    assert_eq!(result.upstream.as_deref(), Some("origin/main"));
    assert_eq!(
        result.ahead_behind,
        Some(AheadBehind {
            ahead: 0,
            behind: 0
        })
    );

    clone.commit("Local work");
    let result = Repository::at(clone.root_path()).status().unwrap();
    assert_eq!(
        result.ahead_behind,
        Some(AheadBehind {
            ahead: 1,
            behind: 0
        })
    );
}

#[rstest]
fn test_clone_behind_after_fetch(repo: TestRepo) {
    let clone = repo.clone_to("clone");
    repo.commit("Upstream work");
    clone.git(&["fetch", "origin"]);

    let result = Repository::at(clone.root_path()).status().unwrap();
    assert_eq!(
        result.ahead_behind,
        Some(AheadBehind {
            ahead: 0,
            behind: 1
        })
    );
}

#[rstest]
fn test_merge_conflict(repo: TestRepo) {
    repo.git(&["checkout", "-b", "feature"]);
    repo.commit("feature side");
    repo.git(&["checkout", "main"]);
    repo.commit("main side");

    let merge = repo.git_command().args(["merge", "feature"]).output().unwrap();
    assert!(!merge.status.success(), "merge should conflict");

    let result = status(&repo);
    let file = only_file(&result);
    assert_eq!(file.path, "file.txt");
    assert_eq!(file.status, AppFileStatus::Conflicted);
    assert_eq!(file.status_code, "UU");
    assert!(!file.staged);
}

#[rstest]
fn test_mixed_changes_keep_git_order(repo: TestRepo) {
    repo.write_file("a-staged.txt", "a");
    repo.git(&["add", "a-staged.txt"]);
    repo.write_file("file.txt", "modified");
    repo.write_file("z-untracked.txt", "z");

    let result = status(&repo);
    let summary: Vec<_> = result
        .working_directory
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.status, f.staged))
        .collect();
    // Tracked entries come first, untracked files after
    assert_eq!(
        summary,
        [
            ("a-staged.txt", AppFileStatus::New, true),
            ("file.txt", AppFileStatus::Modified, false),
            ("z-untracked.txt", AppFileStatus::New, false),
        ]
    );
}

#[rstest]
fn test_not_a_repository(repo: TestRepo) {
    let outside = repo.scratch_dir("not-a-repo");
    let repository = Repository::at(&outside);

    let err = repository.status().unwrap_err();
    assert!(is_not_a_repository(&err), "{err:#}");
    assert!(matches!(
        err.downcast_ref::<GitError>(),
        Some(GitError::NotARepository { .. })
    ));

    let result = repository.status_if_exists().unwrap();
    assert!(!result.exists);
    assert!(result.working_directory.is_clean());
}

#[rstest]
fn test_missing_git_binary_is_spawn_error(repo: TestRepo) {
    let config = gitstate::config::GitstateConfig {
        git_binary: "gitstate-no-such-git".to_string(),
        ..Default::default()
    };
    let err = Repository::with_config(repo.root_path(), &config)
        .status()
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GitError>(),
        Some(GitError::Spawn { .. })
    ));
}
