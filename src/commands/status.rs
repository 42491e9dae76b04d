//! `gitstate status` output.
//!
//! Text output is one header line for the branch, one for the tip, then one
//! line per changed file:
//! ```text
//! On branch main tracking origin/main [ahead 2, behind 1]
//! Tip deadbeef
//! M+ some-file.txt
//! ?  notes.txt
//! ```
//! `+` marks files whose changes are fully staged.

use std::path::Path;

use anyhow::{Context, Result, bail};
use gitstate::config::GitstateConfig;
use gitstate::git::{AheadBehind, AppFileStatus, FileChange, Repository, StatusResult};
use gitstate::styling::{BRANCH, CONFLICT, HINT, STAGED, UNSTAGED, println};

use crate::cli::OutputFormat;

pub fn handle_status(path: &Path, format: OutputFormat, config: &GitstateConfig) -> Result<()> {
    let repo = Repository::with_config(path, config);
    let status = repo.status_if_exists()?;

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if !status.exists {
                bail!("Not a git repository: {}", path.display());
            }
            println!("{}", format_status(&status));
        }
    }
    Ok(())
}

pub fn format_status(status: &StatusResult) -> String {
    let mut lines = vec![format_branch_line(status)];

    lines.push(match &status.tip {
        Some(tip) => format!("Tip {HINT}{tip}{HINT:#}"),
        None => format!("{HINT}No commits yet{HINT:#}"),
    });

    if status.working_directory.is_clean() {
        lines.push(format!("{HINT}Working tree clean{HINT:#}"));
    } else {
        lines.extend(status.working_directory.files.iter().map(format_file));
    }

    lines.join("\n")
}

fn format_branch_line(status: &StatusResult) -> String {
    let mut line = match (&status.branch, &status.tip) {
        (Some(branch), _) => format!("On branch {BRANCH}{branch}{BRANCH:#}"),
        (None, Some(tip)) => {
            let short = tip.get(..7).unwrap_or(tip);
            format!("HEAD detached at {BRANCH}{short}{BRANCH:#}")
        }
        (None, None) => "Not on any branch".to_string(),
    };

    if let Some(upstream) = &status.upstream {
        line.push_str(&format!(" tracking {upstream}"));
    }
    if let Some(ahead_behind) = status.ahead_behind {
        line.push_str(&format!(" [{}]", format_ahead_behind(ahead_behind)));
    }
    line
}

fn format_ahead_behind(AheadBehind { ahead, behind }: AheadBehind) -> String {
    match (ahead, behind) {
        (0, 0) => "up to date".to_string(),
        (ahead, 0) => format!("ahead {ahead}"),
        (0, behind) => format!("behind {behind}"),
        (ahead, behind) => format!("ahead {ahead}, behind {behind}"),
    }
}

fn format_file(file: &FileChange) -> String {
    let symbol = if file.is_untracked() {
        '?'
    } else {
        file.status.symbol()
    };
    let style = match (file.status, file.staged) {
        (AppFileStatus::Conflicted, _) => CONFLICT,
        (_, true) => STAGED,
        (_, false) => UNSTAGED,
    };
    let staged_marker = if file.staged { '+' } else { ' ' };

    let mut line = format!("{style}{symbol}{style:#}{staged_marker} {}", file.path);
    if let Some(old_path) = &file.old_path {
        line.push_str(&format!(" {HINT}(from {old_path}){HINT:#}"));
    }
    line
}
