//! Branch metadata from `# branch.*` header records.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static AHEAD_BEHIND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d+) -(\d+)$").expect("valid ahead/behind pattern"));

/// Emitted by git in place of a branch name when HEAD is detached.
const DETACHED_HEAD: &str = "(detached)";
/// `branch.oid` payload in a repository without commits.
const INITIAL_COMMIT: &str = "(initial)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AheadBehind {
    pub ahead: usize,
    pub behind: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchState {
    pub branch: Option<String>,
    pub upstream: Option<String>,
    /// Commit id HEAD points at; unset before the first commit
    pub tip: Option<String>,
    pub ahead_behind: Option<AheadBehind>,
}

impl BranchState {
    /// Fold one header value (the text after `# `) into the state.
    ///
    /// Unknown keys are ignored. Malformed values leave their field unset;
    /// branch metadata is advisory, unlike file changes.
    pub fn apply_header(&mut self, value: &str) {
        let (key, payload) = value.split_once(' ').unwrap_or((value, ""));
        match key {
            "branch.oid" => {
                if is_object_id(payload) {
                    self.tip = Some(payload.to_string());
                } else if payload != INITIAL_COMMIT {
                    log::debug!("Ignoring non-hex branch.oid header: {payload:?}");
                }
            }
            "branch.head" => {
                if !payload.is_empty() && payload != DETACHED_HEAD {
                    self.branch = Some(payload.to_string());
                }
            }
            "branch.upstream" => {
                if !payload.is_empty() {
                    self.upstream = Some(payload.to_string());
                }
            }
            "branch.ab" => match parse_ahead_behind(payload) {
                Some(ahead_behind) => self.ahead_behind = Some(ahead_behind),
                None => log::debug!("Ignoring malformed branch.ab header: {payload:?}"),
            },
            _ => log::trace!("Ignoring status header: {value:?}"),
        }
    }
}

fn is_object_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Parse `+<ahead> -<behind>`; both counts or nothing.
fn parse_ahead_behind(payload: &str) -> Option<AheadBehind> {
    let captures = AHEAD_BEHIND.captures(payload)?;
    let ahead = captures[1].parse().ok()?;
    let behind = captures[2].parse().ok()?;
    Some(AheadBehind { ahead, behind })
}
