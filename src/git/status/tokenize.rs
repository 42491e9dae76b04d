//! Split `git status --porcelain=2 -z` output into raw records.
//!
//! Records are NUL-terminated. Field layouts by marker:
//! ```text
//! # <header>
//! 1 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <path>
//! 2 <XY> <sub> <mH> <mI> <mW> <hH> <hI> <X><score> <path>\0<origPath>
//! u <XY> <sub> <m1> <m2> <m3> <mW> <h1> <h2> <h3> <path>
//! ? <path>
//! ! <path>
//! ```
//! The path is always the last space-separated field and may itself contain
//! spaces, so every layout is split with a fixed field count.

use std::str::SplitTerminator;

use crate::git::StatusParseError;

/// One record of porcelain v2 output, borrowing from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord<'a> {
    /// `# branch.head main` carries `value = "branch.head main"`
    Header { value: &'a str },
    Entry(RawEntry<'a>),
}

/// A change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// Two-character `XY` code, or `"?"` for untracked files
    pub status_code: &'a str,
    pub path: &'a str,
    pub kind: EntryKind<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind<'a> {
    Ordinary,
    /// `score` is the `X<score>` field, e.g. `R100` or `C75`
    RenamedOrCopied { old_path: &'a str, score: &'a str },
    Unmerged,
    Untracked,
}

impl RawEntry<'_> {
    /// The record marker this entry was read from.
    pub fn marker(&self) -> char {
        match self.kind {
            EntryKind::Ordinary => '1',
            EntryKind::RenamedOrCopied { .. } => '2',
            EntryKind::Unmerged => 'u',
            EntryKind::Untracked => '?',
        }
    }

    pub fn old_path(&self) -> Option<&str> {
        match self.kind {
            EntryKind::RenamedOrCopied { old_path, .. } => Some(old_path),
            _ => None,
        }
    }
}

/// Lazily tokenize porcelain v2 output.
///
/// The iterator is single-pass and stops after the first error.
pub fn records(output: &str) -> Records<'_> {
    Records {
        tokens: output.split_terminator('\0'),
        failed: false,
    }
}

pub struct Records<'a> {
    tokens: SplitTerminator<'a, char>,
    failed: bool,
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RawRecord<'a>, StatusParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let token = self.tokens.next()?;
            let result = match token.chars().next() {
                // Ignored entries never surface as changes
                Some('!') => continue,
                Some('#') => Ok(RawRecord::Header {
                    value: token.strip_prefix("# ").unwrap_or(&token[1..]),
                }),
                Some('1') => parse_ordinary(token),
                Some('2') => parse_renamed_or_copied(token, &mut self.tokens),
                Some('u') => parse_unmerged(token),
                Some('?') => parse_untracked(token),
                Some(marker) => Err(StatusParseError::UnknownMarker {
                    marker,
                    record: token.to_string(),
                }),
                None => Err(malformed(token)),
            };
            if result.is_err() {
                self.failed = true;
            }
            return Some(result);
        }
    }
}

fn parse_ordinary(token: &str) -> Result<RawRecord<'_>, StatusParseError> {
    let [_, status_code, _sub, _mh, _mi, _mw, _hh, _hi, path] =
        split_fields::<9>(token).ok_or_else(|| malformed(token))?;
    Ok(RawRecord::Entry(RawEntry {
        status_code,
        path,
        kind: EntryKind::Ordinary,
    }))
}

/// Type-2 records carry the original path in the following NUL token.
fn parse_renamed_or_copied<'a>(
    token: &'a str,
    tokens: &mut SplitTerminator<'a, char>,
) -> Result<RawRecord<'a>, StatusParseError> {
    let [_, status_code, _sub, _mh, _mi, _mw, _hh, _hi, score, path] =
        split_fields::<10>(token).ok_or_else(|| malformed(token))?;
    let old_path = tokens
        .next()
        .filter(|old_path| !old_path.is_empty())
        .ok_or_else(|| StatusParseError::MissingOriginalPath {
            path: path.to_string(),
        })?;
    Ok(RawRecord::Entry(RawEntry {
        status_code,
        path,
        kind: EntryKind::RenamedOrCopied { old_path, score },
    }))
}

fn parse_unmerged(token: &str) -> Result<RawRecord<'_>, StatusParseError> {
    let [_, status_code, _sub, _m1, _m2, _m3, _mw, _h1, _h2, _h3, path] =
        split_fields::<11>(token).ok_or_else(|| malformed(token))?;
    Ok(RawRecord::Entry(RawEntry {
        status_code,
        path,
        kind: EntryKind::Unmerged,
    }))
}

fn parse_untracked(token: &str) -> Result<RawRecord<'_>, StatusParseError> {
    let path = token
        .strip_prefix("? ")
        .filter(|path| !path.is_empty())
        .ok_or_else(|| malformed(token))?;
    Ok(RawRecord::Entry(RawEntry {
        status_code: "?",
        path,
        kind: EntryKind::Untracked,
    }))
}

/// Split into exactly `N` space-separated fields; the last one keeps any spaces.
fn split_fields<const N: usize>(token: &str) -> Option<[&str; N]> {
    let mut parts = token.splitn(N, ' ');
    let mut fields = [""; N];
    for field in &mut fields {
        *field = parts.next()?;
    }
    Some(fields).filter(|fields| !fields[N - 1].is_empty())
}

fn malformed(token: &str) -> StatusParseError {
    StatusParseError::MalformedRecord {
        record: token.to_string(),
    }
}
