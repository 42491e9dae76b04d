//! Styling for terminal output.
//!
//! Uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//!
//! Styles are used inline as `{STYLE}text{STYLE:#}`.

use anstyle::{AnsiColor, Color, Style};

/// Auto-detecting println that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::println;

/// Auto-detecting eprintln that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::eprintln;

/// Error style (red)
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Hint style (dimmed)
pub const HINT: Style = Style::new().dimmed();

/// Branch name style (magenta + bold)
pub const BRANCH: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Magenta)));

/// Staged changes (green)
pub const STAGED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// Unstaged changes (red)
pub const UNSTAGED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Conflicts (yellow + bold)
pub const CONFLICT: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Error emoji - use with ERROR style: `eprintln!("{ERROR_EMOJI} {ERROR}message{ERROR:#}");`
pub const ERROR_EMOJI: &str = "❌";

/// Remove ANSI escapes, for comparing styled output in tests and logs.
pub fn strip_ansi(text: &str) -> String {
    anstream::adapter::strip_str(text).to_string()
}
