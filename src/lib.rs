pub mod config;
pub mod git;
pub mod shell_exec;
pub mod styling;

pub use git::{Repository, StatusResult, parse_status};
