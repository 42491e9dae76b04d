//! Git operations and repository management

mod diff;
mod error;
mod repository;
pub mod status;

pub use diff::{DiffSelection, DiffSelectionType};
pub use error::{GitError, StatusParseError, exit_code, is_not_a_repository};
pub use repository::{GitOutput, Repository};
pub use status::{
    AheadBehind, AppFileStatus, BranchState, FileChange, StatusResult, WorkingDirectoryState,
    parse_status,
};
