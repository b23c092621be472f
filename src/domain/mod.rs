//! Domain logic - pure types independent of git operations

pub mod commit;

pub use commit::CommitMessage;
