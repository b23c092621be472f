//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! the guarded push needs, allowing the workflow to run against a real
//! repository or a recording mock.
//!
//! # Overview
//!
//! The primary abstraction is the [VersionControl] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! # Usage
//!
//! Workflow code should depend on the [VersionControl] trait rather than
//! concrete implementations.
//!
//! ```rust
//! # use guarded_push::git::VersionControl;
//! # fn example<V: VersionControl>(repo: &mut V) -> Result<(), Box<dyn std::error::Error>> {
//! let branch = repo.active_branch()?;
//! repo.fetch("origin", &branch)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Commit information read from history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The raw commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Snapshot of the working copy taken before touching the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    /// Name of the checked-out branch
    pub branch: String,
    /// Whether there are uncommitted (or, if requested, untracked) changes
    pub dirty: bool,
}

impl RepositoryState {
    /// Read the active branch and dirty status from a repository
    pub fn capture<V: VersionControl + ?Sized>(repo: &V, include_untracked: bool) -> Result<Self> {
        Ok(RepositoryState {
            branch: repo.active_branch()?,
            dirty: repo.is_dirty(include_untracked)?,
        })
    }
}

/// Version-control capabilities used by the guarded push
///
/// Query methods take `&self`; anything that changes the repository, its
/// refs, or the remote takes `&mut self`.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::GuardedPushError] variants so the workflow can report the
/// reason verbatim.
pub trait VersionControl {
    /// Commits reachable from HEAD, most recent first
    ///
    /// An unborn HEAD (no commits yet) yields an empty list.
    fn head_history(&self) -> Result<Vec<CommitInfo>>;

    /// Name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Short branch name (e.g., "main")
    /// * `Err` - If HEAD is detached or cannot be read
    fn active_branch(&self) -> Result<String>;

    /// Whether the working tree or index differs from HEAD
    ///
    /// # Arguments
    /// * `include_untracked` - Count untracked files as changes
    fn is_dirty(&self, include_untracked: bool) -> Result<bool>;

    /// Tracked files that are missing from the working tree
    fn deleted_files(&self) -> Result<Vec<String>>;

    /// Stage a path, recording its deletion if it no longer exists on disk
    fn stage(&mut self, path: &str) -> Result<()>;

    /// Commit the current index on top of HEAD
    fn commit(&mut self, message: &str) -> Result<()>;

    /// Fetch a branch from a remote, updating `<remote>/<branch>`
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    /// * `branch` - Name of the branch to fetch (e.g., "main")
    fn fetch(&mut self, remote: &str, branch: &str) -> Result<()>;

    /// Save local changes to the stash under a label
    fn stash_save(&mut self, message: &str, include_untracked: bool) -> Result<()>;

    /// Rebase the checked-out branch onto a remote-tracking ref
    ///
    /// # Arguments
    /// * `upstream` - Remote-tracking name such as "origin/main"
    ///
    /// # Returns
    /// * `Ok(())` - Rebased, or already up to date
    /// * `Err` - If the upstream is missing or a commit does not apply cleanly
    fn rebase(&mut self, upstream: &str) -> Result<()>;

    /// Push a local branch to the same name on a remote
    fn push(&mut self, remote: &str, branch: &str) -> Result<()>;

    /// Re-apply and drop the most recent stash entry
    ///
    /// If the changes do not apply cleanly the entry stays in the stash and
    /// an error is returned.
    fn stash_pop(&mut self) -> Result<()>;
}
