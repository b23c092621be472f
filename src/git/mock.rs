use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::{GuardedPushError, Result};
use crate::git::{CommitInfo, VersionControl};

/// Operation names used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    History,
    ActiveBranch,
    IsDirty,
    DeletedFiles,
    Stage,
    Commit,
    Fetch,
    StashSave,
    Rebase,
    Push,
    StashPop,
}

/// A recorded call against the mock, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    History,
    ActiveBranch,
    IsDirty { include_untracked: bool },
    DeletedFiles,
    Stage(String),
    Commit(String),
    Fetch { remote: String, branch: String },
    StashSave { message: String, include_untracked: bool },
    Rebase(String),
    Push { remote: String, branch: String },
    StashPop,
}

impl Call {
    /// The operation this call belongs to
    pub fn operation(&self) -> Operation {
        match self {
            Call::History => Operation::History,
            Call::ActiveBranch => Operation::ActiveBranch,
            Call::IsDirty { .. } => Operation::IsDirty,
            Call::DeletedFiles => Operation::DeletedFiles,
            Call::Stage(_) => Operation::Stage,
            Call::Commit(_) => Operation::Commit,
            Call::Fetch { .. } => Operation::Fetch,
            Call::StashSave { .. } => Operation::StashSave,
            Call::Rebase(_) => Operation::Rebase,
            Call::Push { .. } => Operation::Push,
            Call::StashPop => Operation::StashPop,
        }
    }
}

/// Mock repository for testing without actual git operations
///
/// Every trait call is recorded in order. Commits created through
/// [VersionControl::commit] are prepended to the history so later
/// validation sees them.
pub struct MockRepository {
    history: Vec<CommitInfo>,
    branch: String,
    dirty: bool,
    untracked: bool,
    deleted: Vec<String>,
    failures: HashMap<Operation, String>,
    failing_paths: HashSet<String>,
    calls: RefCell<Vec<Call>>,
}

impl MockRepository {
    /// Create a clean mock repository on `main` with no history
    pub fn new() -> Self {
        MockRepository {
            history: Vec::new(),
            branch: "main".to_string(),
            dirty: false,
            untracked: false,
            deleted: Vec::new(),
            failures: HashMap::new(),
            failing_paths: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Set the history, most recent commit first
    pub fn with_history(mut self, history: Vec<CommitInfo>) -> Self {
        self.history = history;
        self
    }

    /// Set the checked-out branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Mark tracked changes as present
    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    /// Mark untracked files as present
    pub fn with_untracked(mut self, untracked: bool) -> Self {
        self.untracked = untracked;
        self
    }

    /// Set the tracked files missing from disk
    pub fn with_deleted_files(mut self, files: &[&str]) -> Self {
        self.deleted = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Make every call to `operation` fail with `reason`
    pub fn fail_on(mut self, operation: Operation, reason: impl Into<String>) -> Self {
        self.failures.insert(operation, reason.into());
        self
    }

    /// Make staging this specific path fail
    pub fn fail_stage_for(mut self, path: impl Into<String>) -> Self {
        self.failing_paths.insert(path.into());
        self
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded calls for a single operation
    pub fn calls_to(&self, operation: Operation) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.operation() == operation)
            .cloned()
            .collect()
    }

    /// Position of the first recorded call to `operation`
    pub fn position_of(&self, operation: Operation) -> Option<usize> {
        self.calls
            .borrow()
            .iter()
            .position(|call| call.operation() == operation)
    }

    /// Current history, most recent first
    pub fn history(&self) -> &[CommitInfo] {
        &self.history
    }

    fn record(&self, call: Call) -> Result<()> {
        let operation = call.operation();
        self.calls.borrow_mut().push(call);

        match self.failures.get(&operation) {
            Some(reason) => Err(GuardedPushError::Git(git2::Error::from_str(reason))),
            None => Ok(()),
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockRepository {
    fn head_history(&self) -> Result<Vec<CommitInfo>> {
        self.record(Call::History)?;
        Ok(self.history.clone())
    }

    fn active_branch(&self) -> Result<String> {
        self.record(Call::ActiveBranch)?;
        Ok(self.branch.clone())
    }

    fn is_dirty(&self, include_untracked: bool) -> Result<bool> {
        self.record(Call::IsDirty { include_untracked })?;
        Ok(self.dirty || (include_untracked && self.untracked))
    }

    fn deleted_files(&self) -> Result<Vec<String>> {
        self.record(Call::DeletedFiles)?;
        Ok(self.deleted.clone())
    }

    fn stage(&mut self, path: &str) -> Result<()> {
        self.record(Call::Stage(path.to_string()))?;
        if self.failing_paths.contains(path) {
            return Err(GuardedPushError::Git(git2::Error::from_str(&format!(
                "pathspec '{}' did not match any files",
                path
            ))));
        }
        self.deleted.retain(|deleted| deleted != path);
        Ok(())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.record(Call::Commit(message.to_string()))?;
        let hash = format!("{:040x}", self.history.len() + 1);
        self.history.insert(
            0,
            CommitInfo {
                hash,
                message: message.to_string(),
                author: "Mock Author".to_string(),
            },
        );
        Ok(())
    }

    fn fetch(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.record(Call::Fetch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    fn stash_save(&mut self, message: &str, include_untracked: bool) -> Result<()> {
        self.record(Call::StashSave {
            message: message.to_string(),
            include_untracked,
        })
    }

    fn rebase(&mut self, upstream: &str) -> Result<()> {
        self.record(Call::Rebase(upstream.to_string()))
    }

    fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.record(Call::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }

    fn stash_pop(&mut self) -> Result<()> {
        self.record(Call::StashPop)
    }
}
