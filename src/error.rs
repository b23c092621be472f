use thiserror::Error;

/// Unified error type for guarded-push operations
#[derive(Error, Debug)]
pub enum GuardedPushError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Branch error: {0}")]
    Branch(String),

    #[error("Rebase failed: {0}")]
    Rebase(String),

    #[error("Stash operation failed: {0}")]
    Stash(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in guarded-push
pub type Result<T> = std::result::Result<T, GuardedPushError>;

impl GuardedPushError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GuardedPushError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GuardedPushError::Remote(msg.into())
    }

    /// Create a branch error with context
    pub fn branch(msg: impl Into<String>) -> Self {
        GuardedPushError::Branch(msg.into())
    }

    /// Create a rebase error with context
    pub fn rebase(msg: impl Into<String>) -> Self {
        GuardedPushError::Rebase(msg.into())
    }

    /// Create a stash error with context
    pub fn stash(msg: impl Into<String>) -> Self {
        GuardedPushError::Stash(msg.into())
    }
}
