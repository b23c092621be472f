use std::fmt;

use crate::error::GuardedPushError;
use crate::validation::Violation;

/// Steps of a guarded push that can stop the run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStep {
    Validate,
    ReadState,
    Fetch,
    Stash,
    Rebase,
    Push,
}

impl PushStep {
    pub fn name(&self) -> &'static str {
        match self {
            PushStep::Validate => "validate",
            PushStep::ReadState => "read repository state",
            PushStep::Fetch => "fetch",
            PushStep::Stash => "stash",
            PushStep::Rebase => "rebase",
            PushStep::Push => "push",
        }
    }
}

impl fmt::Display for PushStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to local changes that were set aside for the rebase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StashState {
    /// Working tree was clean; nothing was stashed
    NotNeeded,
    /// Changes were stashed and re-applied after the push
    Restored,
    /// Re-applying failed; the stash entry is left for manual recovery
    LeftInStash { reason: String },
}

/// Result of one guarded push run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// A commit failed validation; the remote was never contacted
    Rejected { violation: Violation },
    /// A git operation failed at `step`
    Failed { step: PushStep, reason: String },
    /// The branch was pushed
    Pushed { stash: StashState },
}

impl PushOutcome {
    /// Whether the branch reached the remote
    pub fn is_pushed(&self) -> bool {
        matches!(self, PushOutcome::Pushed { .. })
    }
}

/// A fatal error tagged with the step that produced it
#[derive(Debug)]
pub(crate) struct StepFailure {
    pub step: PushStep,
    pub error: GuardedPushError,
}

/// Tag an error with the step it came from, for use with `map_err`
pub(crate) fn at(step: PushStep) -> impl FnOnce(GuardedPushError) -> StepFailure {
    move |error| StepFailure { step, error }
}
