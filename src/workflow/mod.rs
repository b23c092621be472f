//! Guarded push orchestration
//!
//! One linear run per invocation:
//!
//! 1. Commit files that were deleted on disk but are still tracked
//! 2. Validate every commit reachable from HEAD (hard gate)
//! 3. Read the branch and dirty status
//! 4. Fetch `<remote>/<branch>`
//! 5. Stash local changes if the tree is dirty
//! 6. Rebase onto `<remote>/<branch>`
//! 7. Push
//! 8. Re-apply the stash if one was made
//!
//! Steps 1 and 8 tolerate failures. Everything else stops the run at the
//! failing step. Nothing is rolled back. The run itself never returns an
//! error: every branch is logged and summarised in a [PushOutcome].

pub mod outcome;

pub use outcome::{PushOutcome, PushStep, StashState};

use crate::config::{Config, DeletionsConfig};
use crate::error::Result;
use crate::git::{RepositoryState, VersionControl};
use crate::logging::{Logger, STATUS_FAILED, STATUS_OK};
use crate::validation::first_violation;

use self::outcome::{at, StepFailure};

/// Settings for a guarded push run
#[derive(Debug, Clone, PartialEq)]
pub struct PushSettings {
    /// Remote to fetch from and push to
    pub remote: String,
    /// Label for the automatic stash entry
    pub stash_message: String,
    /// Whether untracked files count as dirty and are stashed
    pub include_untracked: bool,
    /// Commit template for deleted files
    pub deletions: DeletionsConfig,
}

impl From<&Config> for PushSettings {
    fn from(config: &Config) -> Self {
        PushSettings {
            remote: config.remote.name.clone(),
            stash_message: config.stash.message.clone(),
            include_untracked: config.stash.include_untracked,
            deletions: config.deletions.clone(),
        }
    }
}

impl Default for PushSettings {
    fn default() -> Self {
        PushSettings::from(&Config::default())
    }
}

/// Validates history and pushes the current branch
pub struct GuardedPush<V, L> {
    vcs: V,
    logger: L,
    settings: PushSettings,
}

impl<V: VersionControl, L: Logger> GuardedPush<V, L> {
    pub fn new(vcs: V, logger: L, settings: PushSettings) -> Self {
        GuardedPush {
            vcs,
            logger,
            settings,
        }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Give back the repository once the run is over
    pub fn into_vcs(self) -> V {
        self.vcs
    }

    /// Run the whole workflow once.
    pub fn run(&mut self) -> PushOutcome {
        self.handle_deletions();

        self.logger.debug("Validating commit messages");
        match first_violation(&self.vcs) {
            Ok(None) => {
                self.logger
                    .info("Commit messages are signed off and conventional", STATUS_OK);
            }
            Ok(Some(violation)) => {
                self.logger.error_with_reason(
                    "Commit message validation failed. Aborting push.",
                    STATUS_FAILED,
                    &format!(
                        "{} \"{}\": {}",
                        violation.short_hash(),
                        violation.header,
                        violation.failure
                    ),
                );
                return PushOutcome::Rejected { violation };
            }
            Err(error) => {
                return self.fail(StepFailure {
                    step: PushStep::Validate,
                    error,
                })
            }
        }

        match self.sync_and_push() {
            Ok(stash) => {
                self.logger
                    .info("Pushed changes to remote repository", STATUS_OK);
                PushOutcome::Pushed { stash }
            }
            Err(failure) => self.fail(failure),
        }
    }

    /// Stage and commit every tracked file that is missing on disk.
    ///
    /// Failures are logged per file and never stop the run.
    fn handle_deletions(&mut self) {
        let deleted = match self.vcs.deleted_files() {
            Ok(files) => files,
            Err(e) => {
                self.logger.error_with_reason(
                    "Failed to list deleted files",
                    STATUS_FAILED,
                    &e.to_string(),
                );
                return;
            }
        };

        for file in deleted {
            let message = self.settings.deletions.message_for(&file);
            match self.commit_deletion(&file, &message) {
                Ok(()) => self.logger.debug(&format!("Committed deletion of {}", file)),
                Err(e) => self.logger.error_with_reason(
                    &format!("Failed to handle deletion for {}", file),
                    STATUS_FAILED,
                    &e.to_string(),
                ),
            }
        }
    }

    fn commit_deletion(&mut self, file: &str, message: &str) -> Result<()> {
        self.vcs.stage(file)?;
        self.vcs.commit(message)
    }

    fn sync_and_push(&mut self) -> std::result::Result<StashState, StepFailure> {
        let state = RepositoryState::capture(&self.vcs, self.settings.include_untracked)
            .map_err(at(PushStep::ReadState))?;
        let remote = self.settings.remote.as_str();
        let upstream = format!("{}/{}", remote, state.branch);

        self.logger.debug(&format!("Fetching {}", upstream));
        self.vcs
            .fetch(remote, &state.branch)
            .map_err(at(PushStep::Fetch))?;

        if state.dirty {
            self.logger.debug("Stashing local changes before rebase");
            self.vcs
                .stash_save(&self.settings.stash_message, self.settings.include_untracked)
                .map_err(at(PushStep::Stash))?;
        }

        self.logger.debug(&format!("Rebasing {} onto {}", state.branch, upstream));
        self.vcs.rebase(&upstream).map_err(at(PushStep::Rebase))?;

        self.logger.debug(&format!("Pushing {} to {}", state.branch, remote));
        self.vcs
            .push(remote, &state.branch)
            .map_err(at(PushStep::Push))?;

        if !state.dirty {
            return Ok(StashState::NotNeeded);
        }

        // The push already landed, so a failed pop is reported but not fatal
        match self.vcs.stash_pop() {
            Ok(()) => {
                self.logger.debug("Restored stashed changes");
                Ok(StashState::Restored)
            }
            Err(e) => {
                let reason = e.to_string();
                self.logger.error_with_reason(
                    "Failed to apply stashed changes",
                    STATUS_FAILED,
                    &reason,
                );
                Ok(StashState::LeftInStash { reason })
            }
        }
    }

    fn fail(&self, failure: StepFailure) -> PushOutcome {
        let reason = failure.error.to_string();
        self.logger.error_with_reason(
            "Failed to push changes to remote repository",
            STATUS_FAILED,
            &format!("{}: {}", failure.step, reason),
        );
        PushOutcome::Failed {
            step: failure.step,
            reason,
        }
    }
}
