pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod report;
pub mod validation;
pub mod workflow;

pub use error::{GuardedPushError, Result};
pub use workflow::{GuardedPush, PushOutcome, PushSettings};
