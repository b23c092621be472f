//! Commit message validation
//!
//! - `rules` - checks over a single message
//! - `gate` - applies the rules to every commit reachable from HEAD

pub mod gate;
pub mod rules;

pub use gate::{first_violation, validate_all, Violation};
pub use rules::{
    check_message, is_conventional, is_signed_off, validate_single, ValidationFailure,
    ValidationResult,
};
