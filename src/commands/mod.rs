//! Command handler layer.
//!
//! ## Files
//! - `pipeline.rs` — compile → validate → optional engine dispatch (`cpe`).
//! - `validate_tree.rs` — single-mode CI validation (`cpe-validate`).
//!
//! ## Principles
//! - Orchestrate here, delegate behavior to `services/*`.
//! - Return an `Outcome`; binaries decide how it is printed.

pub mod pipeline;
pub mod validate_tree;

pub use pipeline::run_pipeline;
pub use validate_tree::validate_tree;

use crate::domain::models::Outcome;
use crate::services::output::print_invalid;
use std::process::ExitCode;

/// Print the failure listing (if any) and pick the exit code.
pub fn finish(outcome: &Outcome) -> anyhow::Result<ExitCode> {
    match outcome {
        Outcome::Success => Ok(ExitCode::SUCCESS),
        Outcome::InvalidPolicies(invalid) => {
            print_invalid(invalid)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
