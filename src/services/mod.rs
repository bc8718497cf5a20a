//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `loader.rs` — yaml read/write with suffix normalization, `*.yaml` walks.
//! - `merge.rs` — attaches a mode document to every policy entry.
//! - `compiler.rs` — manifest-driven compilation into a staging directory.
//! - `validator.rs` — staging walk + engine validation.
//! - `executor.rs` — per-file config derivation and parallel dispatch.
//! - `engine.rs` — `PolicyEngine` trait and the `custodian` CLI adapter.
//! - `settings.rs` — environment-backed process settings.
//! - `logging.rs` — explicit logging configuration.
//! - `output.rs` — user-facing failure listings.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod compiler;
pub mod engine;
pub mod executor;
pub mod loader;
pub mod logging;
pub mod merge;
pub mod output;
pub mod settings;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;
