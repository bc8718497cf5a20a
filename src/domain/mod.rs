//! Shared data model layer (types/constants only).
//!
//! ## Files
//! - `models.rs` — manifest, outcome and engine execution config types.
//! - `constants.rs` — project layout names and engine defaults.
//! - `error.rs` — the error taxonomy shared by every service.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//! Path derivation (cache/output locations) is pure and lives here.

pub mod constants;
pub mod error;
pub mod models;
