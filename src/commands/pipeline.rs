use crate::cli::EngineCommand;
use crate::domain::constants::{MODE_DIR, POLICY_DIR, POLICY_MODE_FILE, STAGING_PREFIX};
use crate::domain::models::Outcome;
use crate::services::engine::PolicyEngine;
use crate::services::loader::yaml_files;
use crate::services::settings::Settings;
use crate::services::{compiler, executor, validator};
use anyhow::Context;
use std::path::Path;

/// Compile, validate, then optionally dispatch `command`.
///
/// Validation always runs. Nothing is dispatched if any staged file is
/// invalid. The staging directory is removed when this returns, on every
/// path.
pub fn run_pipeline(
    root: &Path,
    command: Option<EngineCommand>,
    settings: &Settings,
    engine: &dyn PolicyEngine,
) -> anyhow::Result<Outcome> {
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir()
        .context("failed to create staging directory")?;
    tracing::debug!(staging = %staging.path().display(), "staging policies");

    let staged = compiler::compile(
        &root.join(POLICY_MODE_FILE),
        &root.join(MODE_DIR),
        &root.join(POLICY_DIR),
        staging.path(),
    )
    .context("policy compilation failed")?;
    tracing::info!(staged = staged.len(), "compiled policies");

    let invalid =
        validator::find_invalid(engine, staging.path()).context("policy validation failed")?;
    if !invalid.is_empty() {
        return Ok(Outcome::InvalidPolicies(invalid));
    }

    if let Some(command) = command {
        let files = yaml_files(staging.path());
        executor::run(engine, &settings.execution_config(command), root, &files)
            .with_context(|| format!("c7n {command} failed"))?;
    }
    Ok(Outcome::Success)
}
