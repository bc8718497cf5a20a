use crate::domain::constants::STAGING_PREFIX;
use crate::domain::models::Outcome;
use crate::services::engine::PolicyEngine;
use crate::services::{compiler, loader, validator};
use anyhow::Context;
use std::path::Path;

/// CI check: apply `mode_file` to every policy under `policy_dir` and
/// validate the results.
pub fn validate_tree(
    policy_dir: &Path,
    mode_file: &Path,
    engine: &dyn PolicyEngine,
) -> anyhow::Result<Outcome> {
    let mode = loader::read_yaml_verbatim(mode_file)
        .with_context(|| format!("failed to load mode {}", mode_file.display()))?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir()
        .context("failed to create staging directory")?;

    let staged = compiler::compile_tree(policy_dir, &mode, staging.path())
        .context("policy compilation failed")?;
    tracing::info!(staged = staged.len(), "compiled policies");

    let invalid =
        validator::find_invalid(engine, staging.path()).context("policy validation failed")?;
    Ok(if invalid.is_empty() {
        Outcome::Success
    } else {
        Outcome::InvalidPolicies(invalid)
    })
}
