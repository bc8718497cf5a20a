use crate::domain::error::Result;
use crate::services::engine::PolicyEngine;
use crate::services::loader::yaml_files;
use std::path::Path;

pub fn is_valid(engine: &dyn PolicyEngine, policy_file: &Path) -> Result<bool> {
    engine.validate(policy_file)
}

/// Relative paths (against `staging_dir`) of every staged file the engine
/// rejects. All files are checked; an empty result means everything passed.
pub fn find_invalid(engine: &dyn PolicyEngine, staging_dir: &Path) -> Result<Vec<String>> {
    let mut invalid = Vec::new();
    for file in yaml_files(staging_dir) {
        if !is_valid(engine, &file)? {
            let relative = file.strip_prefix(staging_dir).unwrap_or(&file);
            invalid.push(relative.to_string_lossy().to_string());
        }
    }
    tracing::debug!(invalid = invalid.len(), "validation pass complete");
    Ok(invalid)
}
