use crate::domain::constants::YAML_SUFFIX;
use crate::domain::error::{CpeError, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// `path` with its extension forced to `.yaml` (`modes/periodic` ->
/// `modes/periodic.yaml`).
pub fn yaml_path(path: &Path) -> PathBuf {
    path.with_extension(YAML_SUFFIX)
}

/// Read and parse `path` after suffix normalization.
pub fn read_yaml(path: &Path) -> Result<Value> {
    read_yaml_verbatim(&yaml_path(path))
}

/// Read and parse `path` as given. Empty files parse to `Value::Null`.
pub fn read_yaml_verbatim(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path).map_err(|e| CpeError::io(path, e))?;
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(&raw).map_err(|source| CpeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `*.yaml` file under `dir`, in (file-name sorted) walk order.
/// Entries the walk cannot read are logged and skipped.
pub fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                let at = e.path().unwrap_or(dir).display().to_string();
                tracing::warn!(path = %at, error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|e| e == YAML_SUFFIX)
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

pub fn write_yaml(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CpeError::io(parent, e))?;
    }
    let body = serde_yaml::to_string(value).map_err(|source| CpeError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(|e| CpeError::io(path, e))
}
