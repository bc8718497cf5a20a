use crate::domain::error::{CpeError, Result};
use crate::domain::models::{cache_path, CommandOptions, ExecutionConfig};
use crate::services::engine::PolicyEngine;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Dispatch `base` once per policy file, in parallel.
///
/// Each dispatch gets its own derived config (cache under
/// `.cache/{profile}/{stem}.cache`, output under `output/{profile}`). The
/// first failure is returned; other in-flight dispatches are not collected.
pub fn run(
    engine: &dyn PolicyEngine,
    base: &ExecutionConfig,
    root: &Path,
    policy_files: &[PathBuf],
) -> Result<()> {
    let handler = base.command().handler();
    let pool = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("cpe-dispatch-{i}"))
        .build()
        .map_err(|e| CpeError::Engine(format!("failed to start worker pool: {e}")))?;

    tracing::info!(
        command = %base.command(),
        policies = policy_files.len(),
        workers = pool.current_num_threads(),
        "dispatching policies"
    );

    if matches!(base.options, CommandOptions::Run(_)) {
        for cache in shared_caches(base, policy_files) {
            tracing::warn!(
                cache = %root.join(&cache).display(),
                "policy files with the same name share one cache file"
            );
        }
    }

    pool.install(|| {
        policy_files.par_iter().try_for_each(|policy| {
            let config = base.for_policy(root, policy);
            if tracing::enabled!(tracing::Level::TRACE) {
                if let Ok(rendered) = serde_yaml::to_string(&config) {
                    tracing::trace!(policy = %policy.display(), config = %rendered, "derived config");
                }
            }
            handler(engine, &config)
        })
    })
}

/// Cache paths (relative to the project root) that more than one of
/// `policy_files` would use. Caches are keyed by file stem, so
/// `team/a.yaml` and `ops/a.yaml` land on the same one.
pub fn shared_caches(base: &ExecutionConfig, policy_files: &[PathBuf]) -> Vec<PathBuf> {
    let mut uses: BTreeMap<PathBuf, usize> = BTreeMap::new();
    for policy in policy_files {
        *uses.entry(cache_path(base.profile_name(), policy)).or_default() += 1;
    }
    uses.into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(cache, _)| cache)
        .collect()
}
