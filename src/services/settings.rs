use crate::cli::EngineCommand;
use crate::domain::constants::DEFAULT_ENGINE_BIN;
use crate::domain::error::{CpeError, Result};
use crate::domain::models::{ExecutionConfig, ReportOptions, RunOptions};
use std::path::PathBuf;

pub const ENV_LOGLEVEL: &str = "CPE_LOGLEVEL";
pub const ENV_DRYRUN: &str = "CPE_DRYRUN";
pub const ENV_PROFILE: &str = "AWS_PROFILE";
pub const ENV_ENGINE: &str = "CPE_CUSTODIAN";

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub dryrun: bool,
    pub profile: Option<String>,
    pub engine_bin: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let dryrun = match lookup(ENV_DRYRUN) {
            None => true,
            Some(raw) => {
                let n: i64 = raw.trim().parse().map_err(|_| {
                    CpeError::Config(format!("{ENV_DRYRUN} must be an integer, got `{raw}`"))
                })?;
                n != 0
            }
        };
        Ok(Self {
            log_level: lookup(ENV_LOGLEVEL).unwrap_or_else(|| "warning".to_string()),
            dryrun,
            profile: lookup(ENV_PROFILE).filter(|p| !p.is_empty()),
            engine_bin: lookup(ENV_ENGINE)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE_BIN)),
        })
    }

    /// Base engine config for `command` before per-file derivation.
    pub fn execution_config(&self, command: EngineCommand) -> ExecutionConfig {
        let config = match command {
            EngineCommand::Run => ExecutionConfig::run(RunOptions {
                dryrun: self.dryrun,
                ..RunOptions::default()
            }),
            EngineCommand::Report => ExecutionConfig::report(ReportOptions::default()),
        };
        config.with_profile(self.profile.clone())
    }
}
