//! Adapter for the external policy engine (Cloud Custodian).
//!
//! The engine is only ever reached through [`PolicyEngine`]; the CLI
//! implementation shells out to the `custodian` executable.

use crate::cli::EngineCommand;
use crate::domain::error::{CpeError, Result};
use crate::domain::models::{CommandOptions, ExecutionConfig};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait PolicyEngine: Send + Sync {
    /// `Ok(false)` when the engine rejects the file; `Err` only when the
    /// engine could not be consulted at all.
    fn validate(&self, policy_file: &Path) -> Result<bool>;
    fn run(&self, config: &ExecutionConfig) -> Result<()>;
    fn report(&self, config: &ExecutionConfig) -> Result<()>;
}

pub type Handler = fn(&dyn PolicyEngine, &ExecutionConfig) -> Result<()>;

fn run_handler(engine: &dyn PolicyEngine, config: &ExecutionConfig) -> Result<()> {
    engine.run(config)
}

fn report_handler(engine: &dyn PolicyEngine, config: &ExecutionConfig) -> Result<()> {
    engine.report(config)
}

impl EngineCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineCommand::Run => "run",
            EngineCommand::Report => "report",
        }
    }

    pub fn handler(self) -> Handler {
        match self {
            EngineCommand::Run => run_handler,
            EngineCommand::Report => report_handler,
        }
    }
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CustodianCli {
    program: PathBuf,
}

impl CustodianCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn dispatch(&self, config: &ExecutionConfig) -> Result<()> {
        let command = config.command();
        let policy = config.base.configs.first().cloned().unwrap_or_default();
        tracing::info!(command = %command, policy = %policy.display(), "dispatching to engine");
        let status = Command::new(&self.program)
            .args(engine_args(config))
            .status()
            .map_err(|e| {
                CpeError::Engine(format!("failed to launch {}: {e}", self.program.display()))
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(CpeError::Execution {
                command: command.to_string(),
                policy,
                reason: format!("engine exited with {status}"),
            })
        }
    }
}

impl PolicyEngine for CustodianCli {
    fn validate(&self, policy_file: &Path) -> Result<bool> {
        let target = std::fs::canonicalize(policy_file).map_err(|e| CpeError::io(policy_file, e))?;
        let output = Command::new(&self.program)
            .arg("validate")
            .arg(&target)
            .output()
            .map_err(|e| {
                CpeError::Engine(format!("failed to launch {}: {e}", self.program.display()))
            })?;
        match output.status.code() {
            Some(0) => {
                tracing::debug!(policy = %target.display(), "validated policy");
                Ok(true)
            }
            Some(code) => {
                tracing::debug!(
                    policy = %target.display(),
                    code,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "invalid policy"
                );
                Ok(false)
            }
            None => Err(CpeError::Engine(format!(
                "validation of {} was terminated by a signal",
                target.display()
            ))),
        }
    }

    fn run(&self, config: &ExecutionConfig) -> Result<()> {
        self.dispatch(config)
    }

    fn report(&self, config: &ExecutionConfig) -> Result<()> {
        self.dispatch(config)
    }
}

fn push_flag(args: &mut Vec<OsString>, flag: &str, value: impl AsRef<OsStr>) {
    args.push(OsString::from(flag));
    args.push(value.as_ref().to_os_string());
}

/// Command line for `custodian <run|report>` derived from `config`.
pub fn engine_args(config: &ExecutionConfig) -> Vec<OsString> {
    let base = &config.base;
    let mut args = vec![OsString::from(config.command().as_str())];
    push_flag(&mut args, "-s", &base.output_dir);
    if let Some(profile) = &base.profile {
        push_flag(&mut args, "--profile", profile);
    }
    for region in &base.regions {
        push_flag(&mut args, "-r", region);
    }
    for filter in &base.policy_filters {
        push_flag(&mut args, "-p", filter);
    }
    for resource in &base.resource_types {
        push_flag(&mut args, "-t", resource);
    }
    if base.debug {
        args.push("--debug".into());
    }

    match &config.options {
        CommandOptions::Run(run) => {
            if let Some(cache) = &base.cache {
                push_flag(&mut args, "--cache", cache);
            }
            push_flag(&mut args, "--cache-period", base.cache_period.to_string());
            if run.dryrun {
                args.push("--dryrun".into());
            }
            if run.skip_validation {
                args.push("--skip-validation".into());
            }
        }
        CommandOptions::Report(report) => {
            push_flag(&mut args, "--days", report.days.to_string());
            push_flag(&mut args, "--format", &report.format);
            for field in &report.fields {
                push_flag(&mut args, "--field", field);
            }
            if report.no_default_fields {
                args.push("--no-default-fields".into());
            }
        }
    }

    args.extend(base.configs.iter().map(|c| c.as_os_str().to_os_string()));
    args
}
