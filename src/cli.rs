use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::domain::constants::{CI_MODE_FILE, CI_POLICY_DIR};

#[derive(Parser, Debug)]
#[command(
    name = "cpe",
    version,
    about = "Cloud Policy Enforcement: a workflow manager wrapping Cloud Custodian.",
    after_help = "Policies are always validated, even when no c7n command is specified.",
    infer_long_args = false
)]
pub struct Cli {
    #[arg(
        short = 'x',
        long = "c7n-cmd",
        value_enum,
        help = "Cloud Custodian command to execute"
    )]
    pub c7n_cmd: Option<EngineCommand>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineCommand {
    Run,
    /// Not verified against a live engine; dispatched best-effort.
    Report,
}

#[derive(Parser, Debug)]
#[command(
    name = "cpe-validate",
    version,
    about = "Apply one mode to every policy file and validate the result."
)]
pub struct ValidateCli {
    #[arg(long, default_value = CI_POLICY_DIR, help = "Directory scanned recursively for *.yaml policies")]
    pub policy_dir: PathBuf,
    #[arg(long, default_value = CI_MODE_FILE, help = "Mode file applied to every policy")]
    pub mode_file: PathBuf,
}
