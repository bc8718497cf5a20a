use clap::Parser;
use cpe::cli::ValidateCli;
use cpe::commands::{finish, validate_tree};
use cpe::services::engine::CustodianCli;
use cpe::services::logging::LogConfig;
use cpe::services::settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = ValidateCli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &ValidateCli) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_env()?;
    LogConfig::from_level(&settings.log_level)?.init()?;

    let engine = CustodianCli::new(&settings.engine_bin);
    let outcome = validate_tree(&cli.policy_dir, &cli.mode_file, &engine)?;
    finish(&outcome)
}
