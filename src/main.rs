use anyhow::Context;
use clap::Parser;
use cpe::cli::Cli;
use cpe::commands::{finish, run_pipeline};
use cpe::services::engine::CustodianCli;
use cpe::services::logging::LogConfig;
use cpe::services::settings::Settings;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_env()?;
    LogConfig::from_level(&settings.log_level)?.init()?;

    let root = std::env::current_dir().context("failed to resolve project directory")?;
    let engine = CustodianCli::new(&settings.engine_bin);
    let outcome = run_pipeline(&root, cli.c7n_cmd, &settings, &engine)?;
    finish(&outcome)
}
