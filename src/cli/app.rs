use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{
    default_log_file, init_logging, load_config, load_env_file, LoadedConfig, LogSink, ENV_FILE,
};

pub async fn run() -> Result<()> {
    let env_result = load_env_file(Path::new(ENV_FILE));
    let cli = CliArgs::parse();
    let command = cli.command.clone().unwrap_or_default();

    let LoadedConfig {
        mut config,
        path,
        found,
    } = load_config(cli.config.as_ref()).await?;
    config.apply_env_overrides();

    // The interactive monitor owns the terminal, so its logs go to a file.
    let sink = if command.is_interactive() {
        LogSink::File(config.log_file.clone().unwrap_or_else(default_log_file))
    } else {
        LogSink::Stderr
    };
    let _log_guard = init_logging(&cli.log_level, cli.debug, &sink)?;

    info!(
        "Starting hopwatch v{} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_DATE")
    );
    match env_result {
        Ok(0) => {}
        Ok(applied) => info!(applied, path = ENV_FILE, "Loaded environment overrides"),
        Err(err) => warn!(%err, "Failed to load environment overrides"),
    }
    if found {
        info!(path = %path.display(), "Loaded configuration");
    } else {
        info!(path = %path.display(), "No configuration file; using defaults");
    }

    let ctx = CliContext::new(config, path, cli.output.clone());
    match dispatch(command, &ctx).await {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
