use super::run::cmd_run;
use super::watch::cmd_watch;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(command: Commands, ctx: &CliContext) -> Result<()> {
    match command {
        Commands::Watch(args) => cmd_watch(args, ctx).await,
        Commands::Run(args) => cmd_run(args, ctx).await,
    }
}
