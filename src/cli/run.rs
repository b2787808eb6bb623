use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::{info, warn};

use super::context::CliContext;
use super::output::{print_report, RunReport};
use crate::driver::Pacing;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Task to hand to the agent
    #[arg(short, long)]
    pub task: String,

    /// Replay an agent transcript file instead of launching the agent
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Skip the pauses between steps
    #[arg(long)]
    pub no_pacing: bool,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext) -> Result<()> {
    if args.task.trim().is_empty() {
        warn!("Task is empty; nothing to run");
        return Ok(());
    }

    let agent = ctx.agent(args.script.as_deref()).await?;
    let mut settings = ctx.config().run_settings();
    if args.no_pacing {
        settings.pacing = Pacing::NONE;
    }

    let mut monitor = ctx.monitor(agent, settings);
    monitor.start_task(&args.task)?;
    monitor.run_to_end().await?;

    let report = RunReport::from_monitor(args.task.trim(), &monitor);
    info!(
        steps = report.steps.len(),
        failed = report.failed,
        "Run finished"
    );
    print_report(&report, ctx.output())?;
    if let Some(message) = monitor.controller().state().failure() {
        bail!("Task failed: {message}");
    }
    Ok(())
}
