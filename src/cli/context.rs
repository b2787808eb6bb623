use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use hopwatch_agent_bridge::{BrowsingAgent, CommandAgent, ScriptedAgent};
use tracing::info;

use super::output::OutputFormat;
use crate::config::Config;
use crate::driver::RunSettings;
use crate::errors::HopwatchError;
use crate::monitor::HopMonitor;

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> &OutputFormat {
        &self.output
    }

    /// Agent for this invocation: a scripted transcript when `script` is
    /// given, otherwise the configured agent command.
    pub async fn agent(&self, script: Option<&Path>) -> Result<Arc<dyn BrowsingAgent>> {
        if let Some(path) = script {
            let agent = ScriptedAgent::from_path(path)
                .await
                .with_context(|| format!("Failed to load agent script {}", path.display()))?;
            info!(path = %path.display(), "Using scripted agent");
            return Ok(Arc::new(agent));
        }

        let command = self
            .config
            .agent
            .command_config()
            .ok_or(HopwatchError::NoAgent)?;
        info!(program = %command.program, "Using agent command");
        Ok(Arc::new(CommandAgent::new(command)))
    }

    pub fn monitor(&self, agent: Arc<dyn BrowsingAgent>, settings: RunSettings) -> HopMonitor {
        let layout = &self.config.layout;
        HopMonitor::with_layout(
            agent,
            settings,
            layout.tree_layout(),
            layout.min_surface_width,
        )
    }
}
