//! Configuration management module
//!
//! Settings are read from a YAML file; every section is optional and falls
//! back to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use hopwatch_agent_bridge::{CommandAgentConfig, DEFAULT_ANSWER_SENTENCES};
use hopwatch_tree_layout::{
    TreeLayout, DEFAULT_NODES_PER_ROW, DEFAULT_ROW_HEIGHT, DEFAULT_SIBLING_SPACING,
    DEFAULT_TOP_MARGIN, FALLBACK_SURFACE_WIDTH,
};
use serde::{Deserialize, Serialize};

use crate::driver::{Pacing, RunSettings};
use crate::errors::{HopResult, HopwatchError};

pub const AGENT_COMMAND_ENV: &str = "HOPWATCH_AGENT_COMMAND";
pub const AGENT_TIMEOUT_ENV: &str = "HOPWATCH_AGENT_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentSettings,
    pub pacing: PacingConfig,
    pub layout: LayoutConfig,
    /// Log destination for the interactive UI.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Program that runs one agent task and prints its transcript.
    pub command: Option<String>,
    pub args: Vec<String>,
    pub timeout_secs: u64,
    /// Sentence limit requested for the final answer.
    pub answer_sentences: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: 600,
            answer_sentences: DEFAULT_ANSWER_SENTENCES,
        }
    }
}

impl AgentSettings {
    pub fn command_config(&self) -> Option<CommandAgentConfig> {
        let program = self.command.as_ref()?.trim();
        if program.is_empty() {
            return None;
        }
        Some(CommandAgentConfig {
            program: program.to_string(),
            args: self.args.clone(),
            timeout_secs: self.timeout_secs,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub query_pause_ms: u64,
    pub visit_pause_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            query_pause_ms: 300,
            visit_pause_ms: 200,
        }
    }
}

impl PacingConfig {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            query_pause: Duration::from_millis(self.query_pause_ms),
            visit_pause: Duration::from_millis(self.visit_pause_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width assumed until the drawing area is measured, and the narrowest
    /// width ever laid out against.
    pub min_surface_width: f64,
    pub top_margin: f64,
    pub row_height: f64,
    pub sibling_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_surface_width: FALLBACK_SURFACE_WIDTH,
            top_margin: DEFAULT_TOP_MARGIN,
            row_height: DEFAULT_ROW_HEIGHT,
            sibling_spacing: DEFAULT_SIBLING_SPACING,
        }
    }
}

impl LayoutConfig {
    pub fn tree_layout(&self) -> TreeLayout {
        TreeLayout {
            top_margin: self.top_margin,
            row_height: self.row_height,
            sibling_spacing: self.sibling_spacing,
            nodes_per_row: DEFAULT_NODES_PER_ROW,
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> HopResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HopResult<()> {
        let layout = &self.layout;
        for (name, value) in [
            ("layout.min_surface_width", layout.min_surface_width),
            ("layout.row_height", layout.row_height),
            ("layout.sibling_spacing", layout.sibling_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(HopwatchError::config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !layout.top_margin.is_finite() || layout.top_margin < 0.0 {
            return Err(HopwatchError::config("layout.top_margin must not be negative"));
        }
        if self.agent.answer_sentences == 0 {
            return Err(HopwatchError::config(
                "agent.answer_sentences must be at least 1",
            ));
        }
        Ok(())
    }

    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(command) = lookup(AGENT_COMMAND_ENV) {
            self.agent.command = Some(command);
        }
        if let Some(timeout) = lookup(AGENT_TIMEOUT_ENV).and_then(|value| value.parse().ok()) {
            self.agent.timeout_secs = timeout;
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            pacing: self.pacing.pacing(),
            answer_sentences: self.agent.answer_sentences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_yaml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pacing.pacing(), Pacing::default());
        assert_eq!(config.layout.tree_layout(), TreeLayout::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_yaml_str(
            "agent:\n  command: browse-agent\n  args: [\"--json\"]\npacing:\n  visit_pause_ms: 50\n",
        )
        .unwrap();

        assert_eq!(config.agent.command.as_deref(), Some("browse-agent"));
        assert_eq!(config.agent.timeout_secs, 600);
        assert_eq!(config.pacing.query_pause_ms, 300);
        assert_eq!(config.pacing.visit_pause_ms, 50);

        let command = config.agent.command_config().unwrap();
        assert_eq!(command.program, "browse-agent");
        assert_eq!(command.args, vec!["--json".to_string()]);
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let err = Config::from_yaml_str("layout:\n  row_height: 0\n").unwrap_err();
        assert!(err.to_string().contains("layout.row_height"));
    }

    #[test]
    fn zero_sentence_limit_is_rejected() {
        assert!(Config::from_yaml_str("agent:\n  answer_sentences: 0\n").is_err());
    }

    #[test]
    fn blank_command_means_no_agent() {
        let mut config = Config::default();
        config.agent.command = Some("  ".into());
        assert_eq!(config.agent.command_config(), None);
    }

    #[test]
    fn overrides_replace_command_and_timeout() {
        let env: HashMap<&str, &str> = HashMap::from([
            (AGENT_COMMAND_ENV, "other-agent"),
            (AGENT_TIMEOUT_ENV, "15"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.agent.command.as_deref(), Some("other-agent"));
        assert_eq!(config.agent.timeout_secs, 15);
    }

    #[test]
    fn unparsable_timeout_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == AGENT_TIMEOUT_ENV).then(|| "soon".to_string()));
        assert_eq!(config.agent.timeout_secs, 600);
    }
}
