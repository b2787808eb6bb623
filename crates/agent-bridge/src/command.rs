use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AgentError;
use crate::model::RunResult;
use crate::BrowsingAgent;

/// Argument token replaced by the prompt text.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandAgentConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    600
}

impl CommandAgentConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Runs an external agent program per task.
///
/// The prompt replaces every `{prompt}` argument, or is appended as the last
/// argument when no placeholder is present. The program must print a run
/// transcript as JSON on stdout.
#[derive(Clone, Debug)]
pub struct CommandAgent {
    config: CommandAgentConfig,
}

impl CommandAgent {
    pub fn new(config: CommandAgentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommandAgentConfig {
        &self.config
    }

    fn arguments(&self, prompt: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| {
                if arg.contains(PROMPT_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(PROMPT_PLACEHOLDER, prompt)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(prompt.to_string());
        }
        args
    }
}

#[async_trait]
impl BrowsingAgent for CommandAgent {
    async fn run_task(&self, prompt: &str) -> Result<RunResult, AgentError> {
        let program = &self.config.program;
        let mut cmd = Command::new(program);
        cmd.args(self.arguments(prompt))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(%program, "launching agent process");
        let child = cmd.spawn().map_err(|err| AgentError::Spawn {
            program: program.clone(),
            reason: err.to_string(),
        })?;

        let limit = Duration::from_secs(self.config.timeout_secs);
        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result.map_err(|err| AgentError::Spawn {
                program: program.clone(),
                reason: err.to_string(),
            })?,
            Err(_) => {
                warn!(%program, timeout_secs = self.config.timeout_secs, "agent process timed out");
                return Err(AgentError::Timeout(self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AgentError::Exited {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result: RunResult = serde_json::from_str(stdout.trim())?;
        debug!(urls = result.visited_urls.len(), "agent process finished");
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout_secs: u64) -> CommandAgent {
        CommandAgent::new(CommandAgentConfig {
            program: "sh".into(),
            args: vec![
                "-c".into(),
                script.into(),
                "hopwatch-agent".into(),
                PROMPT_PLACEHOLDER.into(),
            ],
            timeout_secs,
        })
    }

    #[test]
    fn prompt_is_appended_without_placeholder() {
        let agent = CommandAgent::new(CommandAgentConfig {
            program: "agent".into(),
            args: vec!["--headless".into()],
            timeout_secs: 1,
        });
        assert_eq!(agent.arguments("find it"), vec!["--headless", "find it"]);
    }

    #[test]
    fn placeholder_is_substituted_in_place() {
        let agent = CommandAgent::new(CommandAgentConfig {
            program: "agent".into(),
            args: vec!["--task={prompt}".into(), "--json".into()],
            timeout_secs: 1,
        });
        assert_eq!(agent.arguments("find it"), vec!["--task=find it", "--json"]);
    }

    #[tokio::test]
    async fn parses_transcript_from_stdout() {
        let agent = shell(
            r#"printf '{"visited_urls":["https://a.test/x"],"final_result":"%s"}' "$1""#,
            5,
        );
        let result = agent.run_task("hello").await.unwrap();
        assert_eq!(result.visited_urls(), ["https://a.test/x"]);
        assert_eq!(result.final_text(), "hello");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let agent = shell("echo boom >&2; exit 3", 5);
        match agent.run_task("x").await.unwrap_err() {
            AgentError::Exited { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_stdout_is_a_transcript_error() {
        let agent = shell("echo not-json", 5);
        assert!(matches!(
            agent.run_task("x").await,
            Err(AgentError::Transcript(_))
        ));
    }

    #[tokio::test]
    async fn slow_agent_times_out() {
        let agent = shell("sleep 5", 0);
        assert_eq!(agent.run_task("x").await, Err(AgentError::Timeout(0)));
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let agent = CommandAgent::new(CommandAgentConfig::new("/nonexistent/hopwatch-agent"));
        assert!(matches!(
            agent.run_task("x").await,
            Err(AgentError::Spawn { .. })
        ));
    }
}
