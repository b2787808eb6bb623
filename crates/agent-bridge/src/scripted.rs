use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AgentError;
use crate::model::RunResult;
use crate::BrowsingAgent;

/// Canned outcome for a [`ScriptedAgent`].
///
/// Fixture files are either a transcript
/// (`{"visited_urls": [...], "final_result": "..."}`) or a failure
/// (`{"error": "timeout"}`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Failure { error: String },
    Transcript(RunResult),
}

/// Deterministic agent used for tests, demos and offline development.
#[derive(Debug)]
pub struct ScriptedAgent {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(urls: &[&str], final_result: &str) -> Self {
        Self::new(Script::Transcript(RunResult::new(
            urls.iter().map(|url| url.to_string()).collect(),
            Some(final_result.to_string()),
        )))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Script::Failure {
            error: message.into(),
        })
    }

    pub async fn from_path(path: &Path) -> Result<Self, AgentError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|err| {
            AgentError::transcript(format!("cannot read {}: {err}", path.display()))
        })?;
        let script: Script = serde_json::from_str(&content)?;
        Ok(Self::new(script))
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl BrowsingAgent for ScriptedAgent {
    async fn run_task(&self, prompt: &str) -> Result<RunResult, AgentError> {
        self.prompts.lock().push(prompt.to_string());
        match &self.script {
            Script::Failure { error } => {
                debug!(%error, "scripted agent failing");
                Err(AgentError::message(error.clone()))
            }
            Script::Transcript(result) => {
                debug!(urls = result.visited_urls.len(), "scripted agent finished");
                Ok(result.clone())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
