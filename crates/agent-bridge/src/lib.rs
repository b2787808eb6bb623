//! Collaborator side of hopwatch.
//!
//! The monitor never talks to a browser or a model itself. It hands a prompt
//! to a [`BrowsingAgent`] and gets back the URLs the agent visited and its
//! final answer.

pub mod command;
pub mod errors;
pub mod model;
pub mod prompt;
pub mod scripted;

use async_trait::async_trait;

pub use command::{CommandAgent, CommandAgentConfig, PROMPT_PLACEHOLDER};
pub use errors::AgentError;
pub use model::RunResult;
pub use prompt::{build_prompt, DEFAULT_ANSWER_SENTENCES};
pub use scripted::{Script, ScriptedAgent};

/// An autonomous browsing agent that runs one task to completion.
#[async_trait]
pub trait BrowsingAgent: Send + Sync {
    /// Run the task described by `prompt`.
    async fn run_task(&self, prompt: &str) -> Result<RunResult, AgentError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "agent"
    }
}
