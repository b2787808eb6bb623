use thiserror::Error;

/// Errors surfaced by a browsing agent run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Failure reported by the agent itself; rendered verbatim.
    #[error("{0}")]
    Message(String),

    /// The agent process could not be started.
    #[error("failed to launch agent `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    /// The agent process exited unsuccessfully.
    #[error("agent exited with status {status}: {stderr}")]
    Exited { status: String, stderr: String },

    #[error("agent did not finish within {0}s")]
    Timeout(u64),

    /// The agent's output could not be read as a run transcript.
    #[error("invalid agent transcript: {0}")]
    Transcript(String),
}

impl AgentError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn transcript(message: impl Into<String>) -> Self {
        Self::Transcript(message.into())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transcript(err.to_string())
    }
}
