//! Error handling for the hopwatch library.

use hopwatch_agent_bridge::AgentError;
use hopwatch_event_bus::BusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HopwatchError {
    /// The run was finalized or failed; it accepts no further steps.
    #[error("run is closed; no further steps are accepted")]
    RunClosed,

    #[error("a run is already in progress")]
    RunInProgress,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no agent configured: set `agent.command` in the config file or pass --script")]
    NoAgent,

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("step hand-off failed: {0}")]
    Bus(#[from] BusError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HopwatchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<serde_yaml::Error> for HopwatchError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type HopResult<T> = Result<T, HopwatchError>;
