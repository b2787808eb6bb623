//! Run driving logic.
//!
//! Runs on the async runtime, away from the surface loop. It calls the agent,
//! turns its result into step events and posts them through the hand-off,
//! pausing between steps so the tree grows visibly.

use std::sync::Arc;
use std::time::Duration;

use hopwatch_agent_bridge::{build_prompt, BrowsingAgent};
use hopwatch_event_bus::EventSink;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::errors::HopResult;
use crate::events::{StepEvent, StepSender};
use crate::labels::is_trackable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after the query node appears.
    pub query_pause: Duration,
    /// Pause after each visit node.
    pub visit_pause: Duration,
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        query_pause: Duration::ZERO,
        visit_pause: Duration::ZERO,
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            query_pause: Duration::from_millis(300),
            visit_pause: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub pacing: Pacing,
    pub answer_sentences: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            answer_sentences: hopwatch_agent_bridge::DEFAULT_ANSWER_SENTENCES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { visits: usize },
    Failed { message: String },
}

/// Drive one run to its end. `RunEnded` is posted last whatever happens.
#[instrument(skip(agent, sink, settings), fields(agent_name = agent.name()))]
pub async fn drive_run<A, K>(
    agent: &A,
    task: &str,
    settings: RunSettings,
    sink: &K,
) -> HopResult<RunOutcome>
where
    A: BrowsingAgent + ?Sized,
    K: EventSink<StepEvent>,
{
    let outcome = drive_steps(agent, task, settings, sink).await;
    let ended = sink.publish(StepEvent::RunEnded);
    let outcome = outcome?;
    ended?;
    Ok(outcome)
}

async fn drive_steps<A, K>(
    agent: &A,
    task: &str,
    settings: RunSettings,
    sink: &K,
) -> HopResult<RunOutcome>
where
    A: BrowsingAgent + ?Sized,
    K: EventSink<StepEvent>,
{
    sink.publish(StepEvent::Started {
        task: task.to_string(),
    })?;
    pause(settings.pacing.query_pause).await;

    let prompt = build_prompt(task, settings.answer_sentences);
    let result = match agent.run_task(&prompt).await {
        Ok(result) => result,
        Err(err) => {
            error!(%err, "agent run failed");
            let message = err.to_string();
            sink.publish(StepEvent::Failed {
                message: message.clone(),
            })?;
            return Ok(RunOutcome::Failed { message });
        }
    };

    let mut visits = 0;
    for url in result.visited_urls().iter().filter(|url| is_trackable(url)) {
        sink.publish(StepEvent::Visited { url: url.clone() })?;
        visits += 1;
        pause(settings.pacing.visit_pause).await;
    }

    sink.publish(StepEvent::Completed {
        final_text: result.final_text(),
    })?;
    info!(visits, "agent run completed");
    Ok(RunOutcome::Completed { visits })
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Run [`drive_run`] as a detached task on the runtime.
pub fn spawn_run(
    agent: Arc<dyn BrowsingAgent>,
    task: String,
    settings: RunSettings,
    sink: StepSender,
) -> JoinHandle<HopResult<RunOutcome>> {
    tokio::spawn(async move { drive_run(agent.as_ref(), &task, settings, &sink).await })
}
