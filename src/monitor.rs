//! The hop monitor: glue between the input, the run driver and the
//! controller.
//!
//! Lives on the loop that owns the surface. Drivers only reach it through the
//! step hand-off, so every drawing operation happens here, one event at a
//! time.

use std::sync::Arc;
use std::time::Duration;

use hopwatch_agent_bridge::BrowsingAgent;
use hopwatch_tree_layout::{TreeLayout, FALLBACK_SURFACE_WIDTH};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::controller::AnimationController;
use crate::driver::{spawn_run, RunOutcome, RunSettings};
use crate::errors::{HopResult, HopwatchError};
use crate::events::{step_channel, StepEvent, StepReceiver, StepSender};
use crate::input::TaskInput;
use crate::surface::Scene;

/// Shown when a driver stops without reporting the end of its run.
pub const ABORTED_MESSAGE: &str = "agent run aborted";

const REAP_INTERVAL: Duration = Duration::from_millis(50);

pub struct HopMonitor {
    controller: AnimationController<Scene>,
    input: TaskInput,
    agent: Arc<dyn BrowsingAgent>,
    settings: RunSettings,
    sender: StepSender,
    receiver: StepReceiver,
    active: Option<JoinHandle<HopResult<RunOutcome>>>,
}

impl HopMonitor {
    pub fn new(agent: Arc<dyn BrowsingAgent>, settings: RunSettings) -> Self {
        Self::with_layout(agent, settings, TreeLayout::default(), FALLBACK_SURFACE_WIDTH)
    }

    pub fn with_layout(
        agent: Arc<dyn BrowsingAgent>,
        settings: RunSettings,
        layout: TreeLayout,
        min_surface_width: f64,
    ) -> Self {
        let (sender, receiver) = step_channel();
        Self {
            controller: AnimationController::with_layout(Scene::new(), layout, min_surface_width),
            input: TaskInput::new(),
            agent,
            settings,
            sender,
            receiver,
            active: None,
        }
    }

    pub fn controller(&self) -> &AnimationController<Scene> {
        &self.controller
    }

    pub fn scene(&self) -> &Scene {
        self.controller.surface()
    }

    pub fn input(&self) -> &TaskInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut TaskInput {
        &mut self.input
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn set_surface_width(&mut self, measured: Option<f64>) {
        self.controller.set_surface_width(measured);
    }

    /// Submit whatever is in the input. `Ok(false)` when the submission was
    /// a no-op (blank text or input disabled).
    pub fn submit(&mut self) -> HopResult<bool> {
        if self.is_running() {
            return Err(HopwatchError::RunInProgress);
        }
        let Some(task) = self.input.submit() else {
            return Ok(false);
        };

        info!(%task, "starting run");
        self.controller.begin_run();
        self.active = Some(spawn_run(
            Arc::clone(&self.agent),
            task,
            self.settings,
            self.sender.clone(),
        ));
        Ok(true)
    }

    /// Put `task` in the input and submit it.
    pub fn start_task(&mut self, task: &str) -> HopResult<bool> {
        self.input.set_text(task);
        self.submit()
    }

    /// Apply one event from a driver.
    pub fn handle(&mut self, event: StepEvent) -> HopResult<()> {
        if event == StepEvent::RunEnded {
            self.active = None;
            if self.input.release() {
                info!("run ended; input re-enabled");
            }
            return Ok(());
        }
        self.controller.apply(event)
    }

    /// Apply everything queued so far. Returns how many events were applied.
    pub fn drain(&mut self) -> usize {
        let events = self.receiver.drain();
        let count = events.len();
        for event in events {
            if let Err(err) = self.handle(event) {
                warn!(%err, "step event rejected");
            }
        }
        count
    }

    /// Wait for the next event from a driver.
    pub async fn next_event(&mut self) -> Option<StepEvent> {
        self.receiver.recv().await
    }

    /// Release a run whose driver stopped without posting `RunEnded`.
    pub fn reap_finished(&mut self) {
        let finished = self
            .active
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(false);
        if !finished {
            return;
        }
        self.drain();
        if self.active.take().is_some() {
            warn!("driver stopped without ending its run");
            if !self.controller.state().is_closed() {
                if let Err(err) = self.controller.fail(ABORTED_MESSAGE) {
                    warn!(%err, "could not mark aborted run");
                }
            }
            self.input.release();
        }
    }

    /// Apply events until the current run ends. A driver that stops
    /// without posting `RunEnded` is reaped as an aborted run.
    pub async fn run_to_end(&mut self) -> HopResult<()> {
        let mut reap = tokio::time::interval(REAP_INTERVAL);
        while self.is_running() {
            tokio::select! {
                event = self.receiver.recv() => match event {
                    Some(event) => {
                        if let Err(err) = self.handle(event) {
                            warn!(%err, "step event rejected");
                        }
                    }
                    None => break,
                },
                _ = reap.tick() => self.reap_finished(),
            }
        }
        Ok(())
    }
}
