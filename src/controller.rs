//! Animation controller.
//!
//! Owns the run state and the drawing surface. Every new step recomputes the
//! whole layout and repaints every connection and node; there is no partial
//! redraw.

use hopwatch_tree_layout::{
    resolve_surface_width_with, Position, TreeLayout, FALLBACK_SURFACE_WIDTH,
};
use tracing::{debug, info, warn};

use crate::errors::{HopResult, HopwatchError};
use crate::events::StepEvent;
use crate::labels::{query_label, visit_label, COMPLETE_LABEL};
use crate::run_state::RunState;
use crate::surface::Surface;

pub const STATUS_FAILED: &str = "Task failed";
pub const ERROR_PREFIX: &str = "ERROR:";

pub fn hop_status(hop_count: usize) -> String {
    format!("Number of hops: {hop_count}")
}

pub struct AnimationController<S> {
    layout: TreeLayout,
    min_surface_width: f64,
    measured_width: Option<f64>,
    state: RunState,
    positions: Vec<Position>,
    surface: S,
}

impl<S: Surface> AnimationController<S> {
    pub fn new(surface: S) -> Self {
        Self::with_layout(surface, TreeLayout::default(), FALLBACK_SURFACE_WIDTH)
    }

    pub fn with_layout(surface: S, layout: TreeLayout, min_surface_width: f64) -> Self {
        Self {
            layout,
            min_surface_width,
            measured_width: None,
            state: RunState::new(),
            positions: Vec::new(),
            surface,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Positions from the most recent layout pass, indexed by step.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Record the measured width of the drawing area. Takes effect on the
    /// next layout pass.
    pub fn set_surface_width(&mut self, measured: Option<f64>) {
        self.measured_width = measured;
    }

    pub fn surface_width(&self) -> f64 {
        resolve_surface_width_with(self.measured_width, self.min_surface_width)
    }

    pub fn begin_run(&mut self) {
        self.state.reset();
        self.positions.clear();
        self.surface.clear();
        self.surface.fit_scroll_region();
        self.surface.set_status("");
        self.surface.set_result("");
        debug!("run state reset");
    }

    /// Append a step and repaint everything. Returns the new step's index.
    pub fn append_step(&mut self, label: impl Into<String>, is_final: bool) -> HopResult<usize> {
        if self.state.is_closed() {
            warn!("ignoring step appended to a closed run");
            return Err(HopwatchError::RunClosed);
        }
        let index = self.state.push(label.into());
        self.relayout();
        self.redraw(is_final);
        debug!(index, is_final, "step appended");
        Ok(index)
    }

    pub fn finalize(&mut self, result_text: &str, hop_count: usize) -> HopResult<()> {
        if self.state.is_closed() {
            warn!("run already closed; finalize ignored");
            return Err(HopwatchError::RunClosed);
        }
        self.state.mark_finalized();
        self.relayout();
        self.redraw(true);
        self.surface.set_status(&hop_status(hop_count));
        self.surface.set_result(result_text);
        info!(hop_count, "run finalized");
        Ok(())
    }

    /// Report a collaborator failure. Nodes already drawn stay as they are.
    pub fn fail(&mut self, message: &str) -> HopResult<()> {
        if self.state.is_closed() {
            warn!("run already closed; failure ignored");
            return Err(HopwatchError::RunClosed);
        }
        self.state.mark_failed(message);
        self.surface.set_result(&format!("{ERROR_PREFIX} {message}"));
        self.surface.set_status(STATUS_FAILED);
        warn!(%message, "run failed");
        Ok(())
    }

    /// Label a visited URL and append it. `Ok(None)` when the URL is not
    /// tracked.
    pub fn record_visit(&mut self, url: &str) -> HopResult<Option<usize>> {
        if self.state.is_closed() {
            return Err(HopwatchError::RunClosed);
        }
        match visit_label(self.state.visit_counter_mut(), url) {
            Some(label) => self.append_step(label, false).map(Some),
            None => {
                debug!(%url, "url not tracked");
                Ok(None)
            }
        }
    }

    /// Append the completion node and finalize. Returns the hop count.
    pub fn complete(&mut self, final_text: &str) -> HopResult<usize> {
        self.append_step(COMPLETE_LABEL, true)?;
        let hop_count = self.state.hop_count();
        self.finalize(final_text, hop_count)?;
        Ok(hop_count)
    }

    pub fn apply(&mut self, event: StepEvent) -> HopResult<()> {
        match event {
            StepEvent::Started { task } => self.append_step(query_label(&task), false).map(drop),
            StepEvent::Visited { url } => self.record_visit(&url).map(drop),
            StepEvent::Completed { final_text } => self.complete(&final_text).map(drop),
            StepEvent::Failed { message } => self.fail(&message),
            StepEvent::RunEnded => Ok(()),
        }
    }

    fn relayout(&mut self) {
        self.positions = self
            .layout
            .compute_positions(self.state.current_step_count(), self.surface_width());
    }

    fn redraw(&mut self, all_active: bool) {
        let count = self.state.current_step_count();
        self.surface.clear();

        for pair in self.positions.windows(2) {
            self.surface.draw_connection(pair[0], pair[1]);
        }

        let newest = count.saturating_sub(1);
        for step in self.state.steps() {
            let active = all_active || step.index == newest;
            self.surface
                .draw_node(self.positions[step.index], &step.label, active);
        }

        self.surface.fit_scroll_region();
        self.surface.scroll_to_end();
    }
}
