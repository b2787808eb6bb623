use serde::Serialize;

use crate::labels::VisitCounter;

/// One labeled event in a run's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub index: usize,
    pub label: String,
}

/// History and bookkeeping for the current run.
///
/// Only [`crate::controller::AnimationController`] mutates this.
#[derive(Debug, Default)]
pub struct RunState {
    steps: Vec<Step>,
    visit_counter: VisitCounter,
    finalized: bool,
    failure: Option<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.label.as_str())
    }

    pub fn current_step_count(&self) -> usize {
        self.steps.len()
    }

    /// Steps excluding the query node.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Finalized or failed.
    pub fn is_closed(&self) -> bool {
        self.finalized || self.failure.is_some()
    }

    pub fn visit_counter(&self) -> &VisitCounter {
        &self.visit_counter
    }

    pub(crate) fn visit_counter_mut(&mut self) -> &mut VisitCounter {
        &mut self.visit_counter
    }

    pub(crate) fn reset(&mut self) {
        self.steps.clear();
        self.visit_counter.clear();
        self.finalized = false;
        self.failure = None;
    }

    pub(crate) fn push(&mut self, label: String) -> usize {
        let index = self.steps.len();
        self.steps.push(Step { index, label });
        index
    }

    pub(crate) fn mark_finalized(&mut self) {
        self.finalized = true;
    }

    pub(crate) fn mark_failed(&mut self, message: &str) {
        self.failure = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_insertion_order() {
        let mut state = RunState::new();
        assert_eq!(state.push("Query: a".into()), 0);
        assert_eq!(state.push("Visited: b".into()), 1);
        assert_eq!(state.current_step_count(), 2);
        assert_eq!(state.hop_count(), 1);
        assert_eq!(state.labels().collect::<Vec<_>>(), ["Query: a", "Visited: b"]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = RunState::new();
        state.push("Query: a".into());
        state.visit_counter_mut().record("b");
        state.mark_failed("boom");
        state.reset();

        assert_eq!(state.current_step_count(), 0);
        assert_eq!(state.visit_counter().domains(), 0);
        assert!(!state.is_closed());
        assert_eq!(state.hop_count(), 0);
    }
}
