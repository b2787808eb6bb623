use hopwatch_event_bus::{handoff, HandoffReceiver, HandoffSender};

/// What a run driver reports to the surface loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// The run began; becomes the query node.
    Started { task: String },
    /// The agent visited `url`.
    Visited { url: String },
    /// The agent finished with `final_text`.
    Completed { final_text: String },
    /// The agent failed; `message` is shown verbatim.
    Failed { message: String },
    /// The driver is done. Always the last event of a run.
    RunEnded,
}

pub type StepSender = HandoffSender<StepEvent>;
pub type StepReceiver = HandoffReceiver<StepEvent>;

pub fn step_channel() -> (StepSender, StepReceiver) {
    handoff()
}
