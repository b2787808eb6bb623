//! Hopwatch library
//!
//! Live hop-tree monitor for autonomous browsing agents. Exposes the run
//! controller, drawing surface and CLI for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod controller;
pub mod driver;
pub mod errors;
pub mod events;
pub mod input;
pub mod labels;
pub mod monitor;
pub mod run_state;
pub mod surface;
pub mod ui;

// Re-export commonly used types for external use
pub use controller::AnimationController;
pub use errors::{HopResult, HopwatchError};
pub use events::StepEvent;
pub use hopwatch_tree_layout::{compute_positions, Position, TreeLayout};
pub use monitor::HopMonitor;
pub use surface::{Scene, Surface};
