pub mod app;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod run;
pub mod runtime;
pub mod watch;

pub use run::{cmd_run, RunArgs};
pub use watch::{cmd_watch, WatchArgs};
