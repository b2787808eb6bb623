use clap::Subcommand;

use super::run::RunArgs;
use super::watch::WatchArgs;

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Open the interactive hop monitor
    Watch(WatchArgs),

    /// Run a single task headless and print the resulting hop tree
    Run(RunArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Watch(WatchArgs::default())
    }
}

impl Commands {
    /// Whether the command takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Commands::Watch(_))
    }
}
