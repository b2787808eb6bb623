use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::monitor::HopMonitor;
use crate::run_state::Step;

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// What a headless run leaves on screen.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub task: String,
    pub steps: Vec<Step>,
    pub hop_count: Option<usize>,
    pub status: String,
    pub result: String,
    pub failed: bool,
}

impl RunReport {
    pub fn from_monitor(task: &str, monitor: &HopMonitor) -> Self {
        let state = monitor.controller().state();
        let scene = monitor.scene();
        Self {
            task: task.to_string(),
            steps: state.steps().to_vec(),
            hop_count: state.is_finalized().then(|| state.hop_count()),
            status: scene.status().to_string(),
            result: scene.result().to_string(),
            failed: state.failure().is_some(),
        }
    }

    pub fn render_human(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&format!("[{}] {}\n", step.index, step.label));
        }
        out.push_str(&self.status);
        out.push('\n');
        out.push_str(&self.result);
        out.push('\n');
        out
    }
}

pub fn print_report(report: &RunReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print!("{}", report.render_human()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
