use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use super::context::CliContext;
use crate::monitor::HopMonitor;
use crate::ui;

const TICK: Duration = Duration::from_millis(250);

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Args, Clone, Debug, Default)]
pub struct WatchArgs {
    /// Replay an agent transcript file instead of launching the agent
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Submit this task as soon as the monitor opens
    #[arg(short, long)]
    pub task: Option<String>,
}

pub async fn cmd_watch(args: WatchArgs, ctx: &CliContext) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("the hop monitor needs a terminal; use `hopwatch run --task ...` instead");
    }

    let agent = ctx.agent(args.script.as_deref()).await?;
    let mut monitor = ctx.monitor(agent, ctx.config().run_settings());
    info!(config = %ctx.config_path().display(), "Opening hop monitor");

    let mut terminal = setup_terminal()?;
    if let Some(task) = args.task.as_deref() {
        sync_width(&mut terminal, &mut monitor)?;
        if let Err(err) = monitor.start_task(task) {
            warn!(%err, "initial task not started");
        }
    }
    let outcome = run_loop(&mut terminal, &mut monitor).await;
    restore_terminal(&mut terminal)?;
    outcome
}

fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Report the measured canvas width so layout centers on the real area.
fn sync_width(terminal: &mut Term, monitor: &mut HopMonitor) -> io::Result<()> {
    let size = terminal.size()?;
    let areas = ui::split(ratatui::layout::Rect::new(0, 0, size.width, size.height));
    monitor.set_surface_width(Some(ui::canvas_width(areas.canvas)));
    Ok(())
}

async fn run_loop(terminal: &mut Term, monitor: &mut HopMonitor) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    loop {
        sync_width(terminal, monitor)?;
        terminal.draw(|frame| ui::render(frame, monitor))?;

        tokio::select! {
            Some(step) = monitor.next_event() => {
                if let Err(err) = monitor.handle(step) {
                    warn!(%err, "step event rejected");
                }
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if handle_key(key, monitor) {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                }
            }
            _ = ticker.tick() => {
                monitor.reap_finished();
            }
        }
    }
    Ok(())
}

/// Returns `true` when the monitor should close.
fn handle_key(key: KeyEvent, monitor: &mut HopMonitor) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Enter => match monitor.submit() {
            Ok(true) => {}
            Ok(false) => info!("nothing to submit"),
            Err(err) => warn!(%err, "submission refused"),
        },
        KeyCode::Backspace => monitor.input_mut().backspace(),
        KeyCode::Char(ch) => monitor.input_mut().insert(ch),
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Pacing, RunSettings};
    use hopwatch_agent_bridge::ScriptedAgent;
    use std::sync::Arc;

    fn monitor() -> HopMonitor {
        HopMonitor::new(
            Arc::new(ScriptedAgent::succeeding(&[], "ok")),
            RunSettings {
                pacing: Pacing::NONE,
                answer_sentences: 3,
            },
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn typing_then_enter_starts_a_run() {
        let mut monitor = monitor();
        for ch in "hi".chars() {
            assert!(!handle_key(press(KeyCode::Char(ch)), &mut monitor));
        }
        assert_eq!(monitor.input().text(), "hi");

        assert!(!handle_key(press(KeyCode::Enter), &mut monitor));
        assert!(monitor.is_running());
        monitor.run_to_end().await.unwrap();
        assert_eq!(monitor.scene().status(), "Number of hops: 1");
    }

    #[tokio::test]
    async fn escape_and_ctrl_c_quit() {
        let mut monitor = monitor();
        assert!(handle_key(press(KeyCode::Esc), &mut monitor));
        assert!(handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut monitor
        ));
    }

    #[tokio::test]
    async fn backspace_edits_input() {
        let mut monitor = monitor();
        handle_key(press(KeyCode::Char('a')), &mut monitor);
        handle_key(press(KeyCode::Char('b')), &mut monitor);
        handle_key(press(KeyCode::Backspace), &mut monitor);
        assert_eq!(monitor.input().text(), "a");
    }
}
