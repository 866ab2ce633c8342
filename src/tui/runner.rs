//! TUI runner — main loop that wires everything together.
//!
//! Creates the terminal, multiplexes tick/render/feed/input with
//! `tokio::select!`, and hands start requests from the form to the
//! orchestrator.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::Mutex;
use tokio::time::interval;

use crate::orchestrator::{LabState, Orchestrator};

use super::app::App;
use super::event::TuiMessage;
use super::layout;

/// Refresh App view models from run state (brief lock).
pub async fn refresh_from_state(app: &mut App, state: &Arc<Mutex<LabState>>) {
    let s = state.lock().await;
    app.refresh(&s);
    // Lock released here — microseconds
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(orchestrator: &Orchestrator, mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let state = orchestrator.state();
    let mut feed = orchestrator.subscribe();

    let mut tick_interval = interval(Duration::from_millis(250)); // 4Hz
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                refresh_from_state(&mut app, &state).await;
            }
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, &mut app))?;
            }
            Ok(event) = feed.recv() => {
                app.update(TuiMessage::Feed(event));
            }
            // Poll crossterm events (non-blocking via tokio::task::spawn_blocking)
            result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            }) => {
                if let Ok(Some(Event::Key(key))) = result {
                    app.update(TuiMessage::Input(key));
                }
            }
        }

        // Hand a submitted form to the orchestrator (fire-and-forget).
        if let Some(req) = app.pending_start.take() {
            orchestrator.start_experiment(req.mode, req.config);
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
