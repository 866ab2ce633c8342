//! TUI event loop messages — input, feed, tick, and render.
//!
//! The runner multiplexes:
//! - crossterm keyboard events
//! - orchestrator feed events (best-effort wake-ups)
//! - tick interval (4Hz — refresh view models from run state)
//! - render interval (~30fps — draw frame)

use crossterm::event::KeyEvent;

use crate::orchestrator::FeedEvent;

/// Messages that drive the TUI update loop.
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// Orchestrator feed event (timeline grew, agent stepped, run ended).
    Feed(FeedEvent),
    /// Tick: refresh view models from run state.
    Tick,
    /// Render: draw a frame.
    Render,
    /// Quit the TUI.
    Quit,
}
