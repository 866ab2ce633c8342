//! App — the TEA model.
//!
//! All state lives here. Update receives TuiMessages and mutates state; view
//! reads state to produce ratatui widgets, with no side effects. View models
//! are lightweight copies refreshed from `LabState` on tick — no lock is
//! held across a frame.

use std::collections::HashMap;

use crate::notebook::scroll::{AdvancePolicy, AdvanceTracker};
use crate::notebook::{Agent, AgentId, TimelineItem};
use crate::orchestrator::{ExperimentConfig, ExperimentMode, FeedEvent, LabState};

use super::event::TuiMessage;

/// A start request produced by the form, consumed by the runner.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub mode: ExperimentMode,
    pub config: ExperimentConfig,
}

/// The main TUI application state (TEA model).
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    // --- copied from LabState on tick ---
    /// Whether a run is active.
    pub running: bool,
    /// Snapshot of the orchestrator timeline.
    pub timeline: Vec<TimelineItem>,
    /// Snapshot of the agent registry.
    pub agents: HashMap<AgentId, Agent>,

    // --- empty-state form ---
    /// Task text being typed.
    pub task_input: String,
    /// Selected execution mode.
    pub mode: ExperimentMode,
    /// Mock run, no LLM/GPU usage.
    pub test_mode: bool,
    /// Config template carrying gpu / agent counts resolved at startup;
    /// the form only supplies task, mode, and test_mode on top of it.
    pub config_template: ExperimentConfig,
    /// Start request pending pickup by the runner.
    pub pending_start: Option<StartRequest>,
    /// The objective shown in the header once a run begins.
    pub objective: Option<String>,

    // --- timeline viewport ---
    /// Auto-advance decision state.
    tracker: AdvanceTracker,
    /// When true, position the viewport so the content's trailing edge
    /// meets the bottom of the visible area on next render.
    pub scroll_to_latest: bool,
    /// Vertical scroll offset of the timeline pane.
    pub timeline_scroll: u16,
    /// Viewport height of the timeline pane (set by renderer).
    pub viewport_height: u16,
}

impl App {
    pub fn new(config_template: ExperimentConfig, mode: ExperimentMode) -> Self {
        Self {
            should_quit: false,
            running: false,
            timeline: Vec::new(),
            agents: HashMap::new(),
            task_input: String::new(),
            mode,
            test_mode: config_template.test_mode,
            config_template,
            pending_start: None,
            objective: None,
            tracker: AdvanceTracker::with_policy(AdvancePolicy::default()),
            scroll_to_latest: false,
            timeline_scroll: 0,
            viewport_height: 20, // sensible default, updated by renderer
        }
    }

    /// Handle a TUI message (TEA update).
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => {
                super::input::handle_key(self, key);
            }
            TuiMessage::Feed(event) => {
                self.handle_feed(event);
            }
            TuiMessage::Tick | TuiMessage::Render => {
                // Refresh and draw are handled by the runner.
            }
            TuiMessage::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Refresh view models from run state (called by the runner on tick,
    /// brief lock held by the caller).
    pub fn refresh(&mut self, state: &LabState) {
        self.running = state.running;
        self.timeline = state.timeline.items().to_vec();
        self.agents = state.agents.clone();

        if self.tracker.observe(&self.timeline) {
            self.scroll_to_latest = true;
        }
    }

    fn handle_feed(&mut self, event: FeedEvent) {
        if let FeedEvent::RunFinished = event {
            if self.tracker.run_finished() {
                self.scroll_to_latest = true;
            }
        }
        // Everything else is a wake-up; the tick refresh picks up the data.
    }

    /// Submit the form. No-op on a blank task.
    pub fn submit(&mut self) {
        let task = self.task_input.trim();
        if task.is_empty() || self.running {
            return;
        }
        let mut config = self.config_template.clone();
        config.task = task.to_string();
        config.test_mode = self.test_mode;
        self.objective = Some(config.task.clone());
        self.pending_start = Some(StartRequest {
            mode: self.mode,
            config,
        });
    }

    /// Scroll the timeline down one line, cancelling any pending advance.
    pub fn scroll_down(&mut self) {
        self.scroll_to_latest = false;
        self.timeline_scroll = self.timeline_scroll.saturating_add(1);
    }

    /// Scroll the timeline up one line, cancelling any pending advance.
    pub fn scroll_up(&mut self) {
        self.scroll_to_latest = false;
        self.timeline_scroll = self.timeline_scroll.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        self.scroll_to_latest = false;
        self.timeline_scroll = self
            .timeline_scroll
            .saturating_add(self.viewport_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_to_latest = false;
        self.timeline_scroll = self
            .timeline_scroll
            .saturating_sub(self.viewport_height.max(1));
    }

    /// Jump back to the live edge.
    pub fn jump_to_latest(&mut self) {
        self.scroll_to_latest = true;
    }

    /// Whether the empty-state form should be shown.
    pub fn showing_form(&self) -> bool {
        self.timeline.is_empty()
    }
}
