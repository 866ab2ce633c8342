//! Orchestrator handle — shared run state, event feed, engine seam.
//!
//! The adapter between a research engine and the notebook display:
//! - owns `LabState` (running flag, timeline, agent registry) behind a mutex,
//!   so append always gets a single global ordering even with concurrent
//!   producers
//! - exposes a broadcast feed of `FeedEvent`s for the TUI and observers;
//!   delivery is best-effort, a lagging subscriber just refreshes from state
//!   on its next tick
//! - `start_experiment` is fire-and-forget: it spawns the engine and returns,
//!   callers observe progress only through state and the feed
//!
//! The engine itself (LLM calls, sandboxes, GPUs) lives outside this crate;
//! the scripted engine in `script` is the only in-tree implementation.

pub mod runs;
pub mod script;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::notebook::{Agent, AgentId, ExperimentStep, ItemKind, Timeline, TimelineItem};

/// GPU class an experiment may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gpu {
    #[default]
    Any,
    T4,
    A10G,
    A100,
}

impl fmt::Display for Gpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gpu::Any => "any",
            Gpu::T4 => "t4",
            Gpu::A10G => "a10g",
            Gpu::A100 => "a100",
        };
        f.write_str(s)
    }
}

impl FromStr for Gpu {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Gpu::Any),
            "t4" => Ok(Gpu::T4),
            "a10g" => Ok(Gpu::A10G),
            "a100" => Ok(Gpu::A100),
            other => Err(format!("unknown gpu '{other}' (any, t4, a10g, a100)")),
        }
    }
}

/// Execution mode: one researcher, or an orchestrator driving a swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentMode {
    Single,
    #[default]
    Orchestrator,
}

impl fmt::Display for ExperimentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentMode::Single => f.write_str("single"),
            ExperimentMode::Orchestrator => f.write_str("orchestrator"),
        }
    }
}

impl FromStr for ExperimentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(ExperimentMode::Single),
            "orchestrator" => Ok(ExperimentMode::Orchestrator),
            other => Err(format!("unknown mode '{other}' (single, orchestrator)")),
        }
    }
}

/// Parameters of one experiment run. Input only — never mutated by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub task: String,
    pub gpu: Gpu,
    pub num_agents: u32,
    pub max_rounds: u32,
    pub max_parallel: u32,
    pub test_mode: bool,
}

impl ExperimentConfig {
    /// A config with the stock defaults for `task` (3 agents, 3 rounds,
    /// 2 parallel, any GPU, live mode).
    pub fn for_task(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            gpu: Gpu::Any,
            num_agents: 3,
            max_rounds: 3,
            max_parallel: 2,
            test_mode: false,
        }
    }
}

/// Shared state of the current run. All writes happen under the orchestrator
/// mutex; the display copies what it needs on tick and lets go of the lock.
#[derive(Debug, Default)]
pub struct LabState {
    /// True from experiment start until the engine returns.
    pub running: bool,
    /// The append-only orchestrator timeline.
    pub timeline: Timeline,
    /// Agent registry. A timeline `Agents` item may reference an id before
    /// the record lands here — look up by key and skip misses.
    pub agents: HashMap<AgentId, Agent>,
}

impl LabState {
    /// Registry lookup. `None` means "not yet materialized", not an error.
    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.get(id)
    }
}

/// Events broadcast as the run progresses. Best-effort wake-ups — state is
/// the source of truth.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A timeline item was appended at `index`.
    TimelineAppended { index: usize, kind: ItemKind },
    /// An agent's sub-notebook grew.
    StepAppended { agent_id: AgentId },
    /// An agent record materialized in the registry.
    AgentRegistered { agent_id: AgentId },
    /// The run ended.
    RunFinished,
}

/// Write half handed to an engine: appends to shared state and emits feed
/// events. Cloneable so an engine can fan out to concurrent workers — the
/// state mutex serializes their appends into one global order.
#[derive(Clone)]
pub struct RunHandle {
    state: Arc<Mutex<LabState>>,
    feed: broadcast::Sender<FeedEvent>,
    run_dir: Option<PathBuf>,
}

impl RunHandle {
    /// Append an orchestrator thought.
    pub async fn push_thought(&self, content: impl Into<String>) {
        self.append(TimelineItem::Thought {
            content: content.into(),
        })
        .await;
    }

    /// Announce a batch of launched agents by id. The records themselves may
    /// arrive later via `register_agent`.
    pub async fn announce_agents(&self, agent_ids: Vec<AgentId>) {
        self.append(TimelineItem::Agents { agent_ids }).await;
    }

    /// Materialize an agent record in the registry.
    pub async fn register_agent(&self, agent: Agent) {
        let id = agent.id.clone();
        {
            let mut state = self.state.lock().await;
            state.agents.insert(id.clone(), agent);
        }
        let _ = self.feed.send(FeedEvent::AgentRegistered { agent_id: id });
    }

    /// Append a step to one agent's sub-notebook. Unknown ids are created on
    /// the fly so a step can never be lost to a registration race.
    pub async fn push_step(&self, agent_id: &str, step: ExperimentStep) {
        {
            let mut state = self.state.lock().await;
            state
                .agents
                .entry(agent_id.to_string())
                .or_insert_with(|| Agent::new(agent_id, ""))
                .push_step(step);
        }
        let _ = self.feed.send(FeedEvent::StepAppended {
            agent_id: agent_id.to_string(),
        });
    }

    /// Append the finished paper and persist it to the run directory.
    pub async fn publish_paper(&self, content: impl Into<String>) {
        let content = content.into();
        if let Some(dir) = &self.run_dir {
            match runs::write_paper(dir, &content) {
                Ok(path) => info!("paper written to {}", path.display()),
                Err(e) => warn!("failed to write paper artifact: {e}"),
            }
        }
        self.append(TimelineItem::Paper { content }).await;
    }

    async fn append(&self, item: TimelineItem) {
        let (index, kind) = {
            let mut state = self.state.lock().await;
            let kind = item.kind();
            state.timeline.append(item);
            (state.timeline.len() - 1, kind)
        };
        let _ = self.feed.send(FeedEvent::TimelineAppended { index, kind });
    }
}

/// Boxed engine entry point. Given the mode, config, and a `RunHandle`, an
/// engine drives one run to completion; the orchestrator flips the running
/// flag around the call so engines cannot leave it dangling.
pub type EngineFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type Engine =
    Box<dyn Fn(ExperimentMode, ExperimentConfig, RunHandle) -> EngineFuture + Send + Sync>;

/// Handle to the run: owns the shared state, the feed, and the engine.
pub struct Orchestrator {
    state: Arc<Mutex<LabState>>,
    feed: broadcast::Sender<FeedEvent>,
    engine: Arc<Engine>,
    run_dir: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(engine: Engine) -> Self {
        let (feed, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(LabState::default())),
            feed,
            engine: Arc::new(engine),
            run_dir: None,
        }
    }

    /// Attach a run directory for artifacts (paper.md).
    pub fn with_run_dir(mut self, dir: PathBuf) -> Self {
        self.run_dir = Some(dir);
        self
    }

    /// The shared run state. Lock briefly, copy, release.
    pub fn state(&self) -> Arc<Mutex<LabState>> {
        self.state.clone()
    }

    /// Subscribe to the feed.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.feed.subscribe()
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Launch a run. Fire-and-forget: spawns the engine and returns
    /// immediately; callers observe `is_running` and the timeline. A request
    /// while a run is active is logged and dropped.
    pub fn start_experiment(&self, mode: ExperimentMode, config: ExperimentConfig) {
        let state = self.state.clone();
        let feed = self.feed.clone();
        let engine = self.engine.clone();
        let run_dir = self.run_dir.clone();

        tokio::spawn(async move {
            {
                let mut s = state.lock().await;
                if s.running {
                    warn!("experiment already running, ignoring start request");
                    return;
                }
                s.running = true;
            }
            info!(%mode, task = %config.task, "experiment started");

            let handle = RunHandle {
                state: state.clone(),
                feed: feed.clone(),
                run_dir,
            };
            engine(mode, config, handle).await;

            state.lock().await.running = false;
            let _ = feed.send(FeedEvent::RunFinished);
            info!("experiment finished");
        });
    }
}
