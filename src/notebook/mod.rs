//! Notebook data model — the append-only research timeline.
//!
//! The orchestrator narrates a run as a sequence of `TimelineItem`s; each
//! launched sub-agent keeps its own ordered log of `ExperimentStep`s. Both
//! sequences only ever grow: append is the single write operation, nothing is
//! removed, reordered, or edited in place, and index order is emission order.
//! Appends are serialized by the `LabState` mutex in the orchestrator module,
//! so concurrent producers can never race for the same index.

pub mod output;
pub mod scroll;

/// Opaque agent identifier. The producer mints these (UUIDs in practice);
/// the display side only ever uses them as registry keys.
pub type AgentId = String;

/// One entry in the orchestrator-level timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineItem {
    /// Narrative reasoning from the orchestrator (markdown).
    Thought { content: String },
    /// A batch of sub-agents was launched. References agents by id only —
    /// the announced agent may not have materialized in the registry yet.
    Agents { agent_ids: Vec<AgentId> },
    /// A finalized research artifact (markdown).
    Paper { content: String },
}

/// Variant tag of a `TimelineItem`, for dispatch without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Thought,
    Agents,
    Paper,
}

impl TimelineItem {
    /// The variant tag of this item.
    pub fn kind(&self) -> ItemKind {
        match self {
            TimelineItem::Thought { .. } => ItemKind::Thought,
            TimelineItem::Agents { .. } => ItemKind::Agents,
            TimelineItem::Paper { .. } => ItemKind::Paper,
        }
    }
}

/// One line item in a single agent's sub-notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentStep {
    /// Agent reasoning (markdown).
    Thought { content: String },
    /// A command the agent executed.
    Code { content: String },
    /// Raw captured output of that command. May contain carriage-return
    /// overwrite sequences; pass through `output::resolve_overwrites`
    /// before display.
    Result { content: String },
}

/// A sub-agent's record: the hypothesis it is investigating plus its
/// strictly append-ordered step log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub hypothesis: String,
    steps: Vec<ExperimentStep>,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, hypothesis: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hypothesis: hypothesis.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step. The only mutation an agent log supports.
    pub fn push_step(&mut self, step: ExperimentStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ExperimentStep] {
        &self.steps
    }
}

/// The orchestrator-level timeline: an append-only ordered container.
///
/// The item vector is private so append stays the only write path. Stored
/// items are immutable — `get(i)` returns the same value for a given `i`
/// for the life of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    items: Vec<TimelineItem>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, assigning it the next index.
    pub fn append(&mut self, item: TimelineItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimelineItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    /// Tag of the most recently appended item, if any.
    pub fn last_kind(&self) -> Option<ItemKind> {
        self.items.last().map(TimelineItem::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timeline_is_empty() {
        let timeline = Timeline::new();
        assert!(timeline.is_empty());
        assert_eq!(timeline.len(), 0);
        assert_eq!(timeline.last_kind(), None);
    }

    #[test]
    fn append_assigns_sequential_indices() {
        let mut timeline = Timeline::new();
        timeline.append(TimelineItem::Thought {
            content: "Hypothesis A".into(),
        });
        timeline.append(TimelineItem::Agents {
            agent_ids: vec!["a1".into(), "a2".into()],
        });

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.get(0).unwrap().kind(), ItemKind::Thought);
        assert_eq!(timeline.get(1).unwrap().kind(), ItemKind::Agents);
        assert_eq!(timeline.get(2), None);
    }

    #[test]
    fn last_kind_tracks_newest_item() {
        let mut timeline = Timeline::new();
        timeline.append(TimelineItem::Thought {
            content: "t".into(),
        });
        assert_eq!(timeline.last_kind(), Some(ItemKind::Thought));
        timeline.append(TimelineItem::Paper {
            content: "# Results".into(),
        });
        assert_eq!(timeline.last_kind(), Some(ItemKind::Paper));
    }

    #[test]
    fn stored_items_never_change_retroactively() {
        let mut timeline = Timeline::new();
        timeline.append(TimelineItem::Thought {
            content: "first".into(),
        });
        let snapshot = timeline.get(0).cloned().unwrap();

        for i in 0..50 {
            timeline.append(TimelineItem::Thought {
                content: format!("later {i}"),
            });
        }

        assert_eq!(timeline.get(0), Some(&snapshot));
    }

    #[test]
    fn agent_steps_append_in_order() {
        let mut agent = Agent::new("a1", "Sparse attention scales sublinearly");
        agent.push_step(ExperimentStep::Thought {
            content: "Set up the benchmark.".into(),
        });
        agent.push_step(ExperimentStep::Code {
            content: "python bench.py --heads 16".into(),
        });
        agent.push_step(ExperimentStep::Result {
            content: "done\n".into(),
        });

        assert_eq!(agent.steps().len(), 3);
        assert!(matches!(agent.steps()[1], ExperimentStep::Code { .. }));
    }
}
