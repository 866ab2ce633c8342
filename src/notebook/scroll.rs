//! Auto-advance decision for the timeline view.
//!
//! Thought text streams in at a fine-grained cadence; advancing the view on
//! every fragment makes scrolling jittery. Only structural milestones — a new
//! agent batch, a finished paper, or the very first item — warrant moving the
//! viewport. The tracker holds one integer of retained state (the timeline
//! length at the previous observation) so it is testable without a terminal.

use super::{ItemKind, TimelineItem};

/// Tunable advancement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvancePolicy {
    /// Fire one final advance when the run ends, so the trailing content is
    /// revealed even if the last item was an unremarkable thought. Off by
    /// default: the stock behavior never special-cases end of run.
    pub advance_on_finish: bool,
}

/// Decides, on each observation of the timeline, whether the view should
/// advance to reveal the newest content.
///
/// The signal is advisory: the tracker does not know how "advance" is
/// performed, only that the presentation layer should position the viewport
/// so the trailing edge of content meets the end of the visible area
/// (keeping continuation context above it where possible).
#[derive(Debug, Default)]
pub struct AdvanceTracker {
    previous_length: usize,
    policy: AdvancePolicy,
}

impl AdvanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: AdvancePolicy) -> Self {
        Self {
            previous_length: 0,
            policy,
        }
    }

    /// Observe the current timeline contents. Returns true exactly when the
    /// view should advance:
    ///
    /// - the timeline grew since the last observation, and
    /// - the newest item is `Agents` or `Paper`, or it is the very first
    ///   item regardless of tag (so the empty state hands off smoothly).
    ///
    /// A non-increasing length is a silent no-op — it legitimately happens
    /// on first observation and the tracker has no authority to reject
    /// producer state. `previous_length` is updated unconditionally.
    pub fn observe(&mut self, items: &[TimelineItem]) -> bool {
        let current = items.len();
        let grew = current > self.previous_length;
        self.previous_length = current;

        if !grew {
            return false;
        }
        match items.last().map(TimelineItem::kind) {
            Some(ItemKind::Agents) | Some(ItemKind::Paper) => true,
            Some(ItemKind::Thought) => current == 1,
            None => false,
        }
    }

    /// Notify the tracker that the run ended. Returns true if policy asks
    /// for one final advance.
    pub fn run_finished(&self) -> bool {
        self.policy.advance_on_finish
    }
}
