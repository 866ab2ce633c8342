//! The lab bench — ratatui presentation layer.
//!
//! Renders the run as a scrolling notebook: orchestrator thoughts, agent
//! sub-notebooks, and the finished paper. Read-only over run state — the
//! TUI never mutates the timeline, it only observes and decides where the
//! viewport sits.
//!
//! ## Architecture (TEA)
//!
//! Model (`App`) + Update (message handler) + View (render). Immediate
//! mode, no retained widget state. View models are lightweight copies of
//! `LabState` taken on tick — no lock held across a frame.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod markdown;
pub mod runner;
