//! labbench — a lab-notebook TUI for autonomous multi-agent research runs.
//!
//! An orchestrator decomposes a research task, launches sub-agents, and
//! narrates the run as an append-only timeline; labbench models that
//! timeline, normalizes raw terminal output for static display, and decides
//! when the view should advance.

pub mod config;
pub mod notebook;
pub mod orchestrator;
pub mod tui;
