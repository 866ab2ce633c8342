//! Timeline layout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ OBJECTIVE │ investigate sparse attention ...     │
//! ├─────────────────────────────────────────────────┤
//! │ ORCHESTRATOR                                     │
//! │   thought text (markdown)                        │
//! │ ── SUB-AGENTS DEPLOYED ──                        │
//! │ ▌ AGENT │ hypothesis                             │
//! │   · thinking / $ command / → output cells        │
//! │ ══ RESEARCH PAPER ══                             │
//! ├─────────────────────────────────────────────────┤
//! │ ● orchestrating   3 items · 2 agents   j/k G q   │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Before the first timeline item arrives, the content area shows the
//! start form instead (task input, mode and test-mode toggles).

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::notebook::output::resolve_overwrites;
use crate::notebook::{Agent, ExperimentStep, TimelineItem};
use crate::orchestrator::ExperimentMode;

use super::app::App;
use super::markdown::render_markdown;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // objective header
            Constraint::Min(5),    // timeline (or start form)
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_header(f, app, outer[0]);
    if app.showing_form() {
        draw_form(f, app, outer[1]);
    } else {
        draw_timeline(f, app, outer[1]);
    }
    draw_status(f, app, outer[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let Some(objective) = &app.objective else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            " OBJECTIVE ",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::raw(objective.clone()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Start form: task input plus mode/test-mode toggles, centered.
fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let box_width = area.width.min(72);
    let box_height = 9u16;
    let x = area.x + (area.width.saturating_sub(box_width)) / 2;
    let y = area.y + (area.height.saturating_sub(box_height)) / 2;
    let form_area = Rect::new(x, y, box_width, box_height.min(area.height));

    let mode_label = match app.mode {
        ExperimentMode::Single => "Single Agent",
        ExperimentMode::Orchestrator => "Agent Swarm",
    };
    let test_label = if app.test_mode { "TEST MODE" } else { "LIVE MODE" };

    let lines = vec![
        Line::from(Span::styled(
            "Research Objective",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Describe your query; the orchestrator decomposes it and launches agents.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(app.task_input.clone()),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[Tab] ", Style::default().fg(Color::DarkGray)),
            Span::styled(mode_label, Style::default().fg(Color::Cyan)),
            Span::styled("   [^T] ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                test_label,
                if app.test_mode {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ),
            Span::styled("   [Enter] start   [Esc] quit", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let para = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);
    f.render_widget(para, form_area);
}

fn draw_timeline(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = timeline_lines(app);
    app.viewport_height = area.height;

    let total = lines.len() as u16;
    let max_scroll = total.saturating_sub(area.height);
    if app.scroll_to_latest {
        // Advance: trailing edge of content meets the end of the viewport,
        // keeping continuation context visible above.
        app.timeline_scroll = max_scroll;
        app.scroll_to_latest = false;
    }
    app.timeline_scroll = app.timeline_scroll.min(max_scroll);

    let para = Paragraph::new(lines).scroll((app.timeline_scroll, 0));
    f.render_widget(para, area);
}

/// Build the full timeline as styled lines. Pure view of app state.
pub fn timeline_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for item in &app.timeline {
        match item {
            TimelineItem::Thought { content } => {
                lines.push(Line::from(Span::styled(
                    "ORCHESTRATOR",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
                )));
                lines.extend(render_markdown(content));
                lines.push(Line::raw(""));
            }
            TimelineItem::Agents { agent_ids } => {
                lines.push(Line::from(Span::styled(
                    "── SUB-AGENTS DEPLOYED ──",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::raw(""));
                for id in agent_ids {
                    // Announced before materialized: skip until the record
                    // lands in the registry.
                    let Some(agent) = app.agents.get(id) else {
                        continue;
                    };
                    lines.extend(agent_lines(agent));
                }
            }
            TimelineItem::Paper { content } => {
                lines.push(Line::from(Span::styled(
                    "══ RESEARCH PAPER ══",
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::raw(""));
                lines.extend(render_markdown(content));
                lines.push(Line::raw(""));
            }
        }
    }

    if app.running && !app.timeline.is_empty() {
        lines.push(Line::from(Span::styled(
            "● orchestrating…",
            Style::default().fg(Color::Green),
        )));
    }

    lines
}

/// One agent's sub-notebook: hypothesis title plus its step cells.
fn agent_lines(agent: &Agent) -> Vec<Line<'static>> {
    let title = if agent.hypothesis.is_empty() {
        agent.id.clone()
    } else {
        agent.hypothesis.clone()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("▌ AGENT ", Style::default().fg(Color::Cyan)),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(title, Style::default().add_modifier(Modifier::ITALIC)),
    ])];

    for step in agent.steps() {
        match step {
            ExperimentStep::Thought { content } => {
                lines.push(Line::from(Span::styled(
                    "  · thinking",
                    Style::default().fg(Color::DarkGray),
                )));
                lines.extend(render_markdown(content));
            }
            ExperimentStep::Code { content } => {
                for code_line in content.lines() {
                    lines.push(Line::from(vec![
                        Span::styled("  $ ", Style::default().fg(Color::Yellow)),
                        Span::styled(
                            code_line.to_string(),
                            Style::default().fg(Color::Yellow),
                        ),
                    ]));
                }
            }
            ExperimentStep::Result { content } => {
                lines.push(Line::from(Span::styled(
                    "  → output",
                    Style::default().fg(Color::DarkGray),
                )));
                for out_line in resolve_overwrites(content).lines() {
                    lines.push(Line::from(Span::styled(
                        format!("    {out_line}"),
                        Style::default().fg(Color::Gray),
                    )));
                }
            }
        }
    }
    lines.push(Line::raw(""));
    lines
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let state_span = if app.running {
        Span::styled(
            " ● orchestrating ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else if app.timeline.is_empty() {
        Span::styled(" idle ", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(" done ", Style::default().fg(Color::Cyan))
    };

    let counts = format!(
        " {} items · {} agents ",
        app.timeline.len(),
        app.agents.len()
    );
    let hints = if app.showing_form() {
        " Enter:start  Tab:mode  ^T:test  Esc:quit "
    } else {
        " j/k:scroll  G:latest  q:quit "
    };

    let line = Line::from(vec![
        state_span,
        Span::styled(counts, Style::default().fg(Color::DarkGray)),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ExperimentConfig;

    fn lines_to_text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(ExperimentConfig::for_task(""), ExperimentMode::Orchestrator)
    }

    #[test]
    fn missing_agents_are_skipped_silently() {
        let mut app = app();
        app.timeline.push(TimelineItem::Agents {
            agent_ids: vec!["present".into(), "absent".into()],
        });
        let mut agent = Agent::new("present", "Known hypothesis");
        agent.push_step(ExperimentStep::Code {
            content: "echo hi".into(),
        });
        app.agents.insert("present".into(), agent);

        let text = lines_to_text(&timeline_lines(&app));
        assert!(text.contains("Known hypothesis"));
        assert!(text.contains("echo hi"));
        assert!(!text.contains("absent"));
    }

    #[test]
    fn result_output_is_normalized_for_display() {
        let mut app = app();
        app.timeline.push(TimelineItem::Agents {
            agent_ids: vec!["a1".into()],
        });
        let mut agent = Agent::new("a1", "h");
        agent.push_step(ExperimentStep::Result {
            content: "Loading... 10%\rLoading... 100%\n".into(),
        });
        app.agents.insert("a1".into(), agent);

        let text = lines_to_text(&timeline_lines(&app));
        assert!(text.contains("Loading... 100%"));
        assert!(!text.contains("10%"));
    }

    #[test]
    fn running_indicator_only_during_a_run() {
        let mut app = app();
        app.timeline.push(TimelineItem::Thought { content: "t".into() });

        app.running = true;
        assert!(lines_to_text(&timeline_lines(&app)).contains("orchestrating"));

        app.running = false;
        assert!(!lines_to_text(&timeline_lines(&app)).contains("orchestrating"));
    }

    #[test]
    fn paper_renders_with_banner() {
        let mut app = app();
        app.timeline.push(TimelineItem::Paper {
            content: "# Findings\n\nAll good.".into(),
        });
        let text = lines_to_text(&timeline_lines(&app));
        assert!(text.contains("RESEARCH PAPER"));
        assert!(text.contains("Findings"));
    }
}
