//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::orchestrator::ExperimentMode;

use super::app::App;

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Global bindings
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.showing_form() {
        handle_form_key(app, key);
    } else {
        handle_timeline_key(app, key);
    }
}

/// Empty-state form: type the objective, toggle mode/test-mode, start.
fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => {
            app.task_input.pop();
        }
        KeyCode::Tab => {
            app.mode = match app.mode {
                ExperimentMode::Single => ExperimentMode::Orchestrator,
                ExperimentMode::Orchestrator => ExperimentMode::Single,
            };
        }
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.test_mode = !app.test_mode;
        }
        KeyCode::Char(c) => app.task_input.push(c),
        _ => {}
    }
}

/// Timeline view: scroll and quit.
fn handle_timeline_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Char('G') | KeyCode::End => app.jump_to_latest(),
        KeyCode::Home => {
            app.scroll_to_latest = false;
            app.timeline_scroll = 0;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ExperimentConfig;
    use crate::notebook::TimelineItem;

    fn app() -> App {
        App::new(ExperimentConfig::for_task(""), ExperimentMode::Orchestrator)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_builds_the_task() {
        let mut app = app();
        for c in "fp8".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.task_input, "fp8");

        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.task_input, "fp");
    }

    #[test]
    fn tab_toggles_mode() {
        let mut app = app();
        assert_eq!(app.mode, ExperimentMode::Orchestrator);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.mode, ExperimentMode::Single);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.mode, ExperimentMode::Orchestrator);
    }

    #[test]
    fn ctrl_t_toggles_test_mode() {
        let mut app = app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL),
        );
        assert!(app.test_mode);
    }

    #[test]
    fn enter_submits() {
        let mut app = app();
        app.task_input = "probe".into();
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.pending_start.is_some());
    }

    #[test]
    fn q_quits_only_in_timeline_view() {
        let mut app = app();
        // Form view: 'q' is just a letter.
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.task_input, "q");

        // Timeline view: 'q' quits.
        app.timeline.push(TimelineItem::Thought { content: "t".into() });
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let mut app = app();
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn scroll_keys_move_timeline() {
        let mut app = app();
        app.timeline.push(TimelineItem::Thought { content: "t".into() });
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('k')));
        assert_eq!(app.timeline_scroll, 1);

        handle_key(&mut app, key(KeyCode::End));
        assert!(app.scroll_to_latest);
    }
}
