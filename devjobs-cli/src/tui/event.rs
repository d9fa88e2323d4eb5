//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::App;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Fetch the job list again ("See more jobs")
    Refresh,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => HandleResult::Quit,

        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            HandleResult::Continue
        }

        KeyCode::Char('r') | KeyCode::F(5) => HandleResult::Refresh,

        KeyCode::Char('p') => {
            app.toggle_preview();
            HandleResult::Continue
        }

        _ => HandleResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devjobs_core::view::Placeholder;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_actions() {
        let mut app = App::new(Placeholder::Spinner);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('r'))), HandleResult::Refresh);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), HandleResult::Quit);
        assert_eq!(
            handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            HandleResult::Quit
        );
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('x'))), HandleResult::Continue);
    }

    #[test]
    fn preview_toggles() {
        let mut app = App::new(Placeholder::Spinner);
        assert!(app.show_preview);
        handle_key(&mut app, press(KeyCode::Char('p')));
        assert!(!app.show_preview);
    }
}
