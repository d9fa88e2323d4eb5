//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use devjobs_core::notify::Notification;
use devjobs_core::view::Placeholder;
use devjobs_core::JobListPage;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::debug;

use super::app::App;
use super::event::{handle_key, poll_event, HandleResult};
use super::ui;
use crate::commands::Env;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the job browser until the user quits.
///
/// Notifications go to the status bar instead of stderr. The page's fetches
/// run on the runtime's other workers while this one blocks on input.
pub async fn run(env: &Env) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel::<Notification>();
    let deps = env.deps_with(Arc::new(tx));

    let mut terminal = init_terminal()?;
    let page = JobListPage::home(&deps);
    let mut app = App::new(Placeholder::Spinner);

    let result = tokio::task::block_in_place(|| run_loop(&mut terminal, &mut app, &page, rx));

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    page: &JobListPage,
    mut notifications: mpsc::UnboundedReceiver<Notification>,
) -> Result<()> {
    loop {
        app.apply_view(page.view());
        while let Ok(notification) = notifications.try_recv() {
            app.push_notification(notification);
        }

        app.on_tick();
        terminal.draw(|frame| ui::render(frame, app))?;

        // 100ms keeps the spinner moving and picks up finished fetches
        if let Some(Event::Key(key)) = poll_event(Duration::from_millis(100))? {
            match handle_key(app, key) {
                HandleResult::Quit => break,
                HandleResult::Continue => {}
                HandleResult::Refresh => {
                    debug!("refresh requested");
                    page.refresh();
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
