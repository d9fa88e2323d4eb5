//! Terminal output helpers for the devjobs CLI
//!
//! Progress feedback and notification rendering, with automatic quiet mode
//! detection for scripted use.
//!
//! # Quiet Mode
//!
//! Spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `DEVJOBS_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)
//!
//! Notifications are never suppressed by quiet mode; they are the page's
//! answer to the user. `--json` swaps them for [`devjobs_core::notify::Silent`].

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use devjobs_core::notify::{Level, Notification, Notifier};
use devjobs_core::view::Placeholder;
use indicatif::{ProgressBar, ProgressStyle};

/// Global quiet mode state
static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Global JSON output state
static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Initialize quiet mode from flags and environment
///
/// Call this once at startup with the --quiet flag value.
/// Will also check DEVJOBS_QUIET env var and TTY status.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("DEVJOBS_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

/// Check if we're in quiet mode
pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

pub fn init_json_mode(json: bool) {
    JSON_MODE.set(json).ok();
}

pub fn is_json_mode() -> bool {
    *JSON_MODE.get().unwrap_or(&false)
}

/// Create a spinner that respects quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Show a page's loading placeholder while its first fetch is out.
///
/// The spinner variant animates; a message placeholder is printed once.
pub fn placeholder(placeholder: Placeholder, what: &str) -> Option<ProgressBar> {
    match placeholder {
        Placeholder::Spinner => spinner(format!("Fetching {}", what)),
        Placeholder::Message(text) => {
            if !is_quiet() {
                eprintln!("{}", text);
            }
            None
        }
    }
}

/// Remove a spinner without leaving a line behind
pub fn finish_clear(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

/// Run a submission with a spinner that is cleared when it settles.
///
/// The outcome itself is reported through the page's notifier.
pub async fn with_spinner_async<T, E>(
    msg: impl Into<String>,
    f: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let pb = spinner(msg);
    let result = f.await;
    finish_clear(pb);
    result
}

fn symbol(level: Level) -> &'static str {
    match level {
        Level::Success => "✓",
        Level::Info => "•",
        Level::Error => "✗",
    }
}

/// Render a notification as a single terminal line.
pub fn notification_line(notification: &Notification) -> String {
    format!("{} {}", symbol(notification.level), notification.message)
}

/// Prints notifications to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", notification_line(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_lines_carry_level_symbol() {
        assert_eq!(
            notification_line(&Notification::success("Login Successful")),
            "✓ Login Successful"
        );
        assert_eq!(
            notification_line(&Notification::error("could not get jobs")),
            "✗ could not get jobs"
        );
        assert_eq!(notification_line(&Notification::info("Logged out")), "• Logged out");
    }

    #[test]
    fn test_quiet_mode_default() {
        // stderr is not a terminal under the test harness
        init_quiet_mode(false);
    }
}
