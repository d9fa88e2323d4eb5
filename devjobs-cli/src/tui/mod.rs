//! Job browser TUI
//!
//! The home page's job list in a terminal UI:
//! - list of job cards with a details pane for the selected one
//! - `r` refreshes ("See more jobs"), keeping the list on failure
//! - notifications land in the status bar instead of stderr

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;
