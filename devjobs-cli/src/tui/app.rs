//! Browser state
//!
//! The job list itself lives in the page's fetch controller; [`App`] only
//! keeps the last rendered region plus selection and status bar state.

use devjobs_core::notify::Notification;
use devjobs_core::view::{Keyed, ListRegion, Placeholder};
use devjobs_core::JobCard;

pub struct App {
    pub region: ListRegion<JobCard>,
    pub selected_index: usize,
    /// Frames drawn so far; drives the spinner
    pub tick: usize,
    /// Last notification, shown in the status bar until the next one
    pub status: Option<Notification>,
    pub show_preview: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(placeholder: Placeholder) -> Self {
        Self {
            region: ListRegion::Loading(placeholder),
            selected_index: 0,
            tick: 0,
            status: None,
            show_preview: true,
            should_quit: false,
        }
    }

    /// Take a fresh render of the page, keeping the selection on the same
    /// job when it is still listed.
    pub fn apply_view(&mut self, region: ListRegion<JobCard>) {
        if region == self.region {
            return;
        }
        let selected_key = self.selected().map(|keyed| keyed.key.clone());
        self.region = region;

        let items = self.region.items();
        let clamped = self.selected_index.min(items.len().saturating_sub(1));
        let index = selected_key
            .and_then(|key| items.iter().position(|keyed| keyed.key == key))
            .unwrap_or(clamped);
        self.selected_index = index;
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.status = Some(notification);
    }

    pub fn is_loading(&self) -> bool {
        self.region.is_loading()
    }

    pub fn len(&self) -> usize {
        self.region.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selected(&self) -> Option<&Keyed<JobCard>> {
        self.region.items().get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        if !self.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.is_empty() {
            self.selected_index = self
                .selected_index
                .checked_sub(1)
                .unwrap_or(self.len() - 1);
        }
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }
}
