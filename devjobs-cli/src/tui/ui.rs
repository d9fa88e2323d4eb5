//! UI rendering using ratatui

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use devjobs_core::notify::Level;
use devjobs_core::view::{ListRegion, Placeholder};

use super::app::App;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for informational status
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Error color
const FAILURE: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    if app.show_preview {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        render_list(frame, app, content_chunks[0]);
        render_preview(frame, app, content_chunks[1]);
    } else {
        render_list(frame, app, chunks[1]);
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " DevJobs ",
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )];
    if !app.is_loading() {
        spans.push(Span::styled(
            format!(" {} jobs", app.len()),
            Style::default().fg(SECONDARY),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Text shown in the list region while the page is loading.
pub fn placeholder_text(placeholder: Placeholder, tick: usize) -> String {
    match placeholder {
        Placeholder::Spinner => format!("  {}", SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]),
        Placeholder::Message(text) => format!("  {}", text),
    }
}

/// Keep the selected row inside the visible window.
fn scroll_offset(selected: usize, visible_height: usize) -> usize {
    if visible_height == 0 {
        return 0;
    }
    selected.saturating_sub(visible_height - 1)
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Jobs ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    let visible_height = inner.height as usize;

    let cards = match &app.region {
        ListRegion::Loading(placeholder) => {
            let line = ListItem::new(Line::from(Span::styled(
                placeholder_text(*placeholder, app.tick),
                Style::default().fg(ACCENT),
            )));
            frame.render_widget(List::new(vec![line]).block(block), area);
            return;
        }
        ListRegion::Items(cards) => cards,
    };

    let offset = scroll_offset(app.selected_index, visible_height);
    let items: Vec<ListItem> = cards
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(idx, keyed)| {
            let style = if idx == app.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let content = format!("{} - {}", keyed.view.title, keyed.view.company);
            ListItem::new(Line::from(Span::styled(content, style)))
        })
        .collect();

    // empty listings render no cards; the hint sits outside the item list
    let list = if items.is_empty() {
        let hint = ListItem::new(Line::from(Span::styled(
            "  No jobs to show (r to refresh)",
            Style::default().fg(DIM),
        )));
        List::new(vec![hint]).block(block)
    } else {
        List::new(items).block(block)
    };

    frame.render_widget(list, area);

    if cards.len() > visible_height {
        let indicator = format!(" {}/{} ", app.selected_index + 1, cards.len());
        let indicator_area = Rect {
            x: area.x + area.width.saturating_sub(indicator.len() as u16 + 2),
            y: area.y,
            width: indicator.len() as u16 + 2,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(indicator).style(Style::default().fg(DIM)),
            indicator_area,
        );
    }
}

fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.selected() {
        Some(keyed) => (format!(" {} ", keyed.view.title), keyed.view.to_string()),
        None => (" Details ".to_string(), "Select a job to see its details".to_string()),
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(SECONDARY))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_indicator = if app.is_loading() {
        Span::styled(" LOADING ", Style::default().bg(HIGHLIGHT).fg(Color::Black))
    } else {
        Span::styled(" READY ", Style::default().bg(SUCCESS).fg(Color::Black))
    };

    let status = match &app.status {
        Some(notification) => {
            let color = match notification.level {
                Level::Success => SUCCESS,
                Level::Info => HIGHLIGHT,
                Level::Error => FAILURE,
            };
            Span::styled(notification.message.as_str(), Style::default().fg(color))
        }
        None => Span::raw(""),
    };

    let line = Line::from(vec![
        mode_indicator,
        Span::raw(" "),
        Span::styled("j/k:nav  r:refresh  p:details  q:quit", Style::default().fg(DIM)),
        Span::raw("  "),
        status,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_advances_with_ticks() {
        assert_ne!(
            placeholder_text(Placeholder::Spinner, 0),
            placeholder_text(Placeholder::Spinner, 1)
        );
        assert_eq!(
            placeholder_text(Placeholder::LANDING, 7),
            "  Loading please wait"
        );
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(12, 10), 3);
        assert_eq!(scroll_offset(5, 0), 0);
    }
}
