//! Per-screen renderers.

pub mod account;
pub mod dashboard;
pub mod exercises;
pub mod library;
pub mod meals;
pub mod programs;
pub mod users;
pub mod workouts;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::RequestState;

use super::styles;

/// Shared scaffolding for the entity list screens: a bordered list with
/// the current selection highlighted, and a one-line footer showing the
/// screen's last error (if any) or the key hints.
pub(crate) fn render_entity_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: Vec<Line>,
    selection: usize,
    request: &RequestState,
    hints: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let count = items.len();
    let title = if request.in_flight {
        format!(" {} (loading...) ", title)
    } else {
        format!(" {} ({}) ", title, count)
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(selection));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    render_footer(frame, chunks[1], request, hints);
}

/// One-line footer: the screen's error in red, or the key hints muted.
pub(crate) fn render_footer(frame: &mut Frame, area: Rect, request: &RequestState, hints: &str) {
    let footer = match &request.error {
        Some(error) => Paragraph::new(format!(" {}", error)).style(styles::error_style()),
        None => Paragraph::new(format!(" {}", hints)).style(styles::muted_style()),
    };
    frame.render_widget(footer, area);
}
