use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::render_footer;

/// Entity-count cards in a 4x2 grid, fed by `/statistics`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let rows = app.stats.rows();
    render_card_row(frame, chunks[0], &rows[..4]);
    render_card_row(frame, chunks[1], &rows[4..]);

    render_footer(
        frame,
        chunks[3],
        &app.requests.dashboard,
        "[r] refresh | [2-8] screens | [?] help",
    );
}

fn render_card_row(frame: &mut Frame, area: Rect, cards: &[(&'static str, u64)]) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    for (i, (label, count)) in cards.iter().enumerate() {
        let block = Block::default()
            .title(format!(" {} ", label))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));

        let body = Paragraph::new(format!("\n{}", count))
            .style(styles::highlight_style())
            .centered()
            .block(block);

        frame.render_widget(body, columns[i]);
    }
}
