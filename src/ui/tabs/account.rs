use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::render_footer;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let lines = match &app.account {
        Some(user) => vec![
            Line::from(""),
            field_line("Name", &user.name),
            field_line("Email", &user.email),
            field_line("Role", user.role.label()),
            field_line("Status", user.status.label()),
        ],
        None => vec![Line::from(""), Line::from("  (profile not loaded)")],
    };

    let block = Block::default()
        .title(" Account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    render_footer(
        frame,
        chunks[1],
        &app.requests.account,
        "[p] edit profile  [w] change password  [o] log out  [r] refresh",
    );
}

fn field_line<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", label), styles::muted_style()),
        Span::raw(value.to_string()),
    ])
}
