use ratatui::{layout::Rect, text::Line, Frame};

use crate::app::App;
use crate::utils::truncate;

use super::render_entity_list;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Line> = app
        .users
        .iter()
        .map(|user| {
            Line::from(format!(
                "{:<24} {:<30} {:<7} {}",
                truncate(&user.name, 24),
                truncate(&user.email, 30),
                user.role.label(),
                user.status.label(),
            ))
        })
        .collect();

    render_entity_list(
        frame,
        area,
        "Users",
        rows,
        app.users_selection,
        &app.requests.users,
        "[a]dd  [R] toggle role  [S] toggle status  [x] delete  [r] refresh",
    );
}
