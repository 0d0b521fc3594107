use ratatui::{layout::Rect, text::Line, Frame};

use crate::app::App;
use crate::utils::truncate;

use super::render_entity_list;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Line> = app
        .exercises
        .iter()
        .map(|exercise| {
            Line::from(format!(
                "{:>5}  {:<28} {:<9} {}",
                exercise.id,
                truncate(&exercise.name, 28),
                exercise.status_label(),
                truncate(&exercise.description, 40),
            ))
        })
        .collect();

    render_entity_list(
        frame,
        area,
        "Exercises",
        rows,
        app.exercises_selection,
        &app.requests.exercises,
        "[a]dd  [e]dit  [x] delete  [r] refresh",
    );
}
