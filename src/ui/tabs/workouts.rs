use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, WorkoutBuilder};
use crate::ui::styles;
use crate::utils::truncate;

use super::{render_entity_list, render_footer};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(builder) = &app.workout_builder {
        render_builder(frame, app, builder, area);
        return;
    }

    let rows: Vec<Line> = app
        .workouts
        .iter()
        .map(|workout| {
            Line::from(format!(
                "{:<28} {:<12} {}",
                truncate(&workout.name, 28),
                truncate(&workout.difficulty, 12),
                truncate(&workout.description, 36),
            ))
        })
        .collect();

    render_entity_list(
        frame,
        area,
        "Workouts",
        rows,
        app.workouts_selection,
        &app.requests.workouts,
        "[a]dd  [e]dit  [x] delete  [r] refresh",
    );
}

/// The workout builder: a flat, ordered list of exercise slots.
fn render_builder(frame: &mut Frame, app: &App, builder: &WorkoutBuilder, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(format!(
        " New workout: {} ({})",
        builder.draft.name,
        if builder.draft.difficulty.is_empty() {
            "unrated"
        } else {
            &builder.draft.difficulty
        }
    ))
    .style(styles::title_style());
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = builder
        .draft
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let work = match (slot.reps, slot.duration_seconds) {
                (Some(reps), _) => format!("{}x{} reps", slot.sets_number, reps),
                (None, Some(secs)) => format!("{}x{}s", slot.sets_number, secs),
                (None, None) => "-".to_string(),
            };
            let text = format!(
                "{:>2}. {:<28} {} (rest {}s)",
                slot.position,
                truncate(&slot.exercise_name, 28),
                work,
                slot.rest_seconds
            );
            let style = if i == builder.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(text)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Exercises ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(builder.selection));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    render_footer(
        frame,
        chunks[2],
        &app.requests.workouts,
        "[e] exercise  [J/K] move  [x] remove  [s] save  [Esc] discard",
    );
}
