use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, BuilderRow, ProgramBuilder};
use crate::ui::styles;
use crate::utils::truncate;

use super::{render_entity_list, render_footer};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(builder) = &app.program_builder {
        render_builder(frame, app, builder, area);
        return;
    }

    let rows: Vec<Line> = app
        .programs
        .iter()
        .map(|program| {
            Line::from(format!(
                "{:<28} {:>3} wk  {}",
                truncate(&program.name, 28),
                program.total_weeks,
                truncate(&program.description, 38),
            ))
        })
        .collect();

    render_entity_list(
        frame,
        area,
        "Programs",
        rows,
        app.programs_selection,
        &app.requests.programs,
        "[a]dd  [e]dit  [x] delete  [r] refresh",
    );
}

/// The program builder: the week -> day -> exercise tree flattened into
/// an indented, selectable list.
fn render_builder(frame: &mut Frame, app: &App, builder: &ProgramBuilder, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(format!(
        " New program: {} ({} weeks)",
        builder.draft.name,
        builder.draft.total_weeks()
    ))
    .style(styles::title_style());
    frame.render_widget(header, chunks[0]);

    let rows = builder.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let text = match *row {
                BuilderRow::Week(wi) => {
                    let week = &builder.draft.weeks[wi];
                    format!("Week {}: {}", week.week_number, week.name)
                }
                BuilderRow::Day(wi, di) => {
                    let day = &builder.draft.weeks[wi].days[di];
                    format!("  Day {} ({} exercises)", day.day_number, day.exercises.len())
                }
                BuilderRow::Slot(wi, di, si) => {
                    let slot = &builder.draft.weeks[wi].days[di].exercises[si];
                    let work = match (slot.reps, slot.duration_seconds) {
                        (Some(reps), _) => format!("{} reps", reps),
                        (None, Some(secs)) => format!("{}s", secs),
                        (None, None) => "-".to_string(),
                    };
                    format!(
                        "    {}. {} ({}, rest {}s)",
                        slot.position,
                        truncate(&slot.exercise_name, 28),
                        work,
                        slot.rest_seconds
                    )
                }
            };

            let style = if i == builder.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(text)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(" Weeks ")
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
        &app.requests.programs,
        "[w] week  [d] day  [e] exercise  [J/K] move  [x] remove  [s] save  [Esc] discard",
    );
}
