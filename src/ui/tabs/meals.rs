use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, MealBuilder, MealSection};
use crate::ui::styles;
use crate::utils::truncate;

use super::{render_entity_list, render_footer};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(builder) = &app.meal_builder {
        render_builder(frame, app, builder, area);
        return;
    }

    let rows: Vec<Line> = app
        .meals
        .iter()
        .map(|meal| {
            Line::from(format!(
                "{:<28} {:<14} {}",
                truncate(&meal.name, 28),
                truncate(&meal.category, 14),
                truncate(&meal.description, 36),
            ))
        })
        .collect();

    render_entity_list(
        frame,
        area,
        "Meals",
        rows,
        app.meals_selection,
        &app.requests.meals,
        "[a]dd  [e]dit  [x] delete  [r] refresh",
    );
}

/// The meal builder: ingredients on the left, numbered steps on the
/// right. Tab moves between the halves.
fn render_builder(frame: &mut Frame, app: &App, builder: &MealBuilder, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(format!(
        " New meal: {} ({})",
        builder.draft.name,
        if builder.draft.category.is_empty() {
            "uncategorized"
        } else {
            &builder.draft.category
        }
    ))
    .style(styles::title_style());
    frame.render_widget(header, chunks[0]);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let on_ingredients = builder.section == MealSection::Ingredients;

    render_side(
        frame,
        halves[0],
        " Ingredients ",
        builder
            .draft
            .ingredients
            .iter()
            .map(|ing| format!("{:<24} {}", truncate(&ing.name, 24), ing.amount))
            .collect(),
        on_ingredients,
        builder.selection,
    );

    render_side(
        frame,
        halves[1],
        " Steps ",
        builder
            .draft
            .instructions
            .iter()
            .map(|step| format!("{:>2}. {}", step.step_number, truncate(&step.instruction, 52)))
            .collect(),
        !on_ingredients,
        builder.selection,
    );

    render_footer(
        frame,
        chunks[2],
        &app.requests.meals,
        "[i] ingredient  [n] step  [J/K] move step  [x] remove  [Tab] switch  [s] save  [Esc] discard",
    );
}

fn render_side(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: Vec<String>,
    focused: bool,
    selection: usize,
) {
    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if focused && i == selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(row)).style(style)
        })
        .collect();

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(List::new(items).block(block), area);
}
