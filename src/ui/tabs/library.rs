use ratatui::{layout::Rect, text::Line, Frame};

use crate::app::App;
use crate::models::CatalogKind;
use crate::utils::truncate;

use super::render_entity_list;

/// The three lookup catalogs share one screen; `[b]` cycles which one
/// is shown. Ids are displayed because the exercise form references
/// catalog rows by id.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Line> = app
        .catalog_items
        .iter()
        .map(|item| Line::from(format!("{:>5}  {}", item.id, truncate(&item.name, 48))))
        .collect();

    let title = match app.catalog_kind {
        CatalogKind::BodyParts => "Library: Body Parts",
        CatalogKind::Categories => "Library: Categories",
        CatalogKind::Equipment => "Library: Equipment",
    };

    render_entity_list(
        frame,
        area,
        title,
        rows,
        app.catalog_selection,
        &app.requests.library,
        "[b] next catalog  [a]dd  [e]dit  [x] delete  [r] refresh",
    );
}
