use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Form, LoginFocus, Route, Screen};
use crate::models::CatalogItem;

use super::styles;
use super::tabs::{account, dashboard, exercises, library, meals, programs, users, workouts};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Length(2), // Screen tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_screen_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::EditingForm) {
        if let Some(form) = &app.form {
            render_form_overlay(frame, app, form);
        }
    }

    if matches!(app.state, AppState::ConfirmingDelete) {
        render_delete_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  fitdesk";
    let help_hint = "[?] Help";

    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_screen_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let screens = [
        ("1", Screen::Dashboard),
        ("2", Screen::Exercises),
        ("3", Screen::Library),
        ("4", Screen::Meals),
        ("5", Screen::Programs),
        ("6", Screen::Workouts),
        ("7", Screen::Users),
        ("8", Screen::Account),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, screen)) in screens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = app.current_screen() == Some(*screen);
        let label = format!("[{}] {}", key, screen.title());
        spans.push(Span::styled(label, styles::tab_style(selected)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Login => {
            // The login overlay carries the content; dim backdrop only
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styles::muted_style());
            frame.render_widget(block, area);
        }
        Route::Screen(Screen::Dashboard) => dashboard::render(frame, app, area),
        Route::Screen(Screen::Exercises) => exercises::render(frame, app, area),
        Route::Screen(Screen::Library) => library::render(frame, app, area),
        Route::Screen(Screen::Meals) => meals::render(frame, app, area),
        Route::Screen(Screen::Programs) => programs::render(frame, app, area),
        Route::Screen(Screen::Workouts) => workouts::render(frame, app, area),
        Route::Screen(Screen::Users) => users::render(frame, app, area),
        Route::Screen(Screen::Account) => account::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status_message {
        Some(message) => format!(" {}", message),
        None => match app.route {
            Route::Login => " Not signed in".to_string(),
            Route::Screen(screen) => format!(" {} | [q] quit", screen.title()),
        },
    };
    frame.render_widget(Paragraph::new(text).style(styles::muted_style()), area);
}

// ============================================================================
// Overlays
// ============================================================================

/// Centered overlay rectangle of the given size, clamped to the frame.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(52, 12, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Sign in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let email_focused = app.login_focus == LoginFocus::Email;
    let password_focused = app.login_focus == LoginFocus::Password;
    let button_focused = app.login_focus == LoginFocus::Button;

    let masked: String = "*".repeat(app.login_password.len());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Email:    ", styles::muted_style()),
            Span::styled(
                format!("{:<36}", app.login_email),
                styles::input_style(email_focused),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Password: ", styles::muted_style()),
            Span::styled(format!("{:<36}", masked), styles::input_style(password_focused)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "[ Sign in ]",
                if button_focused {
                    styles::selected_style()
                } else {
                    styles::muted_style()
                },
            ),
        ]),
        Line::from(""),
    ];

    if let Some(error) = &app.login_error {
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  [Tab] next field  [Enter] submit",
            styles::muted_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, app: &App, form: &Form) {
    // The exercise form gets a wider overlay with the option catalogs
    // listed beside it
    let options = exercise_option_panel(app, form);
    let width = if options.is_some() { 96 } else { 56 };
    let height = (form.fields.len() as u16) * 2 + 6;

    let area = centered_rect(width, height.max(10), frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", form.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (form_area, options_area) = if options.is_some() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(52), Constraint::Min(20)])
            .split(inner);
        (halves[0], Some(halves[1]))
    } else {
        (inner, None)
    };

    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let shown = if field.masked {
            "*".repeat(field.value.len())
        } else {
            field.value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<18}", field.label), styles::muted_style()),
            Span::styled(format!("{:<30}", shown), styles::input_style(i == form.focus)),
        ]));
        lines.push(Line::from(""));
    }

    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        ))),
        None => lines.push(Line::from(Span::styled(
            " [Tab] next field  [Enter] submit  [Esc] cancel",
            styles::muted_style(),
        ))),
    }

    frame.render_widget(Paragraph::new(lines), form_area);

    if let (Some(area), Some(lines)) = (options_area, options) {
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Option lists (id + name) shown beside the exercise create form.
fn exercise_option_panel<'a>(app: &'a App, form: &Form) -> Option<Vec<Line<'a>>> {
    if !form.title.contains("Exercise") {
        return None;
    }
    let (categories, body_parts, equipment) = app.exercise_options.as_ref()?;

    let mut lines = vec![Line::from("")];
    push_options(&mut lines, "Categories", categories);
    push_options(&mut lines, "Body parts", body_parts);
    push_options(&mut lines, "Equipment", equipment);
    Some(lines)
}

fn push_options<'a>(lines: &mut Vec<Line<'a>>, label: &'static str, items: &'a [CatalogItem]) {
    lines.push(Line::from(Span::styled(
        format!(" {}:", label),
        styles::highlight_style(),
    )));
    for item in items.iter().take(6) {
        lines.push(Line::from(format!("   {:>4} {}", item.id, item.name)));
    }
    if items.len() > 6 {
        lines.push(Line::from(Span::styled(
            format!("   ... {} more", items.len() - 6),
            styles::muted_style(),
        )));
    }
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let Some(target) = &app.delete_target else {
        return;
    };

    let area = centered_rect(50, 7, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Confirm delete ")
        .title_style(styles::error_style())
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    let lines = vec![
        Line::from(""),
        Line::from(format!("  Delete \"{}\"?", target.label)),
        Line::from(""),
        Line::from(Span::styled(
            "  [y] delete  [n] cancel",
            styles::muted_style(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect(40, 7, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Quit ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let lines = vec![
        Line::from(""),
        Line::from("  Quit fitdesk?"),
        Line::from(""),
        Line::from(Span::styled("  [y] quit  [n] stay", styles::muted_style())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(62, 18, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let lines = vec![
        Line::from(""),
        Line::from("  1-8        switch screen"),
        Line::from("  j/k        move selection"),
        Line::from("  PgUp/PgDn  move selection by page"),
        Line::from("  r          reload current screen"),
        Line::from("  a          add item"),
        Line::from("  e          edit selected item"),
        Line::from("  x          delete selected item"),
        Line::from(""),
        Line::from("  Library:   b cycles body parts/categories/equipment"),
        Line::from("  Users:     R toggles role, S toggles status"),
        Line::from("  Builders:  see the footer hints on each screen"),
        Line::from(""),
        Line::from("  q          quit"),
        Line::from(""),
        Line::from(Span::styled("  [Esc] close", styles::muted_style())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
