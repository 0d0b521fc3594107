//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Overlay states (login, forms, confirm
//! dialogs) capture input first; otherwise keys go to the current
//! screen.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_password_char, App, AppState, BuilderRow, LoginFocus, MealSection,
    Route, Screen, PAGE_SCROLL_SIZE,
};

/// Maximum length of a form field value.
const MAX_FIELD_LENGTH: usize = 200;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle login overlay
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                // Reopen the login overlay if that is where we came from
                app.state = if app.current_screen().is_none() {
                    AppState::LoggingIn
                } else {
                    AppState::Normal
                };
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.execute_delete().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.cancel_delete();
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle form overlay
    if matches!(app.state, AppState::EditingForm) {
        handle_form_input(app, key).await;
        return Ok(false);
    }

    // Normal state: transient status clears on the next keypress
    app.status_message = None;

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.navigate(Route::Screen(Screen::Dashboard)).await;
            return Ok(false);
        }
        KeyCode::Char('2') => {
            app.navigate(Route::Screen(Screen::Exercises)).await;
            return Ok(false);
        }
        KeyCode::Char('3') => {
            app.navigate(Route::Screen(Screen::Library)).await;
            return Ok(false);
        }
        KeyCode::Char('4') => {
            app.navigate(Route::Screen(Screen::Meals)).await;
            return Ok(false);
        }
        KeyCode::Char('5') => {
            app.navigate(Route::Screen(Screen::Programs)).await;
            return Ok(false);
        }
        KeyCode::Char('6') => {
            app.navigate(Route::Screen(Screen::Workouts)).await;
            return Ok(false);
        }
        KeyCode::Char('7') => {
            app.navigate(Route::Screen(Screen::Users)).await;
            return Ok(false);
        }
        KeyCode::Char('8') => {
            app.navigate(Route::Screen(Screen::Account)).await;
            return Ok(false);
        }
        KeyCode::Tab => {
            // The meal builder owns Tab for switching halves
            if app.current_screen() == Some(Screen::Meals) && app.meal_builder.is_some() {
                handle_meal_builder_input(app, key).await;
            } else if let Some(screen) = app.current_screen() {
                app.navigate(Route::Screen(screen.next())).await;
            }
            return Ok(false);
        }
        KeyCode::BackTab => {
            if let Some(screen) = app.current_screen() {
                app.navigate(Route::Screen(screen.prev())).await;
            }
            return Ok(false);
        }
        KeyCode::Char('r') => {
            if let Some(screen) = app.current_screen() {
                app.load_screen(screen).await;
            }
            return Ok(false);
        }
        _ => {}
    }

    // Screen-specific keys (builders capture theirs first)
    match app.current_screen() {
        Some(Screen::Programs) if app.program_builder.is_some() => {
            handle_program_builder_input(app, key).await;
        }
        Some(Screen::Meals) if app.meal_builder.is_some() => {
            handle_meal_builder_input(app, key).await;
        }
        Some(Screen::Workouts) if app.workout_builder.is_some() => {
            handle_workout_builder_input(app, key).await;
        }
        Some(screen) => handle_screen_input(app, screen, key).await,
        None => {}
    }

    Ok(false)
}

// ============================================================================
// Login overlay
// ============================================================================

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => {
                    // Offer the remembered password when moving on
                    app.recall_password();
                    LoginFocus::Password
                }
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                app.attempt_login().await;
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

// ============================================================================
// Form overlay
// ============================================================================

async fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form().await,
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.focus_prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                let focus = form.focus;
                if let Some(field) = form.fields.get_mut(focus) {
                    field.value.pop();
                }
            }
        }
        KeyCode::Char(c) => {
            if c.is_control() {
                return;
            }
            if let Some(form) = app.form.as_mut() {
                let focus = form.focus;
                if let Some(field) = form.fields.get_mut(focus) {
                    if field.value.len() < MAX_FIELD_LENGTH {
                        field.value.push(c);
                    }
                }
            }
        }
        _ => {}
    }
}

// ============================================================================
// Entity list screens
// ============================================================================

async fn handle_screen_input(app: &mut App, screen: Screen, key: KeyEvent) {
    // Selection movement shared by every list screen
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_selection(1);
            return;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_selection(-1);
            return;
        }
        KeyCode::PageDown => {
            app.move_selection(PAGE_SCROLL_SIZE as isize);
            return;
        }
        KeyCode::PageUp => {
            app.move_selection(-(PAGE_SCROLL_SIZE as isize));
            return;
        }
        _ => {}
    }

    match screen {
        Screen::Dashboard => {}
        Screen::Exercises => match key.code {
            KeyCode::Char('a') => app.open_exercise_create_form().await,
            KeyCode::Char('e') => app.open_exercise_edit_form(),
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Library => match key.code {
            KeyCode::Char('b') => app.cycle_catalog().await,
            KeyCode::Char('a') => app.open_catalog_create_form(),
            KeyCode::Char('e') => app.open_catalog_rename_form(),
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Meals => match key.code {
            KeyCode::Char('a') => app.open_meal_create_form(),
            KeyCode::Char('e') => app.open_meal_edit_form(),
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Programs => match key.code {
            KeyCode::Char('a') => app.open_program_create_form(),
            KeyCode::Char('e') => app.open_program_edit_form(),
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Workouts => match key.code {
            KeyCode::Char('a') => app.open_workout_create_form(),
            KeyCode::Char('e') => app.open_workout_edit_form(),
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Users => match key.code {
            KeyCode::Char('a') => app.open_user_create_form(),
            KeyCode::Char('R') => app.toggle_user_role().await,
            KeyCode::Char('S') => app.toggle_user_status().await,
            KeyCode::Char('x') => app.confirm_delete(),
            _ => {}
        },
        Screen::Account => match key.code {
            KeyCode::Char('p') => app.open_profile_form(),
            KeyCode::Char('w') => app.open_password_form(),
            KeyCode::Char('o') => app.logout(),
            _ => {}
        },
    }
}

// ============================================================================
// Draft builders
// ============================================================================

async fn handle_program_builder_input(app: &mut App, key: KeyEvent) {
    let selected = app
        .program_builder
        .as_ref()
        .and_then(|b| b.selected_row());

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(builder) = app.program_builder.as_mut() {
                builder.selection = builder.selection.saturating_add(1);
                builder.clamp_selection();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(builder) = app.program_builder.as_mut() {
                builder.selection = builder.selection.saturating_sub(1);
            }
        }
        KeyCode::Char('w') => app.open_week_form(),
        KeyCode::Char('d') => {
            let week = match selected {
                Some(BuilderRow::Week(wi))
                | Some(BuilderRow::Day(wi, _))
                | Some(BuilderRow::Slot(wi, _, _)) => Some(wi),
                None => None,
            };
            match week {
                Some(wi) => {
                    if let Some(builder) = app.program_builder.as_mut() {
                        if builder.draft.add_day(wi).is_none() {
                            app.status_message =
                                Some("A week cannot have more than 7 days".to_string());
                        }
                    }
                }
                None => app.status_message = Some("Add a week first".to_string()),
            }
        }
        KeyCode::Char('e') => match selected {
            Some(BuilderRow::Day(wi, di)) | Some(BuilderRow::Slot(wi, di, _)) => {
                app.open_program_slot_form(wi, di);
            }
            _ => app.status_message = Some("Select a day first".to_string()),
        },
        KeyCode::Char('x') => {
            if let Some(builder) = app.program_builder.as_mut() {
                match selected {
                    Some(BuilderRow::Week(wi)) => builder.draft.remove_week(wi),
                    Some(BuilderRow::Day(wi, di)) => builder.draft.remove_day(wi, di),
                    Some(BuilderRow::Slot(wi, di, si)) => builder.draft.remove_exercise(wi, di, si),
                    None => {}
                }
                builder.clamp_selection();
            }
        }
        KeyCode::Char('K') => {
            if let Some(builder) = app.program_builder.as_mut() {
                match selected {
                    // Moving a week shifts its whole subtree; recompute the
                    // week's row index afterwards to keep the cursor on it
                    Some(BuilderRow::Week(wi)) if wi > 0 => {
                        builder.draft.move_week(wi, true);
                        let target = BuilderRow::Week(wi - 1);
                        if let Some(pos) = builder.rows().iter().position(|r| *r == target) {
                            builder.selection = pos;
                        }
                    }
                    Some(BuilderRow::Slot(wi, di, si)) if si > 0 => {
                        builder.draft.move_exercise(wi, di, si, true);
                        builder.selection = builder.selection.saturating_sub(1);
                    }
                    _ => {}
                }
                builder.clamp_selection();
            }
        }
        KeyCode::Char('J') => {
            if let Some(builder) = app.program_builder.as_mut() {
                match selected {
                    Some(BuilderRow::Week(wi)) if wi + 1 < builder.draft.weeks.len() => {
                        builder.draft.move_week(wi, false);
                        let target = BuilderRow::Week(wi + 1);
                        if let Some(pos) = builder.rows().iter().position(|r| *r == target) {
                            builder.selection = pos;
                        }
                    }
                    Some(BuilderRow::Slot(wi, di, si)) => {
                        let len = builder.draft.weeks[wi].days[di].exercises.len();
                        if si + 1 < len {
                            builder.draft.move_exercise(wi, di, si, false);
                            builder.selection += 1;
                        }
                    }
                    _ => {}
                }
                builder.clamp_selection();
            }
        }
        KeyCode::Char('s') => app.submit_program_builder().await,
        KeyCode::Esc => {
            app.program_builder = None;
            app.status_message = Some("Program draft discarded".to_string());
        }
        _ => {}
    }
}

async fn handle_meal_builder_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(builder) = app.meal_builder.as_mut() {
                builder.selection = builder.selection.saturating_add(1);
                builder.clamp_selection();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(builder) = app.meal_builder.as_mut() {
                builder.selection = builder.selection.saturating_sub(1);
            }
        }
        KeyCode::Tab => {
            if let Some(builder) = app.meal_builder.as_mut() {
                builder.section = match builder.section {
                    MealSection::Ingredients => MealSection::Instructions,
                    MealSection::Instructions => MealSection::Ingredients,
                };
                builder.selection = 0;
            }
        }
        KeyCode::Char('i') => app.open_ingredient_form(),
        KeyCode::Char('n') => app.open_instruction_form(),
        KeyCode::Char('x') => {
            if let Some(builder) = app.meal_builder.as_mut() {
                match builder.section {
                    MealSection::Ingredients => builder.draft.remove_ingredient(builder.selection),
                    MealSection::Instructions => builder.draft.remove_instruction(builder.selection),
                }
                builder.clamp_selection();
            }
        }
        KeyCode::Char('K') => {
            if let Some(builder) = app.meal_builder.as_mut() {
                if builder.section == MealSection::Instructions {
                    builder.draft.move_instruction(builder.selection, true);
                    builder.selection = builder.selection.saturating_sub(1);
                }
            }
        }
        KeyCode::Char('J') => {
            if let Some(builder) = app.meal_builder.as_mut() {
                if builder.section == MealSection::Instructions {
                    let len = builder.draft.instructions.len();
                    builder.draft.move_instruction(builder.selection, false);
                    if builder.selection + 1 < len {
                        builder.selection += 1;
                    }
                }
            }
        }
        KeyCode::Char('s') => app.submit_meal_builder().await,
        KeyCode::Esc => {
            app.meal_builder = None;
            app.status_message = Some("Meal draft discarded".to_string());
        }
        _ => {}
    }
}

async fn handle_workout_builder_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(builder) = app.workout_builder.as_mut() {
                builder.selection = builder.selection.saturating_add(1);
                builder.clamp_selection();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(builder) = app.workout_builder.as_mut() {
                builder.selection = builder.selection.saturating_sub(1);
            }
        }
        KeyCode::Char('e') => app.open_workout_slot_form(),
        KeyCode::Char('x') => {
            if let Some(builder) = app.workout_builder.as_mut() {
                builder.draft.remove_slot(builder.selection);
                builder.clamp_selection();
            }
        }
        KeyCode::Char('K') => {
            if let Some(builder) = app.workout_builder.as_mut() {
                builder.draft.move_slot(builder.selection, true);
                builder.selection = builder.selection.saturating_sub(1);
            }
        }
        KeyCode::Char('J') => {
            if let Some(builder) = app.workout_builder.as_mut() {
                let len = builder.draft.slots.len();
                builder.draft.move_slot(builder.selection, false);
                if builder.selection + 1 < len {
                    builder.selection += 1;
                }
            }
        }
        KeyCode::Char('s') => app.submit_workout_builder().await,
        KeyCode::Esc => {
            app.workout_builder = None;
            app.status_message = Some("Workout draft discarded".to_string());
        }
        _ => {}
    }
}
