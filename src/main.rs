//! fitdesk - a terminal admin console for a fitness content platform.
//!
//! This application provides a fast, keyboard-driven interface for
//! managing the platform's content library (exercises, meals, programs,
//! workouts, lookup catalogs), user accounts, and the operator's own
//! profile, over the platform's REST API.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fitdesk::app::{App, AppState, Route, Screen};
use fitdesk::auth::CredentialStore;
use fitdesk::ui::input::handle_input;
use fitdesk::ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_cli().await;
    }

    // Initialize logging
    init_tracing();
    info!("fitdesk starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and route the initial screen through the guard: with no
    // stored token this lands on the login overlay
    let mut app = App::new()?;
    app.navigate(Route::Screen(Screen::Dashboard)).await;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("fitdesk shutting down");
    Ok(())
}

/// Non-interactive-terminal login path: authenticate once and persist
/// the session token, so the TUI (or scripts using the same config)
/// start out signed in.
async fn login_cli() -> Result<()> {
    init_tracing();
    let app = App::new()?;

    let email = {
        let default = app.config.last_email.clone().unwrap_or_default();
        if default.is_empty() {
            print!("Email: ");
        } else {
            print!("Email [{}]: ", default);
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        if input.is_empty() {
            default
        } else {
            input.to_string()
        }
    };

    if email.is_empty() {
        anyhow::bail!("An email address is required");
    }

    let password = if CredentialStore::has_credentials(&email) {
        print!("Use stored password? [Y/n]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim().to_lowercase() != "n" {
            CredentialStore::get_password(&email)?
        } else {
            rpassword::prompt_password("Password: ")?
        }
    } else {
        rpassword::prompt_password("Password: ")?
    };

    println!("\nAuthenticating...");

    let token = app.api.login(&email, &password).await?;
    app.tokens.set(&token);

    if let Err(e) = CredentialStore::store(&email, &password) {
        eprintln!("Warning: could not store password in keychain: {}", e);
    }

    let mut config = app.config.clone();
    config.last_email = Some(email);
    config.save()?;

    println!("Login successful.");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with a timeout so state changes repaint promptly
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
