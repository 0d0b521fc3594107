//! Application state management for fitdesk.
//!
//! This module contains the core `App` struct that manages all console
//! state: the current screen and its data, session handling, overlay
//! forms, the nested draft builders, and per-screen request status.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, MediaStore};
use crate::auth::{CredentialStore, TokenStore};
use crate::config::Config;
use crate::models::{
    CatalogItem, CatalogKind, DashboardStats, DayExercise, Exercise, ExercisePayload, Meal,
    MealDraft, Program, ProgramDraft, User, UserRole, UserStatus, Workout, WorkoutDraft,
    WorkoutSlot,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Upload folder names per entity, matching the platform's bucket layout.
const EXERCISE_UPLOAD_FOLDER: &str = "exercise_thumbnails";
const MEAL_UPLOAD_FOLDER: &str = "meal_images";
const PROGRAM_UPLOAD_FOLDER: &str = "program_thumbnails";
const WORKOUT_UPLOAD_FOLDER: &str = "workout_thumbnails";

// ============================================================================
// Screens and routing
// ============================================================================

/// Main console screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Exercises,
    Library,
    Meals,
    Programs,
    Workouts,
    Users,
    Account,
}

impl Screen {
    /// Get the display title for this screen.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Exercises => "Exercises",
            Screen::Library => "Library",
            Screen::Meals => "Meals",
            Screen::Programs => "Programs",
            Screen::Workouts => "Workouts",
            Screen::Users => "Users",
            Screen::Account => "Account",
        }
    }

    /// Get the next screen (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Screen::Dashboard => Screen::Exercises,
            Screen::Exercises => Screen::Library,
            Screen::Library => Screen::Meals,
            Screen::Meals => Screen::Programs,
            Screen::Programs => Screen::Workouts,
            Screen::Workouts => Screen::Users,
            Screen::Users => Screen::Account,
            Screen::Account => Screen::Dashboard,
        }
    }

    /// Get the previous screen (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Screen::Dashboard => Screen::Account,
            Screen::Exercises => Screen::Dashboard,
            Screen::Library => Screen::Exercises,
            Screen::Meals => Screen::Library,
            Screen::Programs => Screen::Meals,
            Screen::Workouts => Screen::Programs,
            Screen::Users => Screen::Workouts,
            Screen::Account => Screen::Users,
        }
    }
}

/// A navigable destination: the login screen or a console screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Screen(Screen),
}

/// Presence-only navigation guard.
///
/// Decides where a navigation request actually lands, from nothing but
/// whether a token is stored. Expiry is not consulted here; an expired
/// token gets caught by the pre-flight check of the first API call the
/// destination screen makes.
pub fn route_screen(requested: Route, token_present: bool) -> Route {
    match (requested, token_present) {
        (Route::Screen(_), false) => Route::Login,
        (Route::Login, true) => Route::Screen(Screen::Dashboard),
        (route, _) => route,
    }
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state (which overlay, if any, captures input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    ShowingHelp,
    EditingForm,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Observable status of the one request a screen currently has in
/// flight. Each call owns its own `Result`; this is just what the
/// screen shows, so overlapping flows cannot clobber each other.
#[derive(Debug, Default)]
pub struct RequestState {
    pub in_flight: bool,
    pub error: Option<String>,
}

impl RequestState {
    pub fn begin(&mut self) {
        self.in_flight = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.in_flight = false;
    }

    pub fn fail(&mut self, message: String) {
        self.in_flight = false;
        self.error = Some(message);
    }
}

/// Request status slots, one per screen.
#[derive(Debug, Default)]
pub struct ScreenRequests {
    pub dashboard: RequestState,
    pub exercises: RequestState,
    pub library: RequestState,
    pub meals: RequestState,
    pub programs: RequestState,
    pub workouts: RequestState,
    pub users: RequestState,
    pub account: RequestState,
}

impl ScreenRequests {
    pub fn get(&self, screen: Screen) -> &RequestState {
        match screen {
            Screen::Dashboard => &self.dashboard,
            Screen::Exercises => &self.exercises,
            Screen::Library => &self.library,
            Screen::Meals => &self.meals,
            Screen::Programs => &self.programs,
            Screen::Workouts => &self.workouts,
            Screen::Users => &self.users,
            Screen::Account => &self.account,
        }
    }

    pub fn get_mut(&mut self, screen: Screen) -> &mut RequestState {
        match screen {
            Screen::Dashboard => &mut self.dashboard,
            Screen::Exercises => &mut self.exercises,
            Screen::Library => &mut self.library,
            Screen::Meals => &mut self.meals,
            Screen::Programs => &mut self.programs,
            Screen::Workouts => &mut self.workouts,
            Screen::Users => &mut self.users,
            Screen::Account => &mut self.account,
        }
    }
}

// ============================================================================
// Overlay forms
// ============================================================================

/// One text field of an overlay form.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl FormField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    fn with_value(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
            masked: false,
        }
    }

    fn masked(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: true,
        }
    }
}

/// What a form submission feeds into.
#[derive(Debug, Clone)]
pub enum FormTarget {
    CatalogCreate(CatalogKind),
    CatalogRename { kind: CatalogKind, id: i64 },
    ExerciseCreate,
    ExerciseEdit { id: i64 },
    MealCreate,
    MealEdit { id: i64 },
    ProgramCreate,
    ProgramEdit { id: i64 },
    WorkoutCreate,
    WorkoutEdit { id: i64 },
    UserCreate,
    /// Add an exercise slot to a program draft day
    ProgramSlot { week: usize, day: usize },
    /// Add an exercise slot to the workout draft
    WorkoutSlot,
    /// Add a week to the program draft
    WeekAdd,
    /// Add an ingredient to the meal draft
    IngredientAdd,
    /// Add an instruction step to the meal draft
    InstructionAdd,
    ProfileEdit,
    PasswordChange,
}

/// Overlay form state.
#[derive(Debug, Clone)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    pub target: FormTarget,
}

impl Form {
    fn new(title: &str, target: FormTarget, fields: Vec<FormField>) -> Self {
        Self {
            title: title.to_string(),
            fields,
            focus: 0,
            error: None,
            target,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.trim()).unwrap_or("")
    }
}

// ============================================================================
// Draft builders
// ============================================================================

/// One selectable row of the program builder tree, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderRow {
    Week(usize),
    Day(usize, usize),
    Slot(usize, usize, usize),
}

/// Program draft plus the builder's cursor state.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    pub draft: ProgramDraft,
    pub image_path: String,
    pub selection: usize,
}

impl ProgramBuilder {
    /// Flatten the week/day/slot tree into selectable rows.
    pub fn rows(&self) -> Vec<BuilderRow> {
        let mut rows = Vec::new();
        for (wi, week) in self.draft.weeks.iter().enumerate() {
            rows.push(BuilderRow::Week(wi));
            for (di, day) in week.days.iter().enumerate() {
                rows.push(BuilderRow::Day(wi, di));
                for si in 0..day.exercises.len() {
                    rows.push(BuilderRow::Slot(wi, di, si));
                }
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<BuilderRow> {
        self.rows().get(self.selection).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.selection = 0;
        } else if self.selection >= len {
            self.selection = len - 1;
        }
    }
}

/// Which half of the meal builder has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSection {
    Ingredients,
    Instructions,
}

/// Meal draft plus the builder's cursor state.
#[derive(Debug)]
pub struct MealBuilder {
    pub draft: MealDraft,
    pub image_path: String,
    pub section: MealSection,
    pub selection: usize,
}

impl MealBuilder {
    pub fn clamp_selection(&mut self) {
        let len = match self.section {
            MealSection::Ingredients => self.draft.ingredients.len(),
            MealSection::Instructions => self.draft.instructions.len(),
        };
        if len == 0 {
            self.selection = 0;
        } else if self.selection >= len {
            self.selection = len - 1;
        }
    }
}

/// Workout draft plus the builder's cursor state.
#[derive(Debug, Default)]
pub struct WorkoutBuilder {
    pub draft: WorkoutDraft,
    pub image_path: String,
    pub selection: usize,
}

impl WorkoutBuilder {
    pub fn clamp_selection(&mut self) {
        let len = self.draft.slots.len();
        if len == 0 {
            self.selection = 0;
        } else if self.selection >= len {
            self.selection = len - 1;
        }
    }
}

// ============================================================================
// Delete confirmation
// ============================================================================

#[derive(Debug, Clone)]
pub enum DeleteKind {
    Catalog(CatalogKind, i64),
    Exercise(i64),
    Meal(i64),
    Program(i64),
    Workout(i64),
    User(i64),
}

#[derive(Debug, Clone)]
pub struct DeleteTarget {
    pub label: String,
    pub kind: DeleteKind,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub tokens: Arc<TokenStore>,
    pub api: ApiClient,
    pub media: Option<MediaStore>,

    // Routing / overlay state
    pub route: Route,
    pub state: AppState,
    pub status_message: Option<String>,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Screen data
    pub stats: DashboardStats,
    pub exercises: Vec<Exercise>,
    pub catalog_kind: CatalogKind,
    pub catalog_items: Vec<CatalogItem>,
    pub meals: Vec<Meal>,
    pub programs: Vec<Program>,
    pub workouts: Vec<Workout>,
    pub users: Vec<User>,
    pub account: Option<User>,

    // Option lists for the exercise form (categories, body parts, equipment)
    pub exercise_options: Option<(Vec<CatalogItem>, Vec<CatalogItem>, Vec<CatalogItem>)>,

    // Selection indices
    pub exercises_selection: usize,
    pub catalog_selection: usize,
    pub meals_selection: usize,
    pub programs_selection: usize,
    pub workouts_selection: usize,
    pub users_selection: usize,

    // Per-screen request status
    pub requests: ScreenRequests,

    // Overlays and builders
    pub form: Option<Form>,
    pub delete_target: Option<DeleteTarget>,
    pub program_builder: Option<ProgramBuilder>,
    pub meal_builder: Option<MealBuilder>,
    pub workout_builder: Option<WorkoutBuilder>,
}

impl App {
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let tokens = Arc::new(TokenStore::new(cache_dir));
        let api = ApiClient::new(config.api_base_url(), Arc::clone(&tokens))?;

        let media = match (config.media_upload_url(), config.media_public_base()) {
            (Some(upload), Some(public)) => Some(MediaStore::new(upload, public)?),
            _ => {
                debug!("Media upload endpoints not configured");
                None
            }
        };

        let login_email = std::env::var("FITDESK_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Ok(Self {
            config,
            tokens,
            api,
            media,

            route: Route::Login,
            state: AppState::Normal,
            status_message: None,

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            stats: DashboardStats::default(),
            exercises: Vec::new(),
            catalog_kind: CatalogKind::BodyParts,
            catalog_items: Vec::new(),
            meals: Vec::new(),
            programs: Vec::new(),
            workouts: Vec::new(),
            users: Vec::new(),
            account: None,

            exercise_options: None,

            exercises_selection: 0,
            catalog_selection: 0,
            meals_selection: 0,
            programs_selection: 0,
            workouts_selection: 0,
            users_selection: 0,

            requests: ScreenRequests::default(),

            form: None,
            delete_target: None,
            program_builder: None,
            meal_builder: None,
            workout_builder: None,
        })
    }

    // =========================================================================
    // Routing
    // =========================================================================

    pub fn current_screen(&self) -> Option<Screen> {
        match self.route {
            Route::Screen(screen) => Some(screen),
            Route::Login => None,
        }
    }

    /// Navigate through the presence-only guard, then load the
    /// destination screen's data.
    pub async fn navigate(&mut self, requested: Route) {
        let resolved = route_screen(requested, self.tokens.get().is_some());
        match resolved {
            Route::Login => self.start_login(),
            Route::Screen(screen) => {
                self.route = Route::Screen(screen);
                self.state = AppState::Normal;
                self.load_screen(screen).await;
            }
        }
    }

    /// Uniform reaction to an API error on a screen: authentication
    /// failures route to login (the token store is already cleared by
    /// the executor); anything else lands in the screen's error slot.
    fn handle_api_error(&mut self, screen: Screen, err: ApiError) {
        if err.is_auth() {
            warn!(screen = screen.title(), "Authentication failure, returning to login");
            self.start_login();
            self.login_error = Some("Session expired. Please sign in again.".to_string());
            self.requests.get_mut(screen).succeed();
        } else {
            self.requests.get_mut(screen).fail(err.to_string());
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Show the login overlay.
    pub fn start_login(&mut self) {
        self.route = Route::Login;
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form.
    pub async fn attempt_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;

        match self.api.login(&email, &password).await {
            Ok(token) => {
                self.tokens.set(&token);

                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                info!("Login successful");
                self.navigate(Route::Screen(Screen::Dashboard)).await;
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.login_error = Some(login_error_message(&e));
            }
        }
    }

    /// Use the remembered password for the current email, if any.
    pub fn recall_password(&mut self) {
        if self.login_password.is_empty() && !self.login_email.is_empty() {
            if let Ok(password) = CredentialStore::get_password(self.login_email.trim()) {
                self.login_password = password;
            }
        }
    }

    /// Explicit logout: destroy the token everywhere and return to login.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.account = None;
        info!("Logged out");
        self.start_login();
        self.status_message = Some("Logged out".to_string());
    }

    // =========================================================================
    // Screen data loading
    // =========================================================================

    pub async fn load_screen(&mut self, screen: Screen) {
        self.requests.get_mut(screen).begin();
        let outcome = match screen {
            Screen::Dashboard => self.api.statistics().await.map(|s| {
                self.stats = s;
            }),
            Screen::Exercises => self.api.list_exercises().await.map(|items| {
                self.exercises = items;
                self.exercises_selection = 0;
            }),
            Screen::Library => self.api.list_catalog(self.catalog_kind).await.map(|items| {
                self.catalog_items = items;
                self.catalog_selection = 0;
            }),
            Screen::Meals => self.api.list_meals().await.map(|items| {
                self.meals = items;
                self.meals_selection = 0;
            }),
            Screen::Programs => self.api.list_programs().await.map(|items| {
                self.programs = items;
                self.programs_selection = 0;
            }),
            Screen::Workouts => self.api.list_workouts().await.map(|items| {
                self.workouts = items;
                self.workouts_selection = 0;
            }),
            Screen::Users => self.api.list_users().await.map(|items| {
                self.users = items;
                self.users_selection = 0;
            }),
            Screen::Account => self.api.me().await.map(|user| {
                self.account = Some(user);
            }),
        };

        match outcome {
            Ok(()) => self.requests.get_mut(screen).succeed(),
            Err(e) => self.handle_api_error(screen, e),
        }
    }

    /// Cycle the Library screen to the next lookup catalog and reload.
    pub async fn cycle_catalog(&mut self) {
        self.catalog_kind = self.catalog_kind.next();
        self.load_screen(Screen::Library).await;
    }

    // =========================================================================
    // Forms
    // =========================================================================

    fn open_form(&mut self, form: Form) {
        self.form = Some(form);
        self.state = AppState::EditingForm;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        // A submission may already have moved the app elsewhere (e.g. a
        // password change routes to login); only leave the form state
        if self.state == AppState::EditingForm {
            self.state = AppState::Normal;
        }
    }

    pub fn open_catalog_create_form(&mut self) {
        let kind = self.catalog_kind;
        self.open_form(Form::new(
            &format!("Add {}", kind.title()),
            FormTarget::CatalogCreate(kind),
            vec![FormField::new("Name")],
        ));
    }

    pub fn open_catalog_rename_form(&mut self) {
        let kind = self.catalog_kind;
        if let Some(item) = self.catalog_items.get(self.catalog_selection) {
            self.open_form(Form::new(
                &format!("Edit {}", kind.title()),
                FormTarget::CatalogRename { kind, id: item.id },
                vec![FormField::with_value("Name", &item.name)],
            ));
        }
    }

    /// Load the option catalogs (joined fan-out), then open the exercise
    /// create form. Relations are entered as comma-separated ids picked
    /// from the option panel rendered beside the form.
    pub async fn open_exercise_create_form(&mut self) {
        self.requests.exercises.begin();
        match self.api.exercise_options().await {
            Ok(options) => {
                self.requests.exercises.succeed();
                self.exercise_options = Some(options);
                self.open_form(Form::new(
                    "Add Exercise",
                    FormTarget::ExerciseCreate,
                    vec![
                        FormField::new("Name"),
                        FormField::new("Description"),
                        FormField::new("Image path"),
                        FormField::new("Video URL"),
                        FormField::with_value("Active (y/n)", "y"),
                        FormField::new("Category ids"),
                        FormField::new("Body part ids"),
                        FormField::new("Equipment ids"),
                    ],
                ));
            }
            Err(e) => self.handle_api_error(Screen::Exercises, e),
        }
    }

    pub fn open_exercise_edit_form(&mut self) {
        if let Some(exercise) = self.exercises.get(self.exercises_selection) {
            self.open_form(Form::new(
                "Edit Exercise",
                FormTarget::ExerciseEdit { id: exercise.id },
                vec![
                    FormField::with_value("Name", &exercise.name),
                    FormField::with_value("Description", &exercise.description),
                    FormField::new("Image path"),
                    FormField::with_value("Video URL", exercise.video_url.as_deref().unwrap_or("")),
                    FormField::with_value("Active (y/n)", if exercise.is_active { "y" } else { "n" }),
                ],
            ));
        }
    }

    pub fn open_meal_create_form(&mut self) {
        self.open_form(Form::new(
            "Add Meal",
            FormTarget::MealCreate,
            vec![
                FormField::new("Name"),
                FormField::new("Category"),
                FormField::new("Description"),
                FormField::new("Image path"),
            ],
        ));
    }

    pub fn open_meal_edit_form(&mut self) {
        if let Some(meal) = self.meals.get(self.meals_selection) {
            self.open_form(Form::new(
                "Edit Meal",
                FormTarget::MealEdit { id: meal.id },
                vec![
                    FormField::with_value("Name", &meal.name),
                    FormField::with_value("Category", &meal.category),
                    FormField::with_value("Description", &meal.description),
                    FormField::new("Image path"),
                ],
            ));
        }
    }

    pub fn open_program_create_form(&mut self) {
        self.open_form(Form::new(
            "Add Program",
            FormTarget::ProgramCreate,
            vec![
                FormField::new("Name"),
                FormField::new("Description"),
                FormField::new("Image path"),
            ],
        ));
    }

    pub fn open_program_edit_form(&mut self) {
        if let Some(program) = self.programs.get(self.programs_selection) {
            self.open_form(Form::new(
                "Edit Program",
                FormTarget::ProgramEdit { id: program.id },
                vec![
                    FormField::with_value("Name", &program.name),
                    FormField::with_value("Description", &program.description),
                    FormField::new("Image path"),
                ],
            ));
        }
    }

    pub fn open_workout_create_form(&mut self) {
        self.open_form(Form::new(
            "Add Workout",
            FormTarget::WorkoutCreate,
            vec![
                FormField::new("Name"),
                FormField::new("Description"),
                FormField::new("Image path"),
                FormField::with_value("Difficulty", "beginner"),
            ],
        ));
    }

    pub fn open_workout_edit_form(&mut self) {
        if let Some(workout) = self.workouts.get(self.workouts_selection) {
            self.open_form(Form::new(
                "Edit Workout",
                FormTarget::WorkoutEdit { id: workout.id },
                vec![
                    FormField::with_value("Name", &workout.name),
                    FormField::with_value("Description", &workout.description),
                    FormField::new("Image path"),
                    FormField::with_value("Difficulty", &workout.difficulty),
                ],
            ));
        }
    }

    pub fn open_user_create_form(&mut self) {
        self.open_form(Form::new(
            "Add User",
            FormTarget::UserCreate,
            vec![
                FormField::new("Name"),
                FormField::new("Email"),
                FormField::with_value("Role (admin/user)", "user"),
                FormField::with_value("Status (active/inactive)", "active"),
            ],
        ));
    }

    pub fn open_week_form(&mut self) {
        self.open_form(Form::new(
            "Add Week",
            FormTarget::WeekAdd,
            vec![FormField::new("Week name")],
        ));
    }

    pub fn open_program_slot_form(&mut self, week: usize, day: usize) {
        self.open_form(Form::new(
            "Add Exercise Slot",
            FormTarget::ProgramSlot { week, day },
            vec![
                FormField::new("Exercise id"),
                FormField::new("Reps"),
                FormField::new("Duration (sec)"),
                FormField::with_value("Rest (sec)", "30"),
            ],
        ));
    }

    pub fn open_workout_slot_form(&mut self) {
        self.open_form(Form::new(
            "Add Exercise Slot",
            FormTarget::WorkoutSlot,
            vec![
                FormField::new("Exercise id"),
                FormField::with_value("Sets", "3"),
                FormField::new("Reps"),
                FormField::new("Duration (sec)"),
                FormField::with_value("Rest (sec)", "60"),
            ],
        ));
    }

    pub fn open_ingredient_form(&mut self) {
        self.open_form(Form::new(
            "Add Ingredient",
            FormTarget::IngredientAdd,
            vec![FormField::new("Name"), FormField::new("Amount")],
        ));
    }

    pub fn open_instruction_form(&mut self) {
        self.open_form(Form::new(
            "Add Step",
            FormTarget::InstructionAdd,
            vec![FormField::new("Instruction")],
        ));
    }

    pub fn open_profile_form(&mut self) {
        let name = self.account.as_ref().map(|u| u.name.as_str()).unwrap_or("");
        self.open_form(Form::new(
            "Edit Profile",
            FormTarget::ProfileEdit,
            vec![FormField::with_value("Name", name)],
        ));
    }

    pub fn open_password_form(&mut self) {
        self.open_form(Form::new(
            "Change Password",
            FormTarget::PasswordChange,
            vec![
                FormField::masked("Current password"),
                FormField::masked("New password"),
                FormField::masked("Confirm new password"),
            ],
        ));
    }

    // =========================================================================
    // Form submission
    // =========================================================================

    /// Resolve an image path field to a public URL, uploading the file
    /// when a path was given. Empty path keeps `fallback` (the existing
    /// URL for edits, empty for creates).
    async fn resolve_image(&self, path: &str, folder: &str, fallback: &str) -> Result<String> {
        if path.is_empty() {
            return Ok(fallback.to_string());
        }
        let media = self
            .media
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Media upload endpoints not configured"))?;
        media.upload_file(Path::new(path), folder).await
    }

    /// Dispatch the open form. On success the form closes; on failure it
    /// stays open with the error inline so nothing typed is lost.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };

        let result = self.apply_form(&form).await;
        match result {
            Ok(()) => self.close_form(),
            Err(e) => {
                // An auth failure closes everything and routes to login
                if e.downcast_ref::<ApiError>().map(ApiError::is_auth) == Some(true) {
                    self.close_form();
                    self.start_login();
                    self.login_error = Some("Session expired. Please sign in again.".to_string());
                } else if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    async fn apply_form(&mut self, form: &Form) -> Result<()> {
        match form.target.clone() {
            FormTarget::CatalogCreate(kind) => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                self.api.create_catalog_item(kind, name).await?;
                self.load_screen(Screen::Library).await;
            }
            FormTarget::CatalogRename { kind, id } => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                self.api.update_catalog_item(kind, id, name).await?;
                self.load_screen(Screen::Library).await;
            }
            FormTarget::ExerciseCreate => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                let thumbnail_url = self
                    .resolve_image(form.value(2), EXERCISE_UPLOAD_FOLDER, "")
                    .await?;
                let payload = ExercisePayload {
                    name: name.to_string(),
                    description: form.value(1).to_string(),
                    thumbnail_url,
                    video_url: non_empty(form.value(3)),
                    is_active: parse_flag(form.value(4)),
                };
                let categories = parse_id_list(form.value(5))?;
                let body_parts = parse_id_list(form.value(6))?;
                let equipment = parse_id_list(form.value(7))?;
                self.api
                    .create_exercise(&payload, &categories, &body_parts, &equipment)
                    .await?;
                self.exercise_options = None;
                self.load_screen(Screen::Exercises).await;
            }
            FormTarget::ExerciseEdit { id } => {
                let existing = self
                    .exercises
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.thumbnail_url.clone())
                    .unwrap_or_default();
                let thumbnail_url = self
                    .resolve_image(form.value(2), EXERCISE_UPLOAD_FOLDER, &existing)
                    .await?;
                let payload = ExercisePayload {
                    name: form.value(0).to_string(),
                    description: form.value(1).to_string(),
                    thumbnail_url,
                    video_url: non_empty(form.value(3)),
                    is_active: parse_flag(form.value(4)),
                };
                self.api.update_exercise(id, &payload).await?;
                self.load_screen(Screen::Exercises).await;
            }
            FormTarget::MealCreate => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                // Children are added in the builder; submission happens there
                self.meal_builder = Some(MealBuilder {
                    draft: MealDraft {
                        name: name.to_string(),
                        category: form.value(1).to_string(),
                        description: form.value(2).to_string(),
                        image_url: String::new(),
                        ingredients: Vec::new(),
                        instructions: Vec::new(),
                    },
                    image_path: form.value(3).to_string(),
                    section: MealSection::Ingredients,
                    selection: 0,
                });
            }
            FormTarget::MealEdit { id } => {
                let existing = self
                    .meals
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.image_url.clone())
                    .unwrap_or_default();
                let image_url = self
                    .resolve_image(form.value(3), MEAL_UPLOAD_FOLDER, &existing)
                    .await?;
                let meal = Meal {
                    id,
                    name: form.value(0).to_string(),
                    category: form.value(1).to_string(),
                    description: form.value(2).to_string(),
                    image_url,
                };
                self.api.update_meal(&meal).await?;
                self.load_screen(Screen::Meals).await;
            }
            FormTarget::ProgramCreate => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                self.program_builder = Some(ProgramBuilder {
                    draft: ProgramDraft {
                        name: name.to_string(),
                        description: form.value(1).to_string(),
                        image_url: String::new(),
                        weeks: Vec::new(),
                    },
                    image_path: form.value(2).to_string(),
                    selection: 0,
                });
            }
            FormTarget::ProgramEdit { id } => {
                let existing = self.programs.iter().find(|p| p.id == id);
                let (image_fallback, total_weeks) = existing
                    .map(|p| (p.image_url.clone(), p.total_weeks))
                    .unwrap_or_default();
                let image_url = self
                    .resolve_image(form.value(2), PROGRAM_UPLOAD_FOLDER, &image_fallback)
                    .await?;
                let program = Program {
                    id,
                    name: form.value(0).to_string(),
                    description: form.value(1).to_string(),
                    image_url,
                    total_weeks,
                };
                self.api.update_program(&program).await?;
                self.load_screen(Screen::Programs).await;
            }
            FormTarget::WorkoutCreate => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                self.workout_builder = Some(WorkoutBuilder {
                    draft: WorkoutDraft {
                        name: name.to_string(),
                        description: form.value(1).to_string(),
                        thumbnail_url: String::new(),
                        difficulty: form.value(3).to_string(),
                        slots: Vec::new(),
                    },
                    image_path: form.value(2).to_string(),
                    selection: 0,
                });
            }
            FormTarget::WorkoutEdit { id } => {
                let existing = self
                    .workouts
                    .iter()
                    .find(|w| w.id == id)
                    .map(|w| w.thumbnail_url.clone())
                    .unwrap_or_default();
                let thumbnail_url = self
                    .resolve_image(form.value(2), WORKOUT_UPLOAD_FOLDER, &existing)
                    .await?;
                let workout = Workout {
                    id,
                    name: form.value(0).to_string(),
                    description: form.value(1).to_string(),
                    thumbnail_url,
                    difficulty: form.value(3).to_string(),
                };
                self.api.update_workout(&workout).await?;
                self.load_screen(Screen::Workouts).await;
            }
            FormTarget::UserCreate => {
                let name = form.value(0);
                let email = form.value(1);
                if name.is_empty() || email.is_empty() {
                    anyhow::bail!("Name and email are required");
                }
                let role = parse_role(form.value(2))?;
                let status = parse_status(form.value(3))?;
                self.api.create_user(name, email, role, status).await?;
                self.load_screen(Screen::Users).await;
            }
            FormTarget::WeekAdd => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Week name is required");
                }
                if let Some(builder) = self.program_builder.as_mut() {
                    let index = builder.draft.add_week(name);
                    // Move the cursor onto the new week
                    builder.selection = builder
                        .rows()
                        .iter()
                        .position(|r| *r == BuilderRow::Week(index))
                        .unwrap_or(0);
                }
            }
            FormTarget::ProgramSlot { week, day } => {
                let slot = DayExercise {
                    exercise_id: parse_id(form.value(0))?,
                    exercise_name: self.exercise_name_for(form.value(0)),
                    position: 0,
                    reps: parse_optional_u32(form.value(1))?,
                    duration_seconds: parse_optional_u32(form.value(2))?,
                    rest_seconds: parse_optional_u32(form.value(3))?.unwrap_or(0),
                };
                if slot.reps.is_none() && slot.duration_seconds.is_none() {
                    anyhow::bail!("Set either reps or a duration");
                }
                if let Some(builder) = self.program_builder.as_mut() {
                    builder.draft.add_exercise(week, day, slot);
                }
            }
            FormTarget::WorkoutSlot => {
                let slot = WorkoutSlot {
                    exercise_id: parse_id(form.value(0))?,
                    exercise_name: self.exercise_name_for(form.value(0)),
                    position: 0,
                    sets_number: parse_optional_u32(form.value(1))?.unwrap_or(1),
                    reps: parse_optional_u32(form.value(2))?,
                    duration_seconds: parse_optional_u32(form.value(3))?,
                    rest_seconds: parse_optional_u32(form.value(4))?.unwrap_or(0),
                };
                if slot.reps.is_none() && slot.duration_seconds.is_none() {
                    anyhow::bail!("Set either reps or a duration");
                }
                if let Some(builder) = self.workout_builder.as_mut() {
                    builder.draft.add_slot(slot);
                }
            }
            FormTarget::IngredientAdd => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Ingredient name is required");
                }
                if let Some(builder) = self.meal_builder.as_mut() {
                    builder.draft.add_ingredient(name, form.value(1));
                }
            }
            FormTarget::InstructionAdd => {
                let text = form.value(0);
                if text.is_empty() {
                    anyhow::bail!("Instruction text is required");
                }
                if let Some(builder) = self.meal_builder.as_mut() {
                    builder.draft.add_instruction(text);
                }
            }
            FormTarget::ProfileEdit => {
                let name = form.value(0);
                if name.is_empty() {
                    anyhow::bail!("Name is required");
                }
                self.api.update_profile(name).await?;
                self.load_screen(Screen::Account).await;
                self.status_message = Some("Profile updated".to_string());
            }
            FormTarget::PasswordChange => {
                let current = form.value(0);
                let new = form.value(1);
                if new.len() < 8 {
                    anyhow::bail!("New password must be at least 8 characters");
                }
                if new != form.value(2) {
                    anyhow::bail!("New passwords do not match");
                }
                self.api.change_password(current, new).await?;
                // The old token is no longer honored; drop it and re-login
                self.tokens.clear();
                self.start_login();
                self.status_message =
                    Some("Password changed. Please sign in again.".to_string());
            }
        }
        Ok(())
    }

    /// Look up a display name for an exercise id typed into a slot form.
    fn exercise_name_for(&self, raw_id: &str) -> String {
        raw_id
            .parse::<i64>()
            .ok()
            .and_then(|id| self.exercises.iter().find(|e| e.id == id))
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("exercise {}", raw_id))
    }

    // =========================================================================
    // Draft builder submission
    // =========================================================================

    /// Submit the active program draft: upload the image if one was
    /// given, then create program, weeks, and slots sequentially.
    pub async fn submit_program_builder(&mut self) {
        let Some(mut builder) = self.program_builder.take() else {
            return;
        };

        self.requests.programs.begin();

        match self
            .resolve_image(&builder.image_path, PROGRAM_UPLOAD_FOLDER, "")
            .await
        {
            Ok(url) => builder.draft.image_url = url,
            Err(e) => {
                self.requests.programs.fail(e.to_string());
                self.program_builder = Some(builder);
                return;
            }
        }

        match self.api.create_program(&builder.draft).await {
            Ok(id) => {
                info!(program_id = id, "Program created");
                self.requests.programs.succeed();
                self.status_message = Some(format!("Program \"{}\" created", builder.draft.name));
                self.load_screen(Screen::Programs).await;
            }
            Err(e) => {
                // Partially created rows stand; surface the error and keep
                // the draft so the user can retry
                let auth = e.is_auth();
                self.handle_api_error(Screen::Programs, e);
                if !auth {
                    self.program_builder = Some(builder);
                }
            }
        }
    }

    /// Submit the active meal draft (meal row, then children in order).
    pub async fn submit_meal_builder(&mut self) {
        let Some(mut builder) = self.meal_builder.take() else {
            return;
        };

        self.requests.meals.begin();

        match self
            .resolve_image(&builder.image_path, MEAL_UPLOAD_FOLDER, "")
            .await
        {
            Ok(url) => builder.draft.image_url = url,
            Err(e) => {
                self.requests.meals.fail(e.to_string());
                self.meal_builder = Some(builder);
                return;
            }
        }

        match self.api.create_meal(&builder.draft).await {
            Ok(id) => {
                info!(meal_id = id, "Meal created");
                self.requests.meals.succeed();
                self.status_message = Some(format!("Meal \"{}\" created", builder.draft.name));
                self.load_screen(Screen::Meals).await;
            }
            Err(e) => {
                let auth = e.is_auth();
                self.handle_api_error(Screen::Meals, e);
                if !auth {
                    self.meal_builder = Some(builder);
                }
            }
        }
    }

    /// Submit the active workout draft (workout row, then slots joined).
    pub async fn submit_workout_builder(&mut self) {
        let Some(mut builder) = self.workout_builder.take() else {
            return;
        };

        self.requests.workouts.begin();

        match self
            .resolve_image(&builder.image_path, WORKOUT_UPLOAD_FOLDER, "")
            .await
        {
            Ok(url) => builder.draft.thumbnail_url = url,
            Err(e) => {
                self.requests.workouts.fail(e.to_string());
                self.workout_builder = Some(builder);
                return;
            }
        }

        match self.api.create_workout(&builder.draft).await {
            Ok(id) => {
                info!(workout_id = id, "Workout created");
                self.requests.workouts.succeed();
                self.status_message = Some(format!("Workout \"{}\" created", builder.draft.name));
                self.load_screen(Screen::Workouts).await;
            }
            Err(e) => {
                let auth = e.is_auth();
                self.handle_api_error(Screen::Workouts, e);
                if !auth {
                    self.workout_builder = Some(builder);
                }
            }
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    pub fn confirm_delete(&mut self) {
        let target = match self.route {
            Route::Screen(Screen::Library) => {
                self.catalog_items.get(self.catalog_selection).map(|item| DeleteTarget {
                    label: item.name.clone(),
                    kind: DeleteKind::Catalog(self.catalog_kind, item.id),
                })
            }
            Route::Screen(Screen::Exercises) => {
                self.exercises.get(self.exercises_selection).map(|e| DeleteTarget {
                    label: e.name.clone(),
                    kind: DeleteKind::Exercise(e.id),
                })
            }
            Route::Screen(Screen::Meals) => {
                self.meals.get(self.meals_selection).map(|m| DeleteTarget {
                    label: m.name.clone(),
                    kind: DeleteKind::Meal(m.id),
                })
            }
            Route::Screen(Screen::Programs) => {
                self.programs.get(self.programs_selection).map(|p| DeleteTarget {
                    label: p.name.clone(),
                    kind: DeleteKind::Program(p.id),
                })
            }
            Route::Screen(Screen::Workouts) => {
                self.workouts.get(self.workouts_selection).map(|w| DeleteTarget {
                    label: w.name.clone(),
                    kind: DeleteKind::Workout(w.id),
                })
            }
            Route::Screen(Screen::Users) => {
                self.users.get(self.users_selection).map(|u| DeleteTarget {
                    label: u.name.clone(),
                    kind: DeleteKind::User(u.id),
                })
            }
            _ => None,
        };

        if let Some(target) = target {
            self.delete_target = Some(target);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_target = None;
        self.state = AppState::Normal;
    }

    pub async fn execute_delete(&mut self) {
        let Some(target) = self.delete_target.take() else {
            return;
        };
        self.state = AppState::Normal;

        let (screen, outcome) = match target.kind {
            DeleteKind::Catalog(kind, id) => {
                (Screen::Library, self.api.delete_catalog_item(kind, id).await)
            }
            DeleteKind::Exercise(id) => (Screen::Exercises, self.api.delete_exercise(id).await),
            DeleteKind::Meal(id) => (Screen::Meals, self.api.delete_meal(id).await),
            DeleteKind::Program(id) => (Screen::Programs, self.api.delete_program(id).await),
            DeleteKind::Workout(id) => (Screen::Workouts, self.api.delete_workout(id).await),
            DeleteKind::User(id) => (Screen::Users, self.api.delete_user(id).await),
        };

        match outcome {
            Ok(()) => {
                self.status_message = Some(format!("Deleted \"{}\"", target.label));
                self.load_screen(screen).await;
            }
            Err(e) => self.handle_api_error(screen, e),
        }
    }

    // =========================================================================
    // Users screen shortcuts
    // =========================================================================

    /// Toggle the selected user's role and persist it.
    pub async fn toggle_user_role(&mut self) {
        if let Some(user) = self.users.get(self.users_selection).cloned() {
            let role = user.role.toggle();
            match self.api.update_user(user.id, role, user.status).await {
                Ok(()) => self.load_screen(Screen::Users).await,
                Err(e) => self.handle_api_error(Screen::Users, e),
            }
        }
    }

    /// Toggle the selected user's status and persist it.
    pub async fn toggle_user_status(&mut self) {
        if let Some(user) = self.users.get(self.users_selection).cloned() {
            let status = user.status.toggle();
            match self.api.update_user(user.id, user.role, status).await {
                Ok(()) => self.load_screen(Screen::Users).await,
                Err(e) => self.handle_api_error(Screen::Users, e),
            }
        }
    }

    // =========================================================================
    // Selection helpers
    // =========================================================================

    /// Length of the list the current screen selects over.
    pub fn current_list_len(&self) -> usize {
        match self.route {
            Route::Screen(Screen::Exercises) => self.exercises.len(),
            Route::Screen(Screen::Library) => self.catalog_items.len(),
            Route::Screen(Screen::Meals) => self.meals.len(),
            Route::Screen(Screen::Programs) => self.programs.len(),
            Route::Screen(Screen::Workouts) => self.workouts.len(),
            Route::Screen(Screen::Users) => self.users.len(),
            _ => 0,
        }
    }

    pub fn current_selection_mut(&mut self) -> Option<&mut usize> {
        match self.route {
            Route::Screen(Screen::Exercises) => Some(&mut self.exercises_selection),
            Route::Screen(Screen::Library) => Some(&mut self.catalog_selection),
            Route::Screen(Screen::Meals) => Some(&mut self.meals_selection),
            Route::Screen(Screen::Programs) => Some(&mut self.programs_selection),
            Route::Screen(Screen::Workouts) => Some(&mut self.workouts_selection),
            Route::Screen(Screen::Users) => Some(&mut self.users_selection),
            _ => None,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }
        if let Some(selection) = self.current_selection_mut() {
            let current = *selection as isize;
            *selection = (current + delta).clamp(0, len as isize - 1) as usize;
        }
    }
}

// ============================================================================
// Input parsing helpers
// ============================================================================

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a y/n-ish flag. Anything but an explicit no reads as yes.
fn parse_flag(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "n" | "no" | "false" | "0")
}

fn parse_id(value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("\"{}\" is not a valid id", value))
}

/// Parse a comma-separated id list; blanks between commas are skipped.
fn parse_id_list(value: &str) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        ids.push(parse_id(part)?);
    }
    Ok(ids)
}

fn parse_optional_u32(value: &str) -> Result<Option<u32>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| anyhow::anyhow!("\"{}\" is not a valid number", value))
}

fn parse_role(value: &str) -> Result<UserRole> {
    match value.to_lowercase().as_str() {
        "admin" => Ok(UserRole::Admin),
        "user" => Ok(UserRole::User),
        other => Err(anyhow::anyhow!("Unknown role \"{}\"", other)),
    }
}

fn parse_status(value: &str) -> Result<UserStatus> {
    match value.to_lowercase().as_str() {
        "active" => Ok(UserStatus::Active),
        "inactive" => Ok(UserStatus::Inactive),
        other => Err(anyhow::anyhow!("Unknown status \"{}\"", other)),
    }
}

/// Map a login failure to a friendly message.
fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Invalid email or password".to_string(),
        ApiError::Request { status, .. } if *status == 403 => {
            "Invalid email or password".to_string()
        }
        ApiError::Network(e) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        ApiError::Network(_) => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        other => format!("Login failed: {}", other),
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c)
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Route guard =====

    #[test]
    fn guard_sends_anonymous_requests_to_login() {
        assert_eq!(
            route_screen(Route::Screen(Screen::Meals), false),
            Route::Login
        );
        assert_eq!(
            route_screen(Route::Screen(Screen::Dashboard), false),
            Route::Login
        );
    }

    #[test]
    fn guard_keeps_anonymous_login_requests() {
        assert_eq!(route_screen(Route::Login, false), Route::Login);
    }

    #[test]
    fn guard_bounces_authenticated_login_requests_to_dashboard() {
        assert_eq!(
            route_screen(Route::Login, true),
            Route::Screen(Screen::Dashboard)
        );
    }

    #[test]
    fn guard_passes_authenticated_screen_requests_through() {
        assert_eq!(
            route_screen(Route::Screen(Screen::Users), true),
            Route::Screen(Screen::Users)
        );
    }

    // ===== Screens =====

    #[test]
    fn screen_cycle_wraps_both_ways() {
        let mut screen = Screen::Dashboard;
        for _ in 0..8 {
            screen = screen.next();
        }
        assert_eq!(screen, Screen::Dashboard);

        for _ in 0..8 {
            screen = screen.prev();
        }
        assert_eq!(screen, Screen::Dashboard);
    }

    // ===== Request state =====

    #[test]
    fn request_state_clears_error_on_begin() {
        let mut state = RequestState::default();
        state.fail("boom".to_string());
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.begin();
        assert!(state.in_flight);
        assert!(state.error.is_none());

        state.succeed();
        assert!(!state.in_flight);
    }

    // ===== Program builder rows =====

    #[test]
    fn builder_rows_flatten_in_display_order() {
        let mut builder = ProgramBuilder::default();
        builder.draft.add_week("Base");
        builder.draft.add_week("Peak");
        builder.draft.add_day(0);
        builder.draft.add_exercise(
            0,
            0,
            DayExercise {
                exercise_id: 9,
                exercise_name: "squat".to_string(),
                position: 0,
                reps: Some(5),
                duration_seconds: None,
                rest_seconds: 90,
            },
        );

        assert_eq!(
            builder.rows(),
            vec![
                BuilderRow::Week(0),
                BuilderRow::Day(0, 0),
                BuilderRow::Slot(0, 0, 0),
                BuilderRow::Week(1),
            ]
        );
    }

    #[test]
    fn builder_selection_clamps_after_removal() {
        let mut builder = ProgramBuilder::default();
        builder.draft.add_week("Base");
        builder.selection = 5;
        builder.clamp_selection();
        assert_eq!(builder.selection, 0);
        assert_eq!(builder.selected_row(), Some(BuilderRow::Week(0)));
    }

    // ===== Parsers =====

    #[test]
    fn id_lists_skip_blanks() {
        assert_eq!(parse_id_list("1, 2,,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("").unwrap(), Vec::<i64>::new());
        assert!(parse_id_list("1,x").is_err());
    }

    #[test]
    fn flags_default_to_yes() {
        assert!(parse_flag("y"));
        assert!(parse_flag(""));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("n"));
        assert!(!parse_flag("NO"));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn optional_numbers_parse_or_err() {
        assert_eq!(parse_optional_u32("").unwrap(), None);
        assert_eq!(parse_optional_u32("45").unwrap(), Some(45));
        assert!(parse_optional_u32("-2").is_err());
    }

    #[test]
    fn roles_and_statuses_parse_case_insensitively() {
        assert_eq!(parse_role("Admin").unwrap(), UserRole::Admin);
        assert_eq!(parse_status("INACTIVE").unwrap(), UserStatus::Inactive);
        assert!(parse_role("root").is_err());
        assert!(parse_status("gone").is_err());
    }

    // ===== Login input =====

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(!can_add_email_char(MAX_EMAIL_LENGTH, 'a'));
        assert!(!can_add_email_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, '!'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, 'x'));
    }
}
