//! API client for the fitness content platform.
//!
//! Every remote call the console makes goes through [`ApiClient::request`],
//! which owns the authentication contract: pre-flight token validity
//! check, bearer header attachment, self-healing of the redundant token
//! storage, and uniform 401 handling. Domain methods are thin typed
//! wrappers over it.
//!
//! Success responses arrive enveloped as `{"status": "success", "data": ...}`;
//! error responses optionally carry a `message` field.

use std::sync::Arc;

use futures::future::try_join_all;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::{claims, TokenStore};
use crate::models::{
    CatalogItem, CatalogKind, DashboardStats, Exercise, ExercisePayload, Meal, MealDraft,
    Program, ProgramDraft, User, UserRole, UserStatus, Workout, WorkoutDraft,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Whether a call requires a usable session token before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAuth {
    /// Pre-flight validity check is mandatory; the call never reaches
    /// the network on an invalid token.
    Required,
    /// Anonymous call (login).
    Skip,
}

/// Success envelope used by the platform API.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Minimal shape of a created row, for parent-then-children flows.
#[derive(Debug, Deserialize)]
struct Created {
    id: i64,
}

/// API client. Clone is cheap - reqwest::Client uses Arc internally for
/// connection pooling, and the token store is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: String, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // =========================================================================
    // Request core
    // =========================================================================

    /// Single entry point for all calls against the remote API.
    ///
    /// Contract, in order: pre-flight validity check (unless `Skip`),
    /// bearer attachment plus primary-slot healing, network call, 401
    /// handling independent of the pre-flight, error-body extraction for
    /// other failures, JSON parse on success. No retries.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: RequestAuth,
    ) -> Result<Value, ApiError> {
        if auth == RequestAuth::Required && !claims::is_token_valid(&self.tokens) {
            warn!(path, "Stored token missing or expired, not sending request");
            self.tokens.clear();
            return Err(ApiError::Unauthorized);
        }

        let mut req = self.client.request(method.clone(), self.url(path));

        if let Some(token) = self.tokens.get() {
            req = req.bearer_auth(&token);
            // Heal the primary slot if it lapsed while the fallback survived
            if !self.tokens.primary_present() {
                self.tokens.restore_primary(&token);
            }
        }

        if let Some(ref body) = body {
            req = req.json(body);
        }

        debug!(%method, path, "API request");
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "Server rejected credentials");
            self.tokens.clear();
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn data<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value::<Envelope<T>>(value)
            .map(|e| e.data)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self
            .request(Method::GET, path, None, RequestAuth::Required)
            .await?;
        Self::data(value)
    }

    async fn post_data<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        let value = self
            .request(Method::POST, path, Some(body), RequestAuth::Required)
            .await?;
        Self::data(value)
    }

    async fn post_ok(&self, path: &str, body: Value) -> Result<(), ApiError> {
        self.request(Method::POST, path, Some(body), RequestAuth::Required)
            .await?;
        Ok(())
    }

    async fn patch_ok(&self, path: &str, body: Value) -> Result<(), ApiError> {
        self.request(Method::PATCH, path, Some(body), RequestAuth::Required)
            .await?;
        Ok(())
    }

    async fn delete_ok(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, None, RequestAuth::Required)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Authenticate and return the bearer token. Storing it is the
    /// caller's decision.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let value = self
            .request(
                Method::POST,
                "auth/login",
                Some(json!({ "email": email, "password": password })),
                RequestAuth::Skip,
            )
            .await?;

        value
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidResponse("login response missing token".to_string()))
    }

    /// Fetch the authenticated account.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_data("users/auth/me").await
    }

    /// Update the authenticated account's profile.
    pub async fn update_profile(&self, name: &str) -> Result<(), ApiError> {
        self.patch_ok("me/update", json!({ "name": name })).await
    }

    /// Change the authenticated account's password. A success invalidates
    /// the session server-side; callers clear the token store and route
    /// back to login.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        self.post_ok(
            "me/auto-reset-password",
            json!({ "current_password": current, "new_password": new }),
        )
        .await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn statistics(&self) -> Result<DashboardStats, ApiError> {
        self.get_data("statistics").await
    }

    // =========================================================================
    // Lookup catalogs (body parts, categories, equipment)
    // =========================================================================

    pub async fn list_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ApiError> {
        self.get_data(kind.path()).await
    }

    pub async fn create_catalog_item(&self, kind: CatalogKind, name: &str) -> Result<(), ApiError> {
        self.post_ok(kind.path(), json!({ "name": name })).await
    }

    pub async fn update_catalog_item(
        &self,
        kind: CatalogKind,
        id: i64,
        name: &str,
    ) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("{}/{}", kind.path(), id),
            json!({ "id": id, "name": name }),
        )
        .await
    }

    pub async fn delete_catalog_item(&self, kind: CatalogKind, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("{}/{}", kind.path(), id)).await
    }

    /// Fetch all three lookup catalogs at once for the exercise form,
    /// joining the independent requests before returning.
    pub async fn exercise_options(
        &self,
    ) -> Result<(Vec<CatalogItem>, Vec<CatalogItem>, Vec<CatalogItem>), ApiError> {
        futures::try_join!(
            self.list_catalog(CatalogKind::Categories),
            self.list_catalog(CatalogKind::BodyParts),
            self.list_catalog(CatalogKind::Equipment),
        )
    }

    // =========================================================================
    // Exercises
    // =========================================================================

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        self.get_data("exercises").await
    }

    /// Create an exercise, then attach its category, body-part, and
    /// equipment relations against the new id, all joined concurrently.
    pub async fn create_exercise(
        &self,
        payload: &ExercisePayload,
        category_ids: &[i64],
        body_part_ids: &[i64],
        equipment_ids: &[i64],
    ) -> Result<i64, ApiError> {
        let created: Created = self
            .post_data(
                "exercises",
                serde_json::to_value(payload)
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()))?,
            )
            .await?;

        let category_posts: Vec<_> = category_ids
            .iter()
            .map(|&category_id| {
                let path = format!("exercises/{}/categories", created.id);
                async move {
                    self.post_ok(
                        &path,
                        json!({ "exercise_id": created.id, "category_id": category_id }),
                    )
                    .await
                }
            })
            .collect();

        let body_part_posts: Vec<_> = body_part_ids
            .iter()
            .map(|&body_part_id| {
                self.post_ok(
                    "exercises/body-parts",
                    json!({ "exercise_id": created.id, "body_part_id": body_part_id }),
                )
            })
            .collect();

        let equipment_posts: Vec<_> = equipment_ids
            .iter()
            .map(|&equipment_id| {
                let path = format!("exercises/{}/equipment", created.id);
                async move {
                    self.post_ok(
                        &path,
                        json!({ "exercise_id": created.id, "equipment_id": equipment_id }),
                    )
                    .await
                }
            })
            .collect();

        futures::try_join!(
            try_join_all(category_posts),
            try_join_all(body_part_posts),
            try_join_all(equipment_posts),
        )?;

        Ok(created.id)
    }

    pub async fn update_exercise(&self, id: i64, payload: &ExercisePayload) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("exercises/{}", id),
            serde_json::to_value(payload).map_err(|e| ApiError::InvalidResponse(e.to_string()))?,
        )
        .await
    }

    pub async fn delete_exercise(&self, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("exercises/{}", id)).await
    }

    // =========================================================================
    // Meals
    // =========================================================================

    pub async fn list_meals(&self) -> Result<Vec<Meal>, ApiError> {
        self.get_data("meals").await
    }

    /// Create the meal row, then its ingredients and instructions
    /// sequentially. Stops at the first failure; earlier creates stand.
    pub async fn create_meal(&self, draft: &MealDraft) -> Result<i64, ApiError> {
        let created: Created = self
            .post_data(
                "meals",
                json!({
                    "name": draft.name,
                    "category": draft.category,
                    "description": draft.description,
                    "image_url": draft.image_url,
                }),
            )
            .await?;

        for ingredient in &draft.ingredients {
            self.post_ok(
                "meals/ingredients",
                json!({
                    "meal_id": created.id,
                    "name": ingredient.name,
                    "amount": ingredient.amount,
                }),
            )
            .await?;
        }

        for step in &draft.instructions {
            self.post_ok(
                "meals/instructions",
                json!({
                    "meal_id": created.id,
                    "step_number": step.step_number,
                    "instruction": step.instruction,
                }),
            )
            .await?;
        }

        Ok(created.id)
    }

    pub async fn update_meal(&self, meal: &Meal) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("meals/{}", meal.id),
            json!({
                "name": meal.name,
                "category": meal.category,
                "description": meal.description,
                "image_url": meal.image_url,
            }),
        )
        .await
    }

    pub async fn delete_meal(&self, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("meals/{}", id)).await
    }

    // =========================================================================
    // Programs
    // =========================================================================

    pub async fn list_programs(&self) -> Result<Vec<Program>, ApiError> {
        self.get_data("programmes").await
    }

    /// Create the program row, then each week, then each day's exercise
    /// slots, awaiting every create in order. A failure partway leaves
    /// the earlier rows in place and surfaces as this call's error.
    pub async fn create_program(&self, draft: &ProgramDraft) -> Result<i64, ApiError> {
        let created: Created = self
            .post_data(
                "programmes",
                json!({
                    "name": draft.name,
                    "description": draft.description,
                    "image_url": draft.image_url,
                    "total_weeks": draft.total_weeks(),
                }),
            )
            .await?;

        for week in &draft.weeks {
            let week_row: Created = self
                .post_data(
                    "programmes/weeks",
                    json!({
                        "programme_id": created.id,
                        "name": week.name,
                        "week_number": week.week_number,
                    }),
                )
                .await?;

            for day in &week.days {
                for slot in &day.exercises {
                    self.post_ok(
                        "programmes/exercises",
                        json!({
                            "programme_week_id": week_row.id,
                            "exercise_id": slot.exercise_id,
                            "day_number": day.day_number,
                            "position": slot.position,
                            "reps": slot.reps,
                            "duration_seconds": slot.duration_seconds,
                            "rest_seconds": slot.rest_seconds,
                        }),
                    )
                    .await?;
                }
            }
        }

        Ok(created.id)
    }

    pub async fn update_program(&self, program: &Program) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("programmes/{}", program.id),
            json!({
                "name": program.name,
                "description": program.description,
                "image_url": program.image_url,
                "total_weeks": program.total_weeks,
            }),
        )
        .await
    }

    pub async fn delete_program(&self, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("programmes/{}", id)).await
    }

    // =========================================================================
    // Workouts
    // =========================================================================

    pub async fn list_workouts(&self) -> Result<Vec<Workout>, ApiError> {
        self.get_data("workouts").await
    }

    /// Create the workout row, then post every exercise slot against the
    /// new id, joined concurrently.
    pub async fn create_workout(&self, draft: &WorkoutDraft) -> Result<i64, ApiError> {
        let created: Created = self
            .post_data(
                "workouts",
                json!({
                    "name": draft.name,
                    "description": draft.description,
                    "thumbnail_url": draft.thumbnail_url,
                    "difficulty": draft.difficulty,
                }),
            )
            .await?;

        let slots = draft.slots.iter().map(|slot| {
            self.post_ok(
                "workouts/exercises",
                json!({
                    "workout_id": created.id,
                    "exercise_id": slot.exercise_id,
                    "position": slot.position,
                    "sets_number": slot.sets_number,
                    "reps": slot.reps,
                    "duration_seconds": slot.duration_seconds,
                    "rest_seconds": slot.rest_seconds,
                }),
            )
        });
        try_join_all(slots).await?;

        Ok(created.id)
    }

    pub async fn update_workout(&self, workout: &Workout) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("workouts/{}", workout.id),
            json!({
                "name": workout.name,
                "description": workout.description,
                "thumbnail_url": workout.thumbnail_url,
                "difficulty": workout.difficulty,
            }),
        )
        .await
    }

    pub async fn delete_workout(&self, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("workouts/{}", id)).await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_data("users").await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
        status: UserStatus,
    ) -> Result<(), ApiError> {
        self.post_ok(
            "users",
            json!({ "name": name, "email": email, "role": role, "status": status }),
        )
        .await
    }

    /// Only role and status are editable on an existing account.
    pub async fn update_user(
        &self,
        id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<(), ApiError> {
        self.patch_ok(
            &format!("users/{}", id),
            json!({ "role": role, "status": status }),
        )
        .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete_ok(&format!("users/{}", id)).await
    }
}
