//! Data models for the fitness content platform.
//!
//! This module contains the data structures the console works with:
//!
//! - `CatalogItem`: body parts, categories, and equipment lookups
//! - `Exercise`, `Meal`, `Program`, `Workout`: the content library
//! - Draft types (`MealDraft`, `ProgramDraft`, `WorkoutDraft`) for the
//!   nested builder forms, with their ordering invariants
//! - `User`: platform accounts
//! - `DashboardStats`: the statistics dashboard payload

pub mod catalog;
pub mod exercise;
pub mod meal;
pub mod program;
pub mod stats;
pub mod user;
pub mod workout;

pub use catalog::{CatalogItem, CatalogKind};
pub use exercise::{Exercise, ExercisePayload};
pub use meal::{Ingredient, Instruction, Meal, MealDraft};
pub use program::{DayExercise, Program, ProgramDay, ProgramDraft, ProgramWeek};
pub use stats::DashboardStats;
pub use user::{User, UserRole, UserStatus};
pub use workout::{Workout, WorkoutDraft, WorkoutSlot};
