use serde::{Deserialize, Serialize};

/// Entity counts for the dashboard, as returned by `/statistics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub body_parts_count: u64,
    #[serde(default)]
    pub categories_count: u64,
    #[serde(default)]
    pub equipment_count: u64,
    #[serde(default)]
    pub exercises_count: u64,
    #[serde(default)]
    pub meals_count: u64,
    #[serde(default)]
    pub programmes_count: u64,
    #[serde(default)]
    pub users_count: u64,
    #[serde(default)]
    pub workouts_count: u64,
}

impl DashboardStats {
    /// Rows for the dashboard cards, in display order.
    pub fn rows(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("Body Parts", self.body_parts_count),
            ("Categories", self.categories_count),
            ("Equipment", self.equipment_count),
            ("Exercises", self.exercises_count),
            ("Meals", self.meals_count),
            ("Programs", self.programmes_count),
            ("Users", self.users_count),
            ("Workouts", self.workouts_count),
        ]
    }
}
