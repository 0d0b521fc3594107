use serde::{Deserialize, Serialize};

/// Days per training week. Week days beyond this cannot be added.
const MAX_DAYS_PER_WEEK: u32 = 7;

/// A workout program as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub total_weeks: u32,
}

/// One exercise slot inside a program day.
///
/// `position` is 1-based and contiguous within its day; the draft keeps
/// it that way through every edit. Exactly one of `reps` /
/// `duration_seconds` is normally set, depending on whether the slot is
/// rep-counted or timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayExercise {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub position: u32,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rest_seconds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramDay {
    pub day_number: u32,
    pub exercises: Vec<DayExercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramWeek {
    pub name: String,
    pub week_number: u32,
    pub days: Vec<ProgramDay>,
}

/// In-memory program being assembled in the builder before submission.
///
/// Structure invariants, restored after every mutation:
/// - `week_number` runs 1..=weeks.len() in list order
/// - `day_number` runs 1..=days.len() within each week
/// - `position` runs 1..=exercises.len() within each day
///
/// Submission creates the program row, then each week, then each slot,
/// sequentially; a failure partway leaves the earlier creates in place
/// (there is no rollback) and surfaces as the call's error.
#[derive(Debug, Clone, Default)]
pub struct ProgramDraft {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub weeks: Vec<ProgramWeek>,
}

impl ProgramDraft {
    pub fn total_weeks(&self) -> u32 {
        self.weeks.len() as u32
    }

    /// Append a week. Returns its index.
    pub fn add_week(&mut self, name: &str) -> usize {
        self.weeks.push(ProgramWeek {
            name: name.trim().to_string(),
            week_number: 0, // assigned by renumber
            days: Vec::new(),
        });
        self.renumber();
        self.weeks.len() - 1
    }

    pub fn remove_week(&mut self, index: usize) {
        if index < self.weeks.len() {
            self.weeks.remove(index);
            self.renumber();
        }
    }

    /// Swap a week with its neighbor. `up` moves it earlier.
    pub fn move_week(&mut self, index: usize, up: bool) {
        let len = self.weeks.len();
        if up && index > 0 && index < len {
            self.weeks.swap(index, index - 1);
        } else if !up && index + 1 < len {
            self.weeks.swap(index, index + 1);
        }
        self.renumber();
    }

    pub fn rename_week(&mut self, index: usize, name: &str) {
        if let Some(week) = self.weeks.get_mut(index) {
            week.name = name.trim().to_string();
        }
    }

    /// Append a day to a week, up to seven. Returns the new day's index.
    pub fn add_day(&mut self, week: usize) -> Option<usize> {
        let w = self.weeks.get_mut(week)?;
        if w.days.len() as u32 >= MAX_DAYS_PER_WEEK {
            return None;
        }
        w.days.push(ProgramDay::default());
        self.renumber();
        Some(self.weeks[week].days.len() - 1)
    }

    pub fn remove_day(&mut self, week: usize, day: usize) {
        if let Some(w) = self.weeks.get_mut(week) {
            if day < w.days.len() {
                w.days.remove(day);
                self.renumber();
            }
        }
    }

    pub fn add_exercise(&mut self, week: usize, day: usize, slot: DayExercise) {
        if let Some(d) = self
            .weeks
            .get_mut(week)
            .and_then(|w| w.days.get_mut(day))
        {
            d.exercises.push(slot);
            self.renumber();
        }
    }

    pub fn remove_exercise(&mut self, week: usize, day: usize, index: usize) {
        if let Some(d) = self
            .weeks
            .get_mut(week)
            .and_then(|w| w.days.get_mut(day))
        {
            if index < d.exercises.len() {
                d.exercises.remove(index);
                self.renumber();
            }
        }
    }

    /// Swap an exercise slot with its neighbor within the same day.
    pub fn move_exercise(&mut self, week: usize, day: usize, index: usize, up: bool) {
        if let Some(d) = self
            .weeks
            .get_mut(week)
            .and_then(|w| w.days.get_mut(day))
        {
            let len = d.exercises.len();
            if up && index > 0 && index < len {
                d.exercises.swap(index, index - 1);
            } else if !up && index + 1 < len {
                d.exercises.swap(index, index + 1);
            }
        }
        self.renumber();
    }

    /// Restore the contiguity invariants after any structural edit.
    fn renumber(&mut self) {
        for (wi, week) in self.weeks.iter_mut().enumerate() {
            week.week_number = wi as u32 + 1;
            for (di, day) in week.days.iter_mut().enumerate() {
                day.day_number = di as u32 + 1;
                for (ei, slot) in day.exercises.iter_mut().enumerate() {
                    slot.position = ei as u32 + 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64) -> DayExercise {
        DayExercise {
            exercise_id: id,
            exercise_name: format!("ex-{}", id),
            position: 0,
            reps: Some(10),
            duration_seconds: None,
            rest_seconds: 30,
        }
    }

    fn week_numbers(draft: &ProgramDraft) -> Vec<u32> {
        draft.weeks.iter().map(|w| w.week_number).collect()
    }

    #[test]
    fn weeks_number_contiguously() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_week("Build");
        draft.add_week("Peak");
        assert_eq!(week_numbers(&draft), vec![1, 2, 3]);
        assert_eq!(draft.total_weeks(), 3);
    }

    #[test]
    fn removing_a_week_renumbers() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_week("Build");
        draft.add_week("Peak");
        draft.remove_week(1);
        assert_eq!(week_numbers(&draft), vec![1, 2]);
        assert_eq!(draft.weeks[1].name, "Peak");
    }

    #[test]
    fn moving_weeks_renumbers_in_list_order() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_week("Build");
        draft.add_week("Peak");

        draft.move_week(2, true);
        let names: Vec<&str> = draft.weeks.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Peak", "Build"]);
        assert_eq!(week_numbers(&draft), vec![1, 2, 3]);

        // Edges are no-ops
        draft.move_week(0, true);
        draft.move_week(2, false);
        assert_eq!(week_numbers(&draft), vec![1, 2, 3]);
    }

    #[test]
    fn days_are_capped_at_seven() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        for _ in 0..7 {
            assert!(draft.add_day(0).is_some());
        }
        assert!(draft.add_day(0).is_none());
        let numbers: Vec<u32> = draft.weeks[0].days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn removing_a_day_renumbers() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_day(0);
        draft.add_day(0);
        draft.add_day(0);
        draft.remove_day(0, 0);
        let numbers: Vec<u32> = draft.weeks[0].days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn exercise_positions_stay_contiguous() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_day(0);
        draft.add_exercise(0, 0, slot(10));
        draft.add_exercise(0, 0, slot(20));
        draft.add_exercise(0, 0, slot(30));

        draft.remove_exercise(0, 0, 0);
        let day = &draft.weeks[0].days[0];
        let got: Vec<(i64, u32)> = day.exercises.iter().map(|e| (e.exercise_id, e.position)).collect();
        assert_eq!(got, vec![(20, 1), (30, 2)]);
    }

    #[test]
    fn moving_exercises_reorders_within_the_day() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.add_day(0);
        draft.add_exercise(0, 0, slot(10));
        draft.add_exercise(0, 0, slot(20));

        draft.move_exercise(0, 0, 1, true);
        let day = &draft.weeks[0].days[0];
        let got: Vec<(i64, u32)> = day.exercises.iter().map(|e| (e.exercise_id, e.position)).collect();
        assert_eq!(got, vec![(20, 1), (10, 2)]);
    }

    #[test]
    fn out_of_range_edits_are_no_ops() {
        let mut draft = ProgramDraft::default();
        draft.add_week("Base");
        draft.remove_week(5);
        draft.remove_day(0, 0);
        draft.remove_exercise(0, 0, 0);
        draft.move_week(9, false);
        assert_eq!(week_numbers(&draft), vec![1]);
    }
}
