use serde::{Deserialize, Serialize};

/// A standalone workout (not tied to a program week).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub difficulty: String,
}

/// One exercise slot in a workout draft. Positions are 1-based and
/// contiguous; `sets_number` defaults to a single set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSlot {
    pub exercise_id: i64,
    pub exercise_name: String,
    pub position: u32,
    pub sets_number: u32,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rest_seconds: u32,
}

/// In-memory workout being assembled before submission: the workout row
/// is created first, then each slot is posted against the new id.
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraft {
    pub name: String,
    pub description: String,
    pub thumbnail_url: String,
    pub difficulty: String,
    pub slots: Vec<WorkoutSlot>,
}

impl WorkoutDraft {
    pub fn add_slot(&mut self, slot: WorkoutSlot) {
        self.slots.push(slot);
        self.renumber();
    }

    pub fn remove_slot(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
            self.renumber();
        }
    }

    /// Swap a slot with its neighbor. `up` moves it earlier.
    pub fn move_slot(&mut self, index: usize, up: bool) {
        let len = self.slots.len();
        if up && index > 0 && index < len {
            self.slots.swap(index, index - 1);
        } else if !up && index + 1 < len {
            self.slots.swap(index, index + 1);
        }
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.position = i as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: i64) -> WorkoutSlot {
        WorkoutSlot {
            exercise_id: id,
            exercise_name: format!("ex-{}", id),
            position: 0,
            sets_number: 3,
            reps: Some(12),
            duration_seconds: None,
            rest_seconds: 60,
        }
    }

    fn positions(draft: &WorkoutDraft) -> Vec<(i64, u32)> {
        draft.slots.iter().map(|s| (s.exercise_id, s.position)).collect()
    }

    #[test]
    fn slots_number_contiguously() {
        let mut draft = WorkoutDraft::default();
        draft.add_slot(slot(1));
        draft.add_slot(slot(2));
        draft.add_slot(slot(3));
        assert_eq!(positions(&draft), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn remove_and_move_keep_contiguity() {
        let mut draft = WorkoutDraft::default();
        draft.add_slot(slot(1));
        draft.add_slot(slot(2));
        draft.add_slot(slot(3));

        draft.remove_slot(0);
        assert_eq!(positions(&draft), vec![(2, 1), (3, 2)]);

        draft.move_slot(1, true);
        assert_eq!(positions(&draft), vec![(3, 1), (2, 2)]);

        // Edge moves are no-ops
        draft.move_slot(0, true);
        draft.move_slot(1, false);
        assert_eq!(positions(&draft), vec![(3, 1), (2, 2)]);
    }
}
