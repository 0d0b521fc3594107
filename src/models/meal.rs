use serde::{Deserialize, Serialize};

/// A meal in the nutrition library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

/// One ingredient line on a meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

/// One preparation step. `step_number` is 1-based and contiguous within
/// a meal; the draft below maintains that under edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instruction {
    pub step_number: u32,
    pub instruction: String,
}

/// In-memory meal being assembled before submission. The meal row is
/// created first, then each ingredient and instruction is posted as a
/// child of the new id, in order.
#[derive(Debug, Clone, Default)]
pub struct MealDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
}

impl MealDraft {
    pub fn add_ingredient(&mut self, name: &str, amount: &str) {
        if name.trim().is_empty() {
            return;
        }
        self.ingredients.push(Ingredient {
            name: name.trim().to_string(),
            amount: amount.trim().to_string(),
        });
    }

    pub fn remove_ingredient(&mut self, index: usize) {
        if index < self.ingredients.len() {
            self.ingredients.remove(index);
        }
    }

    /// Append a step at the end of the instruction list.
    pub fn add_instruction(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let step_number = self.instructions.len() as u32 + 1;
        self.instructions.push(Instruction {
            step_number,
            instruction: text.trim().to_string(),
        });
    }

    pub fn remove_instruction(&mut self, index: usize) {
        if index < self.instructions.len() {
            self.instructions.remove(index);
            self.renumber_instructions();
        }
    }

    /// Swap a step with its neighbor. `up` moves it earlier.
    pub fn move_instruction(&mut self, index: usize, up: bool) {
        let len = self.instructions.len();
        if up && index > 0 && index < len {
            self.instructions.swap(index, index - 1);
        } else if !up && index + 1 < len {
            self.instructions.swap(index, index + 1);
        }
        self.renumber_instructions();
    }

    fn renumber_instructions(&mut self) {
        for (i, step) in self.instructions.iter_mut().enumerate() {
            step.step_number = i as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(draft: &MealDraft) -> Vec<(u32, &str)> {
        draft
            .instructions
            .iter()
            .map(|s| (s.step_number, s.instruction.as_str()))
            .collect()
    }

    #[test]
    fn instructions_number_contiguously() {
        let mut draft = MealDraft::default();
        draft.add_instruction("boil water");
        draft.add_instruction("add pasta");
        draft.add_instruction("drain");
        assert_eq!(
            steps(&draft),
            vec![(1, "boil water"), (2, "add pasta"), (3, "drain")]
        );
    }

    #[test]
    fn removing_a_step_renumbers() {
        let mut draft = MealDraft::default();
        draft.add_instruction("one");
        draft.add_instruction("two");
        draft.add_instruction("three");
        draft.remove_instruction(1);
        assert_eq!(steps(&draft), vec![(1, "one"), (2, "three")]);
    }

    #[test]
    fn moving_steps_keeps_numbering() {
        let mut draft = MealDraft::default();
        draft.add_instruction("one");
        draft.add_instruction("two");
        draft.add_instruction("three");

        draft.move_instruction(2, true);
        assert_eq!(steps(&draft), vec![(1, "one"), (2, "three"), (3, "two")]);

        // Moving the first step up is a no-op
        draft.move_instruction(0, true);
        assert_eq!(steps(&draft), vec![(1, "one"), (2, "three"), (3, "two")]);

        // As is moving the last step down
        draft.move_instruction(2, false);
        assert_eq!(steps(&draft), vec![(1, "one"), (2, "three"), (3, "two")]);
    }

    #[test]
    fn blank_entries_are_ignored() {
        let mut draft = MealDraft::default();
        draft.add_ingredient("  ", "100g");
        draft.add_instruction("   ");
        assert!(draft.ingredients.is_empty());
        assert!(draft.instructions.is_empty());
    }
}
