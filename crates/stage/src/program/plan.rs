//! Compiles a flat block list into a [`PlaybackPlan`].
//!
//! `"Repeat"` blocks are not steps. Each one adds a further pass over the
//! whole program, so `[a, b, Repeat]` plays `a, b, a, b`. Unknown identifiers
//! remain in the plan as paced no-op steps.

use serde::{Deserialize, Serialize};

use super::ActionProgram;
use crate::catalog::ActionId;

/// One entry of a compiled plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedStep {
    Known(ActionId),
    Unknown(String),
}

impl PlannedStep {
    pub fn identifier(&self) -> &str {
        match self {
            PlannedStep::Known(id) => id.as_str(),
            PlannedStep::Unknown(raw) => raw,
        }
    }

    pub fn action(&self) -> Option<ActionId> {
        match self {
            PlannedStep::Known(id) => Some(*id),
            PlannedStep::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPlan {
    steps: Vec<PlannedStep>,
    passes: u32,
    unknown: Vec<String>,
}

impl PlaybackPlan {
    pub fn compile(program: &ActionProgram) -> Self {
        let mut steps = Vec::with_capacity(program.len());
        let mut unknown = Vec::new();
        let mut passes = 1u32;
        for identifier in program.iter() {
            match ActionId::parse(identifier) {
                Some(ActionId::Repeat) => passes = passes.saturating_add(1),
                Some(id) => steps.push(PlannedStep::Known(id)),
                None => {
                    unknown.push(identifier.to_string());
                    steps.push(PlannedStep::Unknown(identifier.to_string()));
                }
            }
        }
        Self {
            steps,
            passes,
            unknown,
        }
    }

    /// Total number of steps across every pass.
    pub fn len(&self) -> usize {
        self.steps.len() * self.passes as usize
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at position `index` of the flattened, repeated sequence.
    pub fn step_at(&self, index: usize) -> Option<&PlannedStep> {
        if index >= self.len() {
            return None;
        }
        self.steps.get(index % self.steps.len())
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Identifiers that are not in the catalog, in program order.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedStep> {
        (0..self.len()).filter_map(move |i| self.step_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(ids: &[&str]) -> PlaybackPlan {
        let program: ActionProgram = ids.iter().copied().collect();
        PlaybackPlan::compile(&program)
    }

    fn flattened(plan: &PlaybackPlan) -> Vec<&str> {
        plan.iter().map(PlannedStep::identifier).collect()
    }

    #[test]
    fn empty_program_has_no_steps() {
        let plan = compile(&[]);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.step_at(0), None);
    }

    #[test]
    fn repeat_adds_one_pass_over_the_whole_program() {
        let plan = compile(&["Move X by 50", "Repeat", "Rotate 180"]);
        assert_eq!(plan.passes(), 2);
        assert_eq!(
            flattened(&plan),
            vec!["Move X by 50", "Rotate 180", "Move X by 50", "Rotate 180"]
        );
    }

    #[test]
    fn each_repeat_token_counts() {
        let plan = compile(&["Say Hello", "Repeat", "Repeat"]);
        assert_eq!(plan.passes(), 3);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn repeat_only_program_is_empty() {
        let plan = compile(&["Repeat"]);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }

    #[test]
    fn unknown_identifiers_stay_as_steps_and_are_reported() {
        let plan = compile(&["Jump", "Move Y by 50", "spin"]);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.unknown(), &["Jump".to_string(), "spin".to_string()]);
        assert_eq!(plan.step_at(0), Some(&PlannedStep::Unknown("Jump".to_string())));
        assert_eq!(plan.step_at(1).and_then(PlannedStep::action), Some(ActionId::MoveYBy50));
    }
}
