use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteId;

/// Why an edit to a program could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditError {
    IndexOutOfRange { index: usize, len: usize },
    NoSpriteSelected,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::IndexOutOfRange { index, len } => {
                write!(f, "block index {index} out of range for program of {len} blocks")
            }
            EditError::NoSpriteSelected => f.write_str("no sprite selected"),
        }
    }
}

/// Ordered action identifiers for one sprite. Insertion order is execution
/// order. Identifiers are kept verbatim, including unknown ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionProgram {
    blocks: Vec<String>,
}

impl ActionProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, identifier: impl Into<String>) {
        self.blocks.push(identifier.into());
    }

    /// Remove the block at `index`, shifting later blocks left.
    pub fn remove_at(&mut self, index: usize) -> Result<String, EditError> {
        if index >= self.blocks.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        Ok(self.blocks.remove(index))
    }

    /// Toggle-on appends, toggle-off removes the first occurrence. Returns
    /// whether the identifier is present afterwards.
    pub fn toggle(&mut self, identifier: &str) -> bool {
        match self.blocks.iter().position(|b| b == identifier) {
            Some(index) => {
                self.blocks.remove(index);
                false
            }
            None => {
                self.blocks.push(identifier.to_string());
                true
            }
        }
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ActionProgram {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Programs keyed by sprite. Serializes as a JSON object keyed by sprite id.
pub type ProgramMap = BTreeMap<SpriteId, ActionProgram>;

/// The stage's own copy of every sprite's program, replaced wholesale when
/// the assembly surface hands its programs over.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct StagePrograms(pub ProgramMap);

impl StagePrograms {
    /// Program for `sprite`, or an empty one if none was assigned.
    pub fn program(&self, sprite: SpriteId) -> ActionProgram {
        self.0.get(&sprite).cloned().unwrap_or_default()
    }

    pub fn replace(&mut self, programs: ProgramMap) {
        self.0 = programs;
    }

    /// Parse a JSON object of `{ "<sprite id>": ["Move X by 50", ...] }`.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json)
            .map(Self)
            .map_err(|e| format!("JSON decode error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(ids: &[&str]) -> ActionProgram {
        ids.iter().copied().collect()
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut p = ActionProgram::new();
        p.append("Move X by 50");
        p.append("Rotate 180");
        p.append("Move X by 50");
        assert_eq!(p.blocks(), &["Move X by 50", "Rotate 180", "Move X by 50"]);
    }

    #[test]
    fn remove_at_deletes_only_that_index() {
        let mut p = program(&["Say Hello", "Move X by 50", "Say Hello"]);
        assert_eq!(p.remove_at(2), Ok("Say Hello".to_string()));
        assert_eq!(p.blocks(), &["Say Hello", "Move X by 50"]);
    }

    #[test]
    fn remove_at_out_of_range_is_an_error() {
        let mut p = program(&["Rotate 180"]);
        assert_eq!(
            p.remove_at(1),
            Err(EditError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut p = program(&["Move X by 50"]);
        assert!(p.toggle("Rotate 180"));
        assert_eq!(p.len(), 2);
        assert!(!p.toggle("Move X by 50"));
        assert_eq!(p.blocks(), &["Rotate 180"]);
    }

    #[test]
    fn stage_programs_default_to_empty() {
        let programs = StagePrograms::default();
        assert!(programs.program(SpriteId(9)).is_empty());
    }

    #[test]
    fn stage_programs_parse_from_json_object() {
        let programs =
            StagePrograms::from_json(r#"{ "1": ["Move X by 50", "Jump"], "3": [] }"#)
                .expect("valid program map");
        assert_eq!(programs.program(SpriteId(1)).blocks(), &["Move X by 50", "Jump"]);
        assert!(programs.program(SpriteId(3)).is_empty());
        assert!(programs.program(SpriteId(2)).is_empty());
    }
}
