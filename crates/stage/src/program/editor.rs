//! The assembly surface: builds one program per sprite by dropping, deleting
//! and toggling blocks, then hands the finished map to the stage.

use bevy::prelude::*;

use super::{ActionProgram, EditError, ProgramMap};
use crate::catalog;
use crate::sprite::SpriteId;

#[derive(Resource, Debug, Clone, Default)]
pub struct ProgramEditor {
    current: Option<SpriteId>,
    programs: ProgramMap,
}

impl ProgramEditor {
    /// Start editing with programs carried over from an earlier session.
    pub fn with_programs(programs: ProgramMap) -> Self {
        Self {
            current: None,
            programs,
        }
    }

    pub fn select(&mut self, sprite: SpriteId) {
        self.current = Some(sprite);
    }

    pub fn current(&self) -> Option<SpriteId> {
        self.current
    }

    fn current_program_mut(&mut self) -> Result<&mut ActionProgram, EditError> {
        let sprite = self.current.ok_or(EditError::NoSpriteSelected)?;
        Ok(self.programs.entry(sprite).or_default())
    }

    /// A block released over the drop area.
    pub fn drop_block(&mut self, identifier: &str) -> Result<(), EditError> {
        if !catalog::is_known(identifier) {
            warn!(
                "ProgramEditor: '{}' is not a catalog action; it will play as a no-op",
                identifier
            );
        }
        self.current_program_mut()?.append(identifier);
        Ok(())
    }

    pub fn delete_block(&mut self, index: usize) -> Result<String, EditError> {
        self.current_program_mut()?.remove_at(index)
    }

    /// Returns whether the block is in the program afterwards.
    pub fn toggle_block(&mut self, identifier: &str) -> Result<bool, EditError> {
        Ok(self.current_program_mut()?.toggle(identifier))
    }

    pub fn program(&self, sprite: SpriteId) -> Option<&ActionProgram> {
        self.programs.get(&sprite)
    }

    /// Hand a copy of every program to the stage. The editor keeps its own
    /// copy so a later session can continue from it.
    pub fn done(&self) -> ProgramMap {
        self.programs.clone()
    }
}
