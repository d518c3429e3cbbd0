//! Program setup and stage input for `TestStage`.

use bevy::prelude::*;

use crate::playback::{DragReleased, PlayRequested, ResetRequested};
use crate::program::{ActionProgram, StagePrograms};
use crate::sprite::SpriteId;

use super::TestStage;

impl TestStage {
    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    /// Set one sprite's program, leaving the others untouched.
    pub fn with_program(mut self, sprite: u32, blocks: &[&str]) -> Self {
        let program: ActionProgram = blocks.iter().copied().collect();
        self.app
            .world_mut()
            .resource_mut::<StagePrograms>()
            .0
            .insert(SpriteId(sprite), program);
        self
    }

    // -----------------------------------------------------------------------
    // Input events (consumed on the next tick)
    // -----------------------------------------------------------------------

    pub fn play(&mut self) -> &mut Self {
        self.app.world_mut().send_event(PlayRequested);
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.app.world_mut().send_event(ResetRequested);
        self
    }

    pub fn drag(&mut self, sprite: u32, dx: f32, dy: f32) -> &mut Self {
        self.app.world_mut().send_event(DragReleased {
            sprite: SpriteId(sprite),
            translation: Vec2::new(dx, dy),
        });
        self
    }
}
