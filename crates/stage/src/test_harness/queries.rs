//! Tick and query methods for `TestStage`.

use bevy::prelude::*;

use crate::playback::{
    MessageCleared, PlayCompleted, PlaySession, Playback, PlaybackLog, StepCommitted,
};
use crate::sprite::{SpriteId, SpriteVisualState};
use crate::StageClock;

use super::TestStage;

impl TestStage {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed ticks by executing the `FixedUpdate` schedule directly.
    /// Virtual time is bypassed; each tick advances the stage clock by
    /// `tick_ms`.
    pub fn tick(&mut self, n: u32) -> &mut Self {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
        self
    }

    /// Tick at least once, then until no play is running. Returns the number
    /// of ticks run, or `None` if a play is still running after `max_ticks`.
    pub fn tick_until_idle(&mut self, max_ticks: u32) -> Option<u32> {
        for n in 1..=max_ticks {
            self.tick(1);
            if !self.session().is_active() {
                return Some(n);
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Queries (World::query() requires &mut World)
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.app.world().resource::<R>()
    }

    /// Current visual state of one sprite.
    pub fn state(&mut self, sprite: u32) -> SpriteVisualState {
        let world = self.app.world_mut();
        let mut query = world.query::<(&SpriteId, &SpriteVisualState)>();
        query
            .iter(world)
            .find(|(id, _)| id.0 == sprite)
            .map(|(_, state)| state.clone())
            .unwrap_or_else(|| panic!("no sprite with id {sprite}"))
    }

    /// Playback slot of one sprite.
    pub fn playback(&mut self, sprite: u32) -> Playback {
        let world = self.app.world_mut();
        let mut query = world.query::<(&SpriteId, &Playback)>();
        query
            .iter(world)
            .find(|(id, _)| id.0 == sprite)
            .map(|(_, playback)| playback.clone())
            .unwrap_or_else(|| panic!("no sprite with id {sprite}"))
    }

    pub fn sprite_count(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query::<&SpriteId>().iter(world).count()
    }

    pub fn clock(&self) -> StageClock {
        *self.resource::<StageClock>()
    }

    pub fn session(&self) -> &PlaySession {
        self.resource::<PlaySession>()
    }

    pub fn log(&self) -> &PlaybackLog {
        self.resource::<PlaybackLog>()
    }

    // `tick()` never swaps the event buffers (only a full `app.update()` or
    // the agent protocol's ticks do), so the current buffer holds all of them.

    /// Every step committed since the stage was built.
    pub fn committed(&self) -> Vec<StepCommitted> {
        self.resource::<Events<StepCommitted>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    /// Committed steps for one sprite, in order.
    pub fn committed_for(&self, sprite: u32) -> Vec<StepCommitted> {
        self.committed()
            .into_iter()
            .filter(|e| e.sprite == SpriteId(sprite))
            .collect()
    }

    pub fn cleared(&self) -> Vec<MessageCleared> {
        self.resource::<Events<MessageCleared>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    pub fn completions(&self) -> Vec<PlayCompleted> {
        self.resource::<Events<PlayCompleted>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }
}
