//! Sprites on the stage: identity, roster, and per-sprite visual state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SIZE;
use crate::playback::Playback;
use crate::stage_params::StageParams;

/// Stable identifier of a sprite, shared between the stage and the assembly
/// surface.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpriteId(pub u32);

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A character that can be placed on the stage.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    /// Asset path of the character icon. Loading it is the renderer's job.
    pub image: String,
}

impl Character {
    pub fn new(id: u32, name: &str, image: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            image: image.to_string(),
        }
    }

    pub fn default_roster() -> Vec<Character> {
        vec![
            Character::new(1, "Cat", "cat.png"),
            Character::new(2, "Dog", "dog.png"),
            Character::new(3, "Ball", "ball.png"),
        ]
    }

    pub fn sprite_id(&self) -> SpriteId {
        SpriteId(self.id)
    }
}

/// Everything the renderer needs to draw one sprite.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteVisualState {
    /// Offset from the top-left of the stage. Not clamped.
    pub position: Vec2,
    pub size: f32,
    /// Degrees, accumulated without wrapping.
    pub rotation: f32,
    /// Empty means no speech bubble.
    pub message: String,
}

impl Default for SpriteVisualState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: DEFAULT_SIZE,
            rotation: 0.0,
            message: String::new(),
        }
    }
}

impl SpriteVisualState {
    /// State with the configured default size.
    pub fn with_params(params: &StageParams) -> Self {
        Self {
            size: params.steps.default_size,
            ..Default::default()
        }
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn reset(&mut self, params: &StageParams) {
        *self = Self::with_params(params);
    }

    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }

    /// Commit a drag release: the sprite lands at the rounded-up sum of its
    /// position and the gesture translation.
    pub fn apply_drag(&mut self, translation: Vec2) {
        self.position = (self.position + translation).ceil();
    }
}

/// Startup system: spawns one entity per roster character.
pub fn spawn_roster(mut commands: Commands, params: Res<StageParams>) {
    for character in &params.roster {
        commands.spawn((
            character.sprite_id(),
            character.clone(),
            SpriteVisualState::with_params(&params),
            Playback::default(),
        ));
    }
    info!("Stage: spawned {} sprites", params.roster.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_stage_defaults() {
        let state = SpriteVisualState::default();
        assert_eq!(state.position, Vec2::ZERO);
        assert_eq!(state.size, 50.0);
        assert_eq!(state.rotation, 0.0);
        assert!(!state.has_message());
    }

    #[test]
    fn drag_rounds_up_the_landing_position() {
        let mut state = SpriteVisualState::at(10.0, 20.0);
        state.apply_drag(Vec2::new(4.2, -3.7));
        assert_eq!(state.position, Vec2::new(15.0, 17.0));
    }

    #[test]
    fn reset_restores_every_field() {
        let params = StageParams::default();
        let mut state = SpriteVisualState {
            position: Vec2::new(120.0, -40.0),
            size: 90.0,
            rotation: 540.0,
            message: "Hello".to_string(),
        };
        state.reset(&params);
        assert_eq!(state, SpriteVisualState::default());
    }

    #[test]
    fn default_roster_has_unique_ids() {
        let roster = Character::default_roster();
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cat", "Dog", "Ball"]);
        assert_eq!(roster[2].sprite_id(), SpriteId(3));
    }

    #[test]
    fn state_serializes_position_as_pair() {
        let json = serde_json::to_value(SpriteVisualState::at(1.0, 2.0)).unwrap();
        assert_eq!(json["position"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["message"], "");
    }
}
