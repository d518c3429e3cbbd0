use bevy::prelude::*;
use serde::Serialize;

use crate::sprite::{SpriteId, SpriteVisualState};

// ---------------------------------------------------------------------------
// Inputs (stage surface → core)
// ---------------------------------------------------------------------------

/// The Play button: start every sprite's program.
#[derive(Event, Debug, Clone, Default)]
pub struct PlayRequested;

/// The Reset button: restore every sprite to its default state.
#[derive(Event, Debug, Clone, Default)]
pub struct ResetRequested;

/// A pan gesture ended over `sprite` with the given total translation.
#[derive(Event, Debug, Clone)]
pub struct DragReleased {
    pub sprite: SpriteId,
    pub translation: Vec2,
}

// ---------------------------------------------------------------------------
// Outputs (core → renderer)
// ---------------------------------------------------------------------------

/// A step was applied. `state` is the sprite's state right after the commit
/// and `at_ms` is stage-clock time.
#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub struct StepCommitted {
    pub sprite: SpriteId,
    pub index: usize,
    pub action: String,
    pub state: SpriteVisualState,
    pub at_ms: u64,
}

/// A timed message expired.
#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub struct MessageCleared {
    pub sprite: SpriteId,
    pub state: SpriteVisualState,
    pub at_ms: u64,
}

/// One sprite's timeline ran out of steps.
#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFinished {
    pub sprite: SpriteId,
    pub at_ms: u64,
}

/// Every timeline started by a play request has finished, or a reset
/// cancelled them.
#[derive(Event, Debug, Clone, PartialEq, Serialize)]
pub struct PlayCompleted {
    pub started_at_ms: u64,
    pub finished_at_ms: u64,
    pub cancelled: bool,
}
