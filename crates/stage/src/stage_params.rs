//! Data-driven stage parameters.
//!
//! Collects the pacing delays, step sizes and random bounds into a single
//! [`StageParams`] resource so a run can be tuned from a JSON file without
//! recompilation. Systems read `Res<StageParams>` instead of the constants in
//! [`crate::config`], which only provide the defaults.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_SEED, DEFAULT_SIZE, FIXED_TARGET, MIN_SIZE, MOVE_STEP, RANDOM_BOUND_X,
    RANDOM_BOUND_Y, ROTATE_STEP, SIZE_STEP, STEP_PACING_MS, TICK_MS, TIMED_MESSAGE_MS,
};
use crate::sprite::Character;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Delays that pace a timeline, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParams {
    /// Length of one fixed-update tick.
    pub tick_ms: u64,
    /// Wait between committing a step and starting the next one.
    pub step_pacing_ms: u64,
    /// Display time of "Say Hello for 1 sec".
    pub timed_message_ms: u64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            step_pacing_ms: STEP_PACING_MS,
            timed_message_ms: TIMED_MESSAGE_MS,
        }
    }
}

/// Magnitudes applied by the individual actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    pub default_size: f32,
    pub min_size: f32,
    pub size_step: f32,
    pub move_step: f32,
    pub rotate_step: f32,
    pub fixed_target: (f32, f32),
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
            min_size: MIN_SIZE,
            size_step: SIZE_STEP,
            move_step: MOVE_STEP,
            rotate_step: ROTATE_STEP,
            fixed_target: FIXED_TARGET,
        }
    }
}

/// Exclusive upper bounds for "Go to random position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomBounds {
    pub x: u32,
    pub y: u32,
}

impl Default for RandomBounds {
    fn default() -> Self {
        Self {
            x: RANDOM_BOUND_X,
            y: RANDOM_BOUND_Y,
        }
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// All tunables for one stage run.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageParams {
    pub timing: TimingParams,
    pub steps: StepParams,
    pub random_bounds: RandomBounds,
    /// Characters spawned onto the stage at startup.
    pub roster: Vec<Character>,
    /// Seed for [`crate::stage_rng::StageRng`].
    pub seed: u64,
    /// When set, Reset drops in-flight timelines instead of letting their next
    /// commit land on top of the reset values.
    pub reset_cancels_playback: bool,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            timing: TimingParams::default(),
            steps: StepParams::default(),
            random_bounds: RandomBounds::default(),
            roster: Character::default_roster(),
            seed: DEFAULT_SEED,
            reset_cancels_playback: false,
        }
    }
}

impl StageParams {
    /// Parse parameters from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| format!("JSON decode error: {e}"))?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    /// Reject values that would stall the fixed tick or make the random draw
    /// range empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.timing.tick_ms == 0 {
            return Err("timing.tick_ms must be greater than 0".to_string());
        }
        if self.random_bounds.x == 0 || self.random_bounds.y == 0 {
            return Err(format!(
                "random_bounds must be non-empty, got {}x{}",
                self.random_bounds.x, self.random_bounds.y
            ));
        }
        if self.steps.min_size <= 0.0 {
            return Err(format!(
                "steps.min_size must be positive, got {}",
                self.steps.min_size
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for character in &self.roster {
            if !seen.insert(character.id) {
                return Err(format!("duplicate sprite id {} in roster", character.id));
            }
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers [`StageParams`] (keeping any value inserted beforehand) and
/// matches the fixed timestep to `timing.tick_ms`.
pub struct StageParamsPlugin;

impl Plugin for StageParamsPlugin {
    fn build(&self, app: &mut App) {
        let params = match app.world().get_resource::<StageParams>() {
            Some(params) => match params.validate() {
                Ok(()) => params.clone(),
                Err(e) => {
                    warn!("StageParams: {}, falling back to defaults", e);
                    StageParams::default()
                }
            },
            None => StageParams::default(),
        };
        app.insert_resource(Time::<Fixed>::from_duration(params.tick()));
        app.insert_resource(params);
    }
}
