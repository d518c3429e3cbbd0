//! Deterministic RNG resource for "Go to random position".
//!
//! Wraps `ChaCha8Rng` so identical seeds replay identical random moves on
//! every platform. Systems take `ResMut<StageRng>` and pass `&mut rng.0` to the
//! interpreter.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::DEFAULT_SEED;
use crate::stage_params::StageParams;

#[derive(Resource)]
pub struct StageRng(pub ChaCha8Rng);

impl Default for StageRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl StageRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Seeds [`StageRng`] from `StageParams::seed`. Must be added after
/// [`crate::stage_params::StageParamsPlugin`].
pub struct StageRngPlugin;

impl Plugin for StageRngPlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<StageParams>()
            .map(|p| p.seed)
            .unwrap_or(DEFAULT_SEED);
        app.insert_resource(StageRng::from_seed_u64(seed));
    }
}
