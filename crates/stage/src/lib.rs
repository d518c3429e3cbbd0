use bevy::prelude::*;

pub mod agent_protocol;
pub mod catalog;
pub mod config;
pub mod interpreter;
pub mod playback;
pub mod program;
pub mod sprite;
pub mod stage_params;
pub mod stage_rng;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Stage time, advanced by `StageParams::timing.tick_ms` every fixed tick.
/// All published `at_ms` values are read from here.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageClock {
    pub tick: u64,
    pub elapsed_ms: u64,
}

/// Fixed-update ordering for the stage. Configured as a chain.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageSet {
    Clock,
    Input,
    Advance,
    Start,
    Complete,
}

pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        // Params first: the RNG seed and the fixed timestep are read from it.
        app.add_plugins(stage_params::StageParamsPlugin);
        app.add_plugins(stage_rng::StageRngPlugin);

        app.init_resource::<StageClock>()
            .configure_sets(
                FixedUpdate,
                (
                    StageSet::Clock,
                    StageSet::Input,
                    StageSet::Advance,
                    StageSet::Start,
                    StageSet::Complete,
                )
                    .chain(),
            )
            .add_systems(Startup, sprite::spawn_roster);

        app.add_plugins(playback::PlaybackPlugin);
    }
}
