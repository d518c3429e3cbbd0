//! # TestStage: headless harness for stage integration tests
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + [`StagePlugin`] so tests
//! can assemble programs, press Play, and step the fixed-update schedule one
//! tick at a time without a window or a wall clock.

mod input;
mod queries;

use bevy::prelude::*;

use crate::stage_params::StageParams;
use crate::StagePlugin;

/// A headless stage. Set up programs with the builder methods, then call
/// `tick()` and inspect the resulting ECS state.
pub struct TestStage {
    app: App,
}

impl Default for TestStage {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStage {
    /// The default roster (Cat, Dog, Ball) with default params.
    pub fn new() -> Self {
        Self::with_params(StageParams::default())
    }

    /// A stage built from custom params. The params are inserted before the
    /// plugin so the roster, seed and tick length all come from them.
    pub fn with_params(params: StageParams) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(params);
        app.add_plugins(StagePlugin);

        // One update so Startup spawns the roster.
        app.update();

        Self { app }
    }

    /// Access the underlying app, e.g. to add a probe system.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
