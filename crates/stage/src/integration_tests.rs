//! Integration tests for the stage using the `TestStage` harness.
//!
//! These spin up a headless Bevy App with `StagePlugin` and check playback
//! pacing, the multi-sprite join, reset, drag and the agent protocol working
//! together across systems.

mod protocol_tests;
