/// Fixed-update period in milliseconds. Every pacing delay below is a multiple
/// of this, so timelines land exactly on tick boundaries.
pub const TICK_MS: u64 = 100;

/// Delay between the commit of one step and the start of the next.
pub const STEP_PACING_MS: u64 = 500;
/// How long "Say Hello for 1 sec" keeps its message on screen.
pub const TIMED_MESSAGE_MS: u64 = 1000;

pub const DEFAULT_SIZE: f32 = 50.0;
pub const MIN_SIZE: f32 = 10.0;
pub const SIZE_STEP: f32 = 10.0;
pub const MOVE_STEP: f32 = 50.0;
pub const ROTATE_STEP: f32 = 180.0;

/// Target of "Move X=50, Y=50".
pub const FIXED_TARGET: (f32, f32) = (50.0, 50.0);

/// Exclusive upper bounds for "Go to random position".
pub const RANDOM_BOUND_X: u32 = 300;
pub const RANDOM_BOUND_Y: u32 = 500;

pub const HELLO_MESSAGE: &str = "Hello";

/// Seed for [`crate::stage_rng::StageRng`] when none is configured.
pub const DEFAULT_SEED: u64 = 42;
