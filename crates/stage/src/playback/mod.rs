//! ECS runtime for playback: input events, per-sprite timelines, the join
//! over all sprites, and the published snapshot stream.

pub mod events;
pub mod log;
pub mod plugin;
pub mod session;
pub mod systems;

pub use events::*;
pub use log::{PlaybackLog, PlaybackLogEntry, StepKind};
pub use plugin::{update_stage_events, PlaybackPlugin};
pub use session::PlaySession;
pub use systems::Playback;
