//! Sequential playback of action programs.
//!
//! [`execute_step`] is the pure per-action state update. [`Timeline`] walks a
//! compiled plan, committing one step at a time and waiting the configured
//! pacing in between. [`run_program`] drives a timeline to the end without
//! wall-clock time.

pub mod run;
pub mod step;
pub mod timeline;


pub use run::{run_program, trace_program};
pub use step::{apply_action, execute_planned, execute_step, message_hold_ms};
pub use timeline::{Timeline, TimelineEvent};
