use rand::Rng;

use super::timeline::{Timeline, TimelineEvent};
use crate::program::{ActionProgram, PlaybackPlan};
use crate::sprite::SpriteVisualState;
use crate::stage_params::StageParams;

/// Play `program` against `initial` to completion and return the final state.
/// Timed messages are cleared exactly as they would be in real time.
pub fn run_program<R: Rng>(
    initial: &SpriteVisualState,
    program: &ActionProgram,
    params: &StageParams,
    rng: &mut R,
) -> SpriteVisualState {
    trace_program(initial, program, params, rng).0
}

/// Like [`run_program`], also returning every intermediate event in order.
pub fn trace_program<R: Rng>(
    initial: &SpriteVisualState,
    program: &ActionProgram,
    params: &StageParams,
    rng: &mut R,
) -> (SpriteVisualState, Vec<TimelineEvent>) {
    let mut state = initial.clone();
    let mut timeline = Timeline::new(PlaybackPlan::compile(program));
    let events = timeline.run_to_end(&mut state, params, rng);
    (state, events)
}
