//! Plugin that wires up playback: events, session, log, and the fixed-update
//! systems in [`StageSet`] order.

use bevy::prelude::*;

use super::events::{
    DragReleased, MessageCleared, PlayCompleted, PlayRequested, ResetRequested, StepCommitted,
    TimelineFinished,
};
use super::log::PlaybackLog;
use super::session::PlaySession;
use super::systems::{
    advance_stage_clock, advance_timelines, apply_drag_releases, apply_resets, complete_play,
    start_playback,
};
use crate::program::{ProgramEditor, StagePrograms};
use crate::StageSet;

pub struct PlaybackPlugin;

impl Plugin for PlaybackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlaySession>()
            .init_resource::<PlaybackLog>()
            .init_resource::<StagePrograms>()
            .init_resource::<ProgramEditor>()
            .add_event::<PlayRequested>()
            .add_event::<ResetRequested>()
            .add_event::<DragReleased>()
            .add_event::<StepCommitted>()
            .add_event::<MessageCleared>()
            .add_event::<TimelineFinished>()
            .add_event::<PlayCompleted>();

        app.add_systems(
            FixedUpdate,
            (
                advance_stage_clock.in_set(StageSet::Clock),
                (apply_drag_releases, apply_resets)
                    .chain()
                    .in_set(StageSet::Input),
                advance_timelines.in_set(StageSet::Advance),
                start_playback.in_set(StageSet::Start),
                complete_play.in_set(StageSet::Complete),
            ),
        );
    }
}

/// Swap the double-buffered queues of every stage event. Drivers that run
/// `FixedUpdate` directly never reach `First`, where Bevy normally does this,
/// so they call it after each tick to drop events older than one tick.
pub fn update_stage_events(world: &mut World) {
    world.resource_mut::<Events<PlayRequested>>().update();
    world.resource_mut::<Events<ResetRequested>>().update();
    world.resource_mut::<Events<DragReleased>>().update();
    world.resource_mut::<Events<StepCommitted>>().update();
    world.resource_mut::<Events<MessageCleared>>().update();
    world.resource_mut::<Events<TimelineFinished>>().update();
    world.resource_mut::<Events<PlayCompleted>>().update();
}
