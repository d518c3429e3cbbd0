//! Fixed-update systems that turn input events into timeline progress and
//! publish every committed step.
//!
//! Order within a tick (see [`crate::StageSet`]): clock, input (drag, reset),
//! advance running timelines, start timelines for a new play request, then
//! the completion check. Starting after advancing means the first step of a
//! new play commits at zero elapsed time and its pacing begins on the next
//! tick.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::events::{
    DragReleased, MessageCleared, PlayCompleted, PlayRequested, ResetRequested, StepCommitted,
    TimelineFinished,
};
use super::log::{PlaybackLog, PlaybackLogEntry, StepKind};
use super::session::PlaySession;
use crate::interpreter::{Timeline, TimelineEvent};
use crate::program::{PlaybackPlan, StagePrograms};
use crate::sprite::{SpriteId, SpriteVisualState};
use crate::stage_params::StageParams;
use crate::stage_rng::StageRng;
use crate::StageClock;

/// Per-sprite playback slot. Idle when `timeline` is `None`.
#[derive(Component, Debug, Clone, Default)]
pub struct Playback {
    pub timeline: Option<Timeline>,
    /// Stage-clock time at which the current timeline started.
    pub started_at_ms: u64,
}

impl Playback {
    /// Index of the step the running timeline is on, if any.
    pub fn current_step(&self) -> Option<usize> {
        self.timeline.as_ref().map(Timeline::cursor)
    }

    /// Identifiers in the running program that are not catalog actions.
    pub fn unknown_actions(&self) -> &[String] {
        self.timeline
            .as_ref()
            .map(|timeline| timeline.plan().unknown())
            .unwrap_or_default()
    }
}

/// Everything a timeline publishes to.
#[derive(SystemParam)]
pub struct PlaybackOutputs<'w> {
    committed: EventWriter<'w, StepCommitted>,
    cleared: EventWriter<'w, MessageCleared>,
    finished: EventWriter<'w, TimelineFinished>,
    log: ResMut<'w, PlaybackLog>,
}

impl PlaybackOutputs<'_> {
    fn publish(&mut self, sprite: SpriteId, started_at_ms: u64, events: Vec<TimelineEvent>) {
        for event in events {
            match event {
                TimelineEvent::Committed {
                    index,
                    action,
                    state,
                    at_ms,
                } => {
                    let at_ms = started_at_ms + at_ms;
                    debug!("Playback {}: step {} '{}' at {}ms", sprite, index, action, at_ms);
                    self.log.push(PlaybackLogEntry {
                        sprite,
                        at_ms,
                        kind: StepKind::Committed {
                            index,
                            action: action.clone(),
                        },
                        state: state.clone(),
                    });
                    self.committed.send(StepCommitted {
                        sprite,
                        index,
                        action,
                        state,
                        at_ms,
                    });
                }
                TimelineEvent::MessageCleared { state, at_ms } => {
                    let at_ms = started_at_ms + at_ms;
                    debug!("Playback {}: message cleared at {}ms", sprite, at_ms);
                    self.log.push(PlaybackLogEntry {
                        sprite,
                        at_ms,
                        kind: StepKind::MessageCleared,
                        state: state.clone(),
                    });
                    self.cleared.send(MessageCleared {
                        sprite,
                        state,
                        at_ms,
                    });
                }
                TimelineEvent::Finished { at_ms } => {
                    self.finished.send(TimelineFinished {
                        sprite,
                        at_ms: started_at_ms + at_ms,
                    });
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

pub fn advance_stage_clock(mut clock: ResMut<StageClock>, params: Res<StageParams>) {
    clock.tick = clock.tick.wrapping_add(1);
    clock.elapsed_ms += params.timing.tick_ms;
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

pub fn apply_drag_releases(
    mut drags: EventReader<DragReleased>,
    mut sprites: Query<(&SpriteId, &mut SpriteVisualState)>,
) {
    for drag in drags.read() {
        match sprites.iter_mut().find(|(id, _)| **id == drag.sprite) {
            Some((_, mut state)) => state.apply_drag(drag.translation),
            None => warn!("Drag released over unknown sprite {}; ignoring", drag.sprite),
        }
    }
}

/// Reset does not wait for running timelines. Unless
/// `reset_cancels_playback` is set, a running timeline's next commit lands on
/// top of the reset values.
pub fn apply_resets(
    mut resets: EventReader<ResetRequested>,
    params: Res<StageParams>,
    clock: Res<StageClock>,
    mut session: ResMut<PlaySession>,
    mut sprites: Query<(&mut SpriteVisualState, &mut Playback)>,
    mut completed: EventWriter<PlayCompleted>,
) {
    if resets.read().count() == 0 {
        return;
    }
    for (mut state, mut playback) in &mut sprites {
        state.reset(&params);
        if params.reset_cancels_playback {
            playback.timeline = None;
        }
    }
    if params.reset_cancels_playback {
        if let Some(done) = session.cancel(clock.elapsed_ms) {
            info!("Stage reset cancelled the running play");
            completed.send(done);
            return;
        }
    }
    info!("Stage reset");
}

// ---------------------------------------------------------------------------
// Timelines
// ---------------------------------------------------------------------------

pub fn advance_timelines(
    params: Res<StageParams>,
    mut rng: ResMut<StageRng>,
    mut sprites: Query<(&SpriteId, &mut SpriteVisualState, &mut Playback)>,
    mut outputs: PlaybackOutputs,
) {
    let budget = params.timing.tick_ms;
    for (sprite, mut state, mut playback) in &mut sprites {
        let started_at_ms = playback.started_at_ms;
        let Some(timeline) = playback.timeline.as_mut() else {
            continue;
        };
        let events = timeline.advance(&mut state, budget, &params, &mut rng.0);
        let finished = timeline.is_finished();
        outputs.publish(*sprite, started_at_ms, events);
        if finished {
            playback.timeline = None;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn start_playback(
    mut requests: EventReader<PlayRequested>,
    params: Res<StageParams>,
    programs: Res<StagePrograms>,
    clock: Res<StageClock>,
    mut rng: ResMut<StageRng>,
    mut session: ResMut<PlaySession>,
    mut sprites: Query<(&SpriteId, &mut SpriteVisualState, &mut Playback)>,
    mut outputs: PlaybackOutputs,
) {
    if requests.read().count() == 0 {
        return;
    }
    if session.is_active() {
        warn!("Play requested while a play is still running; ignoring");
        return;
    }

    let now = clock.elapsed_ms;
    session.begin(sprites.iter().map(|(id, _, _)| *id), now);
    info!("Play started for {} sprites at {}ms", sprites.iter().count(), now);

    for (sprite, mut state, mut playback) in &mut sprites {
        let mut timeline = Timeline::new(PlaybackPlan::compile(&programs.program(*sprite)));
        let unknown = timeline.plan().unknown();
        if !unknown.is_empty() {
            warn!(
                "Program for sprite {} has unrecognized actions {:?}; they play as no-ops",
                sprite, unknown
            );
        }
        let events = timeline.advance(&mut state, 0, &params, &mut rng.0);
        outputs.publish(*sprite, now, events);
        playback.started_at_ms = now;
        playback.timeline = if timeline.is_finished() {
            None
        } else {
            Some(timeline)
        };
    }
}

pub fn complete_play(
    mut finished: EventReader<TimelineFinished>,
    clock: Res<StageClock>,
    mut session: ResMut<PlaySession>,
    mut completed: EventWriter<PlayCompleted>,
) {
    for event in finished.read() {
        session.mark_finished(event.sprite);
    }
    if !session.is_active() {
        return;
    }
    if let Some(done) = session.try_complete(clock.elapsed_ms) {
        info!(
            "Play finished after {}ms",
            done.finished_at_ms - done.started_at_ms
        );
        completed.send(done);
    }
}
