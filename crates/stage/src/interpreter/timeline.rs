//! Per-sprite playback state machine.
//!
//! A timeline never sleeps. The caller hands it a time budget each tick and it
//! commits every step that falls due inside that budget, carrying leftover
//! time into the next phase so pacing does not drift when the tick length
//! does not divide the delays.

use rand::Rng;
use serde::Serialize;

use super::step::{execute_planned, message_hold_ms};
use crate::program::PlaybackPlan;
use crate::sprite::SpriteVisualState;
use crate::stage_params::StageParams;

/// Something observable that happened on a timeline. `at_ms` is measured from
/// the moment the timeline started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TimelineEvent {
    Committed {
        index: usize,
        action: String,
        state: SpriteVisualState,
        at_ms: u64,
    },
    MessageCleared {
        state: SpriteVisualState,
        at_ms: u64,
    },
    Finished {
        at_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StepDue,
    Holding { remaining_ms: u64, then_pacing_ms: u64 },
    Pacing { remaining_ms: u64 },
    Finished,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    plan: PlaybackPlan,
    cursor: usize,
    phase: Phase,
    elapsed_ms: u64,
}

impl Timeline {
    pub fn new(plan: PlaybackPlan) -> Self {
        Self {
            plan,
            cursor: 0,
            phase: Phase::StepDue,
            elapsed_ms: 0,
        }
    }

    pub fn plan(&self) -> &PlaybackPlan {
        &self.plan
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Index of the step currently committed or waiting to be committed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Consume up to `budget_ms` of elapsed time, applying every step that
    /// falls due to `state`. A zero budget commits only what is due right now.
    pub fn advance<R: Rng>(
        &mut self,
        state: &mut SpriteVisualState,
        budget_ms: u64,
        params: &StageParams,
        rng: &mut R,
    ) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        let mut budget = budget_ms;

        loop {
            match self.phase {
                Phase::StepDue => {
                    let Some(step) = self.plan.step_at(self.cursor).cloned() else {
                        self.phase = Phase::Finished;
                        events.push(TimelineEvent::Finished {
                            at_ms: self.elapsed_ms,
                        });
                        break;
                    };
                    *state = execute_planned(state, &step, params, rng);
                    events.push(TimelineEvent::Committed {
                        index: self.cursor,
                        action: step.identifier().to_string(),
                        state: state.clone(),
                        at_ms: self.elapsed_ms,
                    });

                    let pacing = params.timing.step_pacing_ms;
                    let hold = message_hold_ms(&step, params);
                    self.phase = if hold > 0 {
                        Phase::Holding {
                            remaining_ms: hold,
                            then_pacing_ms: pacing.saturating_sub(hold),
                        }
                    } else {
                        Phase::Pacing {
                            remaining_ms: pacing,
                        }
                    };
                }
                Phase::Holding {
                    remaining_ms,
                    then_pacing_ms,
                } => {
                    if budget < remaining_ms {
                        self.phase = Phase::Holding {
                            remaining_ms: remaining_ms - budget,
                            then_pacing_ms,
                        };
                        self.elapsed_ms += budget;
                        break;
                    }
                    budget -= remaining_ms;
                    self.elapsed_ms += remaining_ms;
                    state.message.clear();
                    events.push(TimelineEvent::MessageCleared {
                        state: state.clone(),
                        at_ms: self.elapsed_ms,
                    });
                    self.phase = Phase::Pacing {
                        remaining_ms: then_pacing_ms,
                    };
                }
                Phase::Pacing { remaining_ms } => {
                    if budget < remaining_ms {
                        self.phase = Phase::Pacing {
                            remaining_ms: remaining_ms - budget,
                        };
                        self.elapsed_ms += budget;
                        break;
                    }
                    budget -= remaining_ms;
                    self.elapsed_ms += remaining_ms;
                    self.cursor += 1;
                    self.phase = Phase::StepDue;
                }
                Phase::Finished => break,
            }
        }

        events
    }

    /// Run every remaining step regardless of pacing.
    pub fn run_to_end<R: Rng>(
        &mut self,
        state: &mut SpriteVisualState,
        params: &StageParams,
        rng: &mut R,
    ) -> Vec<TimelineEvent> {
        self.advance(state, u64::MAX, params, rng)
    }

    /// Wall time a plan takes from its first commit to `Finished`.
    pub fn planned_duration_ms(plan: &PlaybackPlan, params: &StageParams) -> u64 {
        let pacing = params.timing.step_pacing_ms;
        plan.iter()
            .map(|step| pacing.max(message_hold_ms(step, params)))
            .sum()
    }
}
