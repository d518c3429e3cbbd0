//! Agent text protocol for the `--agent` headless mode.
//!
//! External programs (scripts, test drivers, a remote UI) drive the stage over
//! newline-delimited JSON: one [`StageCommand`] per stdin line, one
//! [`StageResponse`] per stdout line. The types and the dispatcher live here
//! so they can be unit-tested against a headless world. The I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::playback::{
    update_stage_events, DragReleased, PlayCompleted, PlayRequested, PlaySession, Playback,
    ResetRequested,
};
use crate::program::{ProgramEditor, StagePrograms};
use crate::sprite::{Character, SpriteId, SpriteVisualState};
use crate::StageClock;

/// Monotonically increasing protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

/// Upper bound on ticks a single `step` or `run_until_idle` may run.
pub const MAX_TICKS_PER_COMMAND: u64 = 10_000;

fn default_max_ticks() -> u64 {
    MAX_TICKS_PER_COMMAND
}

// ---------------------------------------------------------------------------
// Commands (stdin → stage)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum StageCommand {
    /// The palette, in catalog order.
    ListActions,
    /// Choose which sprite the assembly commands edit.
    Select { sprite: SpriteId },
    /// Drop a block onto the selected sprite's program.
    Drop { action: String },
    /// Delete the block at `index` of the selected sprite's program.
    Delete { index: usize },
    Toggle { action: String },
    /// Hand the assembled programs to the stage.
    Done,
    /// A drag gesture ended with translation `(dx, dy)`.
    Drag { sprite: SpriteId, dx: f32, dy: f32 },
    Play,
    Reset,
    /// Advance the stage by `ticks` fixed ticks.
    Step { ticks: u64 },
    /// Tick until no play is running.
    RunUntilIdle {
        #[serde(default = "default_max_ticks")]
        max_ticks: u64,
    },
    /// Snapshot every sprite.
    Observe,
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (stage → stdout)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StageResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteSnapshot {
    pub id: SpriteId,
    pub name: String,
    pub state: SpriteVisualState,
    pub playing: bool,
    /// Step the sprite's running timeline is on.
    pub step: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Ready,
    Actions {
        actions: Vec<String>,
    },
    Program {
        sprite: SpriteId,
        blocks: Vec<String>,
    },
    Sprites {
        elapsed_ms: u64,
        sprites: Vec<SpriteSnapshot>,
    },
    StepComplete {
        tick: u64,
        elapsed_ms: u64,
    },
    PlayCompleted {
        completed: PlayCompleted,
    },
    Ok,
    Error {
        message: String,
    },
    Goodbye,
}

pub fn make_response(payload: ResponsePayload) -> StageResponse {
    StageResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

/// Serialize a response as a single JSON line.
pub fn to_line(response: &StageResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            "{{\"protocol_version\":{PROTOCOL_VERSION},\"type\":\"error\",\"message\":\"encode error: {e}\"}}"
        )
    })
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Apply one command to a world that has [`crate::StagePlugin`] installed.
/// Commands that need time to pass run the `FixedUpdate` schedule directly and
/// then swap the stage event buffers.
pub fn process_command(cmd: StageCommand, world: &mut World) -> StageResponse {
    let payload = match cmd {
        StageCommand::ListActions => ResponsePayload::Actions {
            actions: catalog::list_actions()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
        StageCommand::Select { sprite } => {
            world.resource_mut::<ProgramEditor>().select(sprite);
            program_payload(world, sprite)
        }
        StageCommand::Drop { action } => edit(world, |editor| editor.drop_block(&action)),
        StageCommand::Delete { index } => {
            edit(world, |editor| editor.delete_block(index).map(|_| ()))
        }
        StageCommand::Toggle { action } => {
            edit(world, |editor| editor.toggle_block(&action).map(|_| ()))
        }
        StageCommand::Done => {
            let programs = world.resource::<ProgramEditor>().done();
            world.resource_mut::<StagePrograms>().replace(programs);
            ResponsePayload::Ok
        }
        StageCommand::Drag { sprite, dx, dy } => {
            world.send_event(DragReleased {
                sprite,
                translation: Vec2::new(dx, dy),
            });
            tick(world, 1);
            observe(world)
        }
        StageCommand::Play => {
            world.send_event(PlayRequested);
            tick(world, 1);
            observe(world)
        }
        StageCommand::Reset => {
            world.send_event(ResetRequested);
            tick(world, 1);
            observe(world)
        }
        StageCommand::Step { ticks } => {
            tick(world, ticks.min(MAX_TICKS_PER_COMMAND));
            let clock = *world.resource::<StageClock>();
            ResponsePayload::StepComplete {
                tick: clock.tick,
                elapsed_ms: clock.elapsed_ms,
            }
        }
        StageCommand::RunUntilIdle { max_ticks } => run_until_idle(world, max_ticks),
        StageCommand::Observe => observe(world),
        StageCommand::Quit => ResponsePayload::Goodbye,
    };
    make_response(payload)
}

fn tick(world: &mut World, ticks: u64) {
    for _ in 0..ticks {
        fixed_tick(world);
    }
}

/// One fixed tick, then retire the previous tick's events.
fn fixed_tick(world: &mut World) {
    world.run_schedule(FixedUpdate);
    update_stage_events(world);
}

fn run_until_idle(world: &mut World, max_ticks: u64) -> ResponsePayload {
    let before = world.resource::<PlaySession>().completed_count();
    let limit = max_ticks.min(MAX_TICKS_PER_COMMAND);
    let mut ran = 0;
    while world.resource::<PlaySession>().is_active() && ran < limit {
        fixed_tick(world);
        ran += 1;
    }

    let session = world.resource::<PlaySession>();
    if session.is_active() {
        return ResponsePayload::Error {
            message: format!("play still running after {ran} ticks"),
        };
    }
    match session.last_completed() {
        Some(completed) if session.completed_count() > before => ResponsePayload::PlayCompleted {
            completed: completed.clone(),
        },
        _ => {
            let clock = *world.resource::<StageClock>();
            ResponsePayload::StepComplete {
                tick: clock.tick,
                elapsed_ms: clock.elapsed_ms,
            }
        }
    }
}

fn edit<F, E>(world: &mut World, apply: F) -> ResponsePayload
where
    F: FnOnce(&mut ProgramEditor) -> Result<(), E>,
    E: std::fmt::Display,
{
    let current = {
        let mut editor = world.resource_mut::<ProgramEditor>();
        if let Err(e) = apply(&mut *editor) {
            return ResponsePayload::Error {
                message: e.to_string(),
            };
        }
        editor.current()
    };
    match current {
        Some(sprite) => program_payload(world, sprite),
        None => ResponsePayload::Ok,
    }
}

fn program_payload(world: &World, sprite: SpriteId) -> ResponsePayload {
    let blocks = world
        .resource::<ProgramEditor>()
        .program(sprite)
        .map(|p| p.blocks().to_vec())
        .unwrap_or_default();
    ResponsePayload::Program { sprite, blocks }
}

fn observe(world: &mut World) -> ResponsePayload {
    let elapsed_ms = world.resource::<StageClock>().elapsed_ms;
    let mut sprites: Vec<SpriteSnapshot> = {
        let session = world.resource::<PlaySession>().clone();
        let mut query =
            world.query::<(&SpriteId, &Character, &SpriteVisualState, &Playback)>();
        query
            .iter(world)
            .map(|(id, character, state, playback)| SpriteSnapshot {
                id: *id,
                name: character.name.clone(),
                state: state.clone(),
                playing: session.is_playing(*id),
                step: playback.current_step(),
            })
            .collect()
    };
    sprites.sort_by_key(|s| s.id);
    ResponsePayload::Sprites {
        elapsed_ms,
        sprites,
    }
}
