//! The agent protocol driven end to end against a headless stage.

use bevy::ecs::event::Events;

use crate::agent_protocol::*;
use crate::playback::{PlayCompleted, PlayRequested, StepCommitted, TimelineFinished};
use crate::sprite::SpriteId;
use crate::test_harness::TestStage;

fn send(stage: &mut TestStage, json: &str) -> ResponsePayload {
    let cmd: StageCommand = serde_json::from_str(json).unwrap();
    process_command(cmd, stage.world_mut()).payload
}

fn sprite<'a>(payload: &'a ResponsePayload, id: u32) -> &'a SpriteSnapshot {
    match payload {
        ResponsePayload::Sprites { sprites, .. } => sprites
            .iter()
            .find(|s| s.id == SpriteId(id))
            .expect("sprite in snapshot"),
        other => panic!("expected sprites, got {other:?}"),
    }
}

#[test]
fn list_actions_returns_the_palette_in_order() {
    let mut stage = TestStage::new();
    match send(&mut stage, r#"{"cmd":"list_actions"}"#) {
        ResponsePayload::Actions { actions } => {
            assert_eq!(actions.len(), 11);
            assert_eq!(actions[0], "Move X by 50");
            assert_eq!(actions[10], "Repeat");
        }
        other => panic!("expected actions, got {other:?}"),
    }
}

#[test]
fn editing_without_a_selection_is_an_error() {
    let mut stage = TestStage::new();
    let payload = send(&mut stage, r#"{"cmd":"drop","action":"Rotate 180"}"#);
    assert_eq!(
        payload,
        ResponsePayload::Error {
            message: "no sprite selected".to_string()
        }
    );
}

#[test]
fn assembly_commands_echo_the_program() {
    let mut stage = TestStage::new();
    send(&mut stage, r#"{"cmd":"select","sprite":1}"#);
    send(&mut stage, r#"{"cmd":"drop","action":"Move X by 50"}"#);
    send(&mut stage, r#"{"cmd":"drop","action":"Rotate 180"}"#);
    let payload = send(&mut stage, r#"{"cmd":"toggle","action":"Say Hello"}"#);
    assert_eq!(
        payload,
        ResponsePayload::Program {
            sprite: SpriteId(1),
            blocks: vec![
                "Move X by 50".to_string(),
                "Rotate 180".to_string(),
                "Say Hello".to_string()
            ],
        }
    );

    let payload = send(&mut stage, r#"{"cmd":"delete","index":0}"#);
    assert_eq!(
        payload,
        ResponsePayload::Program {
            sprite: SpriteId(1),
            blocks: vec!["Rotate 180".to_string(), "Say Hello".to_string()],
        }
    );

    let payload = send(&mut stage, r#"{"cmd":"delete","index":7}"#);
    assert!(matches!(payload, ResponsePayload::Error { .. }));
}

#[test]
fn programs_reach_the_stage_only_after_done() {
    let mut stage = TestStage::new();
    send(&mut stage, r#"{"cmd":"select","sprite":2}"#);
    send(&mut stage, r#"{"cmd":"drop","action":"Move Y by 50"}"#);

    let payload = send(&mut stage, r#"{"cmd":"play"}"#);
    assert_eq!(sprite(&payload, 2).state.position.y, 0.0);
    send(&mut stage, r#"{"cmd":"run_until_idle"}"#);

    assert_eq!(send(&mut stage, r#"{"cmd":"done"}"#), ResponsePayload::Ok);
    let payload = send(&mut stage, r#"{"cmd":"play"}"#);
    assert_eq!(sprite(&payload, 2).state.position.y, 50.0);
}

#[test]
fn play_then_run_until_idle_reports_completion() {
    let mut stage = TestStage::new();
    send(&mut stage, r#"{"cmd":"select","sprite":1}"#);
    send(&mut stage, r#"{"cmd":"drop","action":"Move X by 50"}"#);
    send(&mut stage, r#"{"cmd":"drop","action":"Rotate 180"}"#);
    send(&mut stage, r#"{"cmd":"done"}"#);

    let payload = send(&mut stage, r#"{"cmd":"play"}"#);
    let cat = sprite(&payload, 1);
    assert_eq!(cat.name, "Cat");
    assert!(cat.playing);
    assert_eq!(cat.step, Some(0));
    assert_eq!(cat.state.position.x, 50.0);

    send(&mut stage, r#"{"cmd":"step","ticks":5}"#);
    let payload = send(&mut stage, r#"{"cmd":"observe"}"#);
    assert_eq!(sprite(&payload, 1).step, Some(1));
    assert_eq!(sprite(&payload, 2).step, None);

    let payload = send(&mut stage, r#"{"cmd":"run_until_idle","max_ticks":100}"#);
    assert_eq!(
        payload,
        ResponsePayload::PlayCompleted {
            completed: PlayCompleted {
                started_at_ms: 100,
                finished_at_ms: 1100,
                cancelled: false
            }
        }
    );

    let payload = send(&mut stage, r#"{"cmd":"observe"}"#);
    assert_eq!(sprite(&payload, 1).state.rotation, 180.0);
    assert!(!sprite(&payload, 1).playing);
    assert_eq!(sprite(&payload, 1).step, None);
}

#[test]
fn run_until_idle_when_idle_just_reports_the_clock() {
    let mut stage = TestStage::new();
    let payload = send(&mut stage, r#"{"cmd":"run_until_idle"}"#);
    assert_eq!(
        payload,
        ResponsePayload::StepComplete {
            tick: 0,
            elapsed_ms: 0
        }
    );
}

#[test]
fn run_until_idle_gives_up_after_max_ticks() {
    let mut stage = TestStage::new().with_program(1, &["Move X by 50", "Move X by 50"]);
    send(&mut stage, r#"{"cmd":"play"}"#);
    let payload = send(&mut stage, r#"{"cmd":"run_until_idle","max_ticks":2}"#);
    assert!(matches!(payload, ResponsePayload::Error { .. }));
}

#[test]
fn step_advances_the_clock() {
    let mut stage = TestStage::new();
    let payload = send(&mut stage, r#"{"cmd":"step","ticks":7}"#);
    assert_eq!(
        payload,
        ResponsePayload::StepComplete {
            tick: 7,
            elapsed_ms: 700
        }
    );
}

#[test]
fn drag_and_reset_return_fresh_snapshots() {
    let mut stage = TestStage::new();
    let payload = send(&mut stage, r#"{"cmd":"drag","sprite":3,"dx":12.5,"dy":7}"#);
    assert_eq!(sprite(&payload, 3).state.position.x, 13.0);
    assert_eq!(sprite(&payload, 3).state.position.y, 7.0);

    let payload = send(&mut stage, r#"{"cmd":"reset"}"#);
    assert_eq!(sprite(&payload, 3).state.position.x, 0.0);
}

#[test]
fn observe_lists_sprites_by_id() {
    let mut stage = TestStage::new();
    match send(&mut stage, r#"{"cmd":"observe"}"#) {
        ResponsePayload::Sprites { sprites, .. } => {
            let names: Vec<&str> = sprites.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["Cat", "Dog", "Ball"]);
        }
        other => panic!("expected sprites, got {other:?}"),
    }
}

#[test]
fn quit_says_goodbye() {
    let mut stage = TestStage::new();
    let response = process_command(StageCommand::Quit, stage.world_mut());
    assert_eq!(response.protocol_version, PROTOCOL_VERSION);
    assert_eq!(response.payload, ResponsePayload::Goodbye);
}

#[test]
fn repeated_plays_do_not_accumulate_events() {
    let mut stage = TestStage::new().with_program(1, &["Move X by 50"]);
    for _ in 0..200 {
        send(&mut stage, r#"{"cmd":"play"}"#);
        send(&mut stage, r#"{"cmd":"run_until_idle"}"#);
    }

    assert_eq!(stage.state(1).position.x, 200.0 * 50.0);
    assert_eq!(stage.session().completed_count(), 200);
    assert!(stage.resource::<Events<StepCommitted>>().len() <= 2);
    assert!(stage.resource::<Events<TimelineFinished>>().len() <= 2);
    assert!(stage.resource::<Events<PlayCompleted>>().len() <= 2);
    assert!(stage.resource::<Events<PlayRequested>>().len() <= 2);
}
