use bevy::math::Vec2;
use rand::Rng;

use crate::catalog::ActionId;
use crate::config::HELLO_MESSAGE;
use crate::program::PlannedStep;
use crate::sprite::SpriteVisualState;
use crate::stage_params::StageParams;

/// Apply one identifier to `state`. Unknown identifiers return the state
/// unchanged. Only "Go to random position" draws from `rng`.
pub fn execute_step<R: Rng>(
    state: &SpriteVisualState,
    identifier: &str,
    params: &StageParams,
    rng: &mut R,
) -> SpriteVisualState {
    match ActionId::parse(identifier) {
        Some(action) => apply_action(state, action, params, rng),
        None => state.clone(),
    }
}

pub fn execute_planned<R: Rng>(
    state: &SpriteVisualState,
    step: &PlannedStep,
    params: &StageParams,
    rng: &mut R,
) -> SpriteVisualState {
    match step.action() {
        Some(action) => apply_action(state, action, params, rng),
        None => state.clone(),
    }
}

pub fn apply_action<R: Rng>(
    state: &SpriteVisualState,
    action: ActionId,
    params: &StageParams,
    rng: &mut R,
) -> SpriteVisualState {
    let steps = &params.steps;
    let mut next = state.clone();
    match action {
        ActionId::IncreaseSize => next.size += steps.size_step,
        ActionId::DecreaseSize => next.size = (next.size - steps.size_step).max(steps.min_size),
        ActionId::MoveXBy50 => next.position.x += steps.move_step,
        ActionId::MoveYBy50 => next.position.y += steps.move_step,
        ActionId::MoveToFixed => {
            next.position = Vec2::new(steps.fixed_target.0, steps.fixed_target.1);
        }
        ActionId::GoToOrigin => next.position = Vec2::ZERO,
        ActionId::GoToRandom => {
            let bounds = params.random_bounds;
            let x = rng.gen_range(0..bounds.x.max(1));
            let y = rng.gen_range(0..bounds.y.max(1));
            next.position = Vec2::new(x as f32, y as f32);
        }
        ActionId::SayHello | ActionId::SayHelloTimed => next.message = HELLO_MESSAGE.to_string(),
        ActionId::Rotate180 => next.rotation += steps.rotate_step,
        // Expanded into extra passes by `PlaybackPlan`; no per-step effect.
        ActionId::Repeat => {}
    }
    next
}

/// How long a step keeps its message up before the timeline clears it.
/// Zero means the message, if any, stays.
pub fn message_hold_ms(step: &PlannedStep, params: &StageParams) -> u64 {
    match step.action() {
        Some(action) if action.holds_message() => params.timing.timed_message_ms,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage_rng::StageRng;

    fn step(state: &SpriteVisualState, id: &str) -> SpriteVisualState {
        let mut rng = StageRng::default();
        execute_step(state, id, &StageParams::default(), &mut rng.0)
    }

    #[test]
    fn size_changes_by_ten() {
        let s = SpriteVisualState::default();
        assert_eq!(step(&s, "Increase Size").size, 60.0);
        assert_eq!(step(&s, "Decrease Size").size, 40.0);
    }

    #[test]
    fn decrease_size_floors_at_minimum() {
        let s = SpriteVisualState {
            size: 14.0,
            ..Default::default()
        };
        assert_eq!(step(&s, "Decrease Size").size, 10.0);
        let tiny = SpriteVisualState {
            size: 3.0,
            ..Default::default()
        };
        assert_eq!(step(&tiny, "Decrease Size").size, 10.0);
    }

    #[test]
    fn moves_are_relative_and_gotos_absolute() {
        let s = SpriteVisualState::at(7.0, 9.0);
        assert_eq!(step(&s, "Move X by 50").position, Vec2::new(57.0, 9.0));
        assert_eq!(step(&s, "Move Y by 50").position, Vec2::new(7.0, 59.0));
        assert_eq!(step(&s, "Move X=50, Y=50").position, Vec2::new(50.0, 50.0));
        assert_eq!(step(&s, "Go to (0,0)").position, Vec2::ZERO);
    }

    #[test]
    fn rotation_accumulates_past_a_full_turn() {
        let s = SpriteVisualState {
            rotation: 270.0,
            ..Default::default()
        };
        assert_eq!(step(&s, "Rotate 180").rotation, 450.0);
    }

    #[test]
    fn both_says_set_the_message() {
        let s = SpriteVisualState::default();
        assert_eq!(step(&s, "Say Hello").message, "Hello");
        assert_eq!(step(&s, "Say Hello for 1 sec").message, "Hello");
    }

    #[test]
    fn unknown_and_repeat_leave_state_unchanged() {
        let s = SpriteVisualState {
            position: Vec2::new(3.0, 4.0),
            size: 70.0,
            rotation: 90.0,
            message: "Hello".to_string(),
        };
        assert_eq!(step(&s, "Jump"), s);
        assert_eq!(step(&s, "Repeat"), s);
    }

    #[test]
    fn random_position_stays_in_configured_bounds() {
        let mut params = StageParams::default();
        params.random_bounds.x = 200;
        params.random_bounds.y = 200;
        let mut rng = StageRng::from_seed_u64(9);
        let s = SpriteVisualState::default();
        for _ in 0..500 {
            let next = execute_step(&s, "Go to random position", &params, &mut rng.0);
            assert!(next.position.x >= 0.0 && next.position.x < 200.0);
            assert!(next.position.y >= 0.0 && next.position.y < 200.0);
            assert_eq!(next.position.x.fract(), 0.0);
            assert_eq!(next.position.y.fract(), 0.0);
        }
    }

    #[test]
    fn only_timed_say_holds() {
        let params = StageParams::default();
        assert_eq!(
            message_hold_ms(&PlannedStep::Known(ActionId::SayHelloTimed), &params),
            1000
        );
        assert_eq!(message_hold_ms(&PlannedStep::Known(ActionId::SayHello), &params), 0);
        assert_eq!(message_hold_ms(&PlannedStep::Unknown("x".into()), &params), 0);
    }
}
