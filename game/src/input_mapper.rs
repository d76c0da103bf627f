use serde::{Deserialize, Serialize};

pub const RUN_VELOCITY: f32 = 160.0;
pub const JUMP_VELOCITY: f32 = -330.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnimation {
    Left,
    Turn,
    Right,
}

impl PlayerAnimation {
    pub fn key(self) -> &'static str {
        match self {
            PlayerAnimation::Left => "left",
            PlayerAnimation::Turn => "turn",
            PlayerAnimation::Right => "right",
        }
    }
}

/// Horizontal command for one frame: a velocity and the animation that goes
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub velocity_x: f32,
    pub animation: PlayerAnimation,
}

/// Fixed-priority horizontal dispatch: LEFT, then RIGHT, then STOP. Any
/// other label issues no command, so the player continues under whatever
/// physics already applies.
pub fn horizontal_intent(label: &str) -> Option<MoveIntent> {
    match label {
        "LEFT" => Some(MoveIntent {
            velocity_x: -RUN_VELOCITY,
            animation: PlayerAnimation::Left,
        }),
        "RIGHT" => Some(MoveIntent {
            velocity_x: RUN_VELOCITY,
            animation: PlayerAnimation::Right,
        }),
        "STOP" => Some(MoveIntent {
            velocity_x: 0.0,
            animation: PlayerAnimation::Turn,
        }),
        _ => None,
    }
}

pub fn wants_jump(label: &str) -> bool {
    matches!(label, "UP" | "JUMP")
}

/// The jump check is additive with the horizontal branch and gated on
/// ground contact.
pub fn jump_velocity(label: &str, grounded: bool) -> Option<f32> {
    (wants_jump(label) && grounded).then_some(JUMP_VELOCITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_maps_to_negative_run_velocity_and_left_animation() {
        let intent = horizontal_intent("LEFT").unwrap();
        assert_eq!(intent.velocity_x, -160.0);
        assert_eq!(intent.animation, PlayerAnimation::Left);
    }

    #[test]
    fn right_maps_to_positive_run_velocity_and_right_animation() {
        let intent = horizontal_intent("RIGHT").unwrap();
        assert_eq!(intent.velocity_x, 160.0);
        assert_eq!(intent.animation, PlayerAnimation::Right);
    }

    #[test]
    fn stop_maps_to_zero_velocity_and_turn_animation() {
        let intent = horizontal_intent("STOP").unwrap();
        assert_eq!(intent.velocity_x, 0.0);
        assert_eq!(intent.animation, PlayerAnimation::Turn);
    }

    #[test]
    fn unrecognized_labels_issue_no_horizontal_command() {
        assert_eq!(horizontal_intent("UP"), None);
        assert_eq!(horizontal_intent("WAVE"), None);
        assert_eq!(horizontal_intent("left"), None);
    }

    #[test]
    fn jump_requires_ground_contact() {
        assert_eq!(jump_velocity("UP", true), Some(-330.0));
        assert_eq!(jump_velocity("UP", false), None);
        assert_eq!(jump_velocity("JUMP", true), Some(-330.0));
        assert_eq!(jump_velocity("LEFT", true), None);
    }
}
