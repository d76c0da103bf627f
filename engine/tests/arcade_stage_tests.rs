use std::time::Duration;

use engine::arcade::{ArcadeConfig, ArcadeStage, WorldBounds};
use engine::stage::{AnimationDef, CollideTarget, Stage};

const FRAME: Duration = Duration::from_millis(16);

fn stage_with_gravity(gravity_y: f32) -> ArcadeStage {
    ArcadeStage::new(ArcadeConfig {
        world: WorldBounds {
            width: 700.0,
            height: 600.0,
        },
        gravity_y,
    })
}

fn add_ground(stage: &mut ArcadeStage) {
    stage.load_image("ground", "assets/platform.png", 400.0, 32.0);
    let platforms = stage.add_static_group();
    let ground = stage.add_group_sprite(platforms, 400.0, 568.0, "ground");
    stage.set_scale(ground, 2.0);
}

#[test]
fn falling_body_lands_on_platform_and_stays_grounded() {
    let mut stage = stage_with_gravity(300.0);
    add_ground(&mut stage);
    stage.load_spritesheet("dude", "assets/dude.png", 32.0, 48.0);
    let dude = stage.add_sprite(400.0, 450.0, "dude");

    let platforms = CollideTarget::Group(engine::stage::GroupId(0));
    stage.add_collider(CollideTarget::Sprite(dude), platforms);

    for _ in 0..200 {
        stage.step(FRAME);
    }

    assert!(stage.is_grounded(dude));
    let (_, y) = stage.position(dude).unwrap();
    // Platform top is at 536, the body is 48 tall.
    assert!((y - 512.0).abs() < 1.0, "resting y was {y}");
    assert_eq!(stage.velocity(dude).unwrap().1, 0.0);

    // Contact must survive a zero-length step.
    stage.step(Duration::ZERO);
    assert!(stage.is_grounded(dude));
}

#[test]
fn bouncy_body_rebounds_off_the_platform() {
    let mut stage = stage_with_gravity(300.0);
    add_ground(&mut stage);
    let ball = stage.add_sprite(400.0, 100.0, "ball");
    stage.set_bounce(ball, 0.5);
    stage.add_collider(
        CollideTarget::Sprite(ball),
        CollideTarget::Group(engine::stage::GroupId(0)),
    );

    let mut bounced = false;
    for _ in 0..400 {
        stage.step(FRAME);
        if stage.velocity(ball).unwrap().1 < -10.0 {
            bounced = true;
            break;
        }
    }
    assert!(bounced, "ball never rebounded upward");
}

#[test]
fn world_bounds_stop_a_falling_body() {
    let mut stage = stage_with_gravity(300.0);
    let dude = stage.add_sprite(100.0, 100.0, "dude");
    stage.set_collide_world_bounds(dude, true);

    for _ in 0..400 {
        stage.step(FRAME);
    }

    assert!(stage.is_grounded(dude));
    // Default texture is 32x32; the floor is at 600.
    assert_eq!(stage.position(dude).unwrap().1, 584.0);
}

#[test]
fn side_contact_stops_horizontal_motion() {
    let mut stage = stage_with_gravity(0.0);
    stage.load_image("wall", "assets/wall.png", 32.0, 96.0);
    let walls = stage.add_static_group();
    stage.add_group_sprite(walls, 300.0, 100.0, "wall");
    let runner = stage.add_sprite(250.0, 100.0, "runner");
    stage.set_velocity_x(runner, 160.0);
    stage.add_collider(CollideTarget::Sprite(runner), CollideTarget::Group(walls));

    for _ in 0..60 {
        stage.step(FRAME);
    }

    let (x, _) = stage.position(runner).unwrap();
    assert!((x - 268.0).abs() < 1.0, "stopped at x {x}");
    assert_eq!(stage.velocity(runner).unwrap().0, 0.0);
}

#[test]
fn overlap_reports_each_frame_until_a_body_is_disabled() {
    let mut stage = stage_with_gravity(0.0);
    let a = stage.add_sprite(100.0, 100.0, "a");
    let b = stage.add_sprite(110.0, 100.0, "b");
    let overlap = stage.add_overlap(CollideTarget::Sprite(a), CollideTarget::Sprite(b));

    let events = stage.step(FRAME);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].overlap, overlap);
    assert_eq!(events[0].a, a);
    assert_eq!(events[0].b, b);

    assert_eq!(stage.step(FRAME).len(), 1);

    stage.disable_body(b);
    assert!(!stage.is_active(b));
    assert!(!stage.is_visible(b));
    assert!(stage.step(FRAME).is_empty());
}

#[test]
fn animation_playback_keeps_timing_when_replayed() {
    let mut stage = stage_with_gravity(0.0);
    let dude = stage.add_sprite(100.0, 100.0, "dude");
    stage.register_animation(AnimationDef {
        key: "walk".to_string(),
        frames: vec![0, 1, 2, 3],
        frame_rate: 10,
        looped: true,
    });

    stage.play_animation(dude, "walk");
    assert_eq!(stage.animation_frame(dude), Some(0));

    for _ in 0..16 {
        stage.step(FRAME);
    }
    // ~0.256s at 10 fps puts the loop on frame 2.
    assert_eq!(stage.animation_frame(dude), Some(2));

    stage.play_animation(dude, "walk");
    assert_eq!(stage.animation_frame(dude), Some(2));
    assert_eq!(stage.current_animation(dude), Some("walk"));
}

#[test]
fn one_shot_animation_holds_its_last_frame() {
    let mut stage = stage_with_gravity(0.0);
    let dude = stage.add_sprite(100.0, 100.0, "dude");
    stage.register_animation(AnimationDef {
        key: "turn".to_string(),
        frames: vec![4],
        frame_rate: 20,
        looped: false,
    });

    stage.play_animation(dude, "turn");
    for _ in 0..60 {
        stage.step(FRAME);
    }
    assert_eq!(stage.animation_frame(dude), Some(4));
}

#[test]
fn text_objects_update_in_place() {
    let mut stage = stage_with_gravity(0.0);
    let text = stage.add_text(16.0, 16.0, "score: 0");
    assert_eq!(stage.text_content(text), Some("score: 0"));
    assert_eq!(stage.text_position(text), Some((16.0, 16.0)));

    stage.set_text(text, "score: 10");
    assert_eq!(stage.text_content(text), Some("score: 10"));
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut stage = stage_with_gravity(300.0);
    let dude = stage.add_sprite(100.0, 100.0, "dude");
    stage.set_velocity_x(dude, -160.0);
    stage.add_text(16.0, 16.0, "score: 0");
    stage.step(FRAME);

    let snapshot = stage.snapshot();
    let json = serde_json::to_string(&snapshot).expect("serialize stage snapshot");
    let restored: engine::arcade::StageSnapshot =
        serde_json::from_str(&json).expect("deserialize stage snapshot");
    assert_eq!(restored, snapshot);
}
