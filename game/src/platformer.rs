use engine::Scene;
use engine::stage::{
    AnimationDef, CollideTarget, GroupId, OverlapEvent, OverlapId, SpriteId, Stage, TextId,
};
use serde::{Deserialize, Serialize};

use crate::gesture::GestureCell;
use crate::input_mapper::{horizontal_intent, jump_velocity};
use crate::score::{STAR_VALUE, ScoreBoard};

pub const WORLD_WIDTH: f32 = 700.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const GRAVITY_Y: f32 = 300.0;

const GROUND: (f32, f32) = (400.0, 568.0);
const GROUND_SCALE: f32 = 2.0;
const LEDGES: [(f32, f32); 3] = [(600.0, 400.0), (50.0, 250.0), (750.0, 220.0)];
const SCORE_TEXT_POS: (f32, f32) = (16.0, 16.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub gravity_y: f32,
    pub player_spawn: (f32, f32),
    pub player_bounce: f32,
    pub star_count: u32,
    pub star_start_x: f32,
    pub star_step_x: f32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity_y: GRAVITY_Y,
            player_spawn: (100.0, 450.0),
            player_bounce: 0.2,
            star_count: 12,
            star_start_x: 12.0,
            star_step_x: 70.0,
            seed: 0,
        }
    }
}

/// The side-scroller: platforms, a player driven by the shared gesture
/// cell, and a row of collectible stars.
pub struct PlatformerScene {
    config: WorldConfig,
    gesture: GestureCell,
    score: ScoreBoard,
    player: Option<SpriteId>,
    platforms: Option<GroupId>,
    stars: Option<GroupId>,
    score_text: Option<TextId>,
    star_overlap: Option<OverlapId>,
}

impl PlatformerScene {
    pub fn new(config: WorldConfig, gesture: GestureCell) -> Self {
        Self {
            config,
            gesture,
            score: ScoreBoard::new(),
            player: None,
            platforms: None,
            stars: None,
            score_text: None,
            star_overlap: None,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn player(&self) -> Option<SpriteId> {
        self.player
    }

    pub fn stars(&self) -> Option<GroupId> {
        self.stars
    }

    pub fn score_text(&self) -> Option<TextId> {
        self.score_text
    }

    fn collect_star(&mut self, stage: &mut dyn Stage, star: SpriteId) {
        if !stage.is_active(star) {
            return;
        }
        stage.disable_body(star);
        self.score.add(STAR_VALUE);
        if let Some(text) = self.score_text {
            stage.set_text(text, &self.score.display());
        }
    }
}

impl Scene for PlatformerScene {
    fn preload(&mut self, stage: &mut dyn Stage) {
        stage.load_image("sky", "assets/sky.png", 800.0, 600.0);
        stage.load_image("ground", "assets/platform.png", 400.0, 32.0);
        stage.load_image("star", "assets/star.png", 24.0, 22.0);
        stage.load_image("bomb", "assets/bomb.png", 14.0, 14.0);
        stage.load_spritesheet("dude", "assets/dude.png", 32.0, 48.0);
    }

    fn create(&mut self, stage: &mut dyn Stage) {
        stage.add_image(400.0, 300.0, "sky");

        let platforms = stage.add_static_group();
        let ground = stage.add_group_sprite(platforms, GROUND.0, GROUND.1, "ground");
        stage.set_scale(ground, GROUND_SCALE);
        for (x, y) in LEDGES {
            stage.add_group_sprite(platforms, x, y, "ground");
        }

        let player = stage.add_sprite(self.config.player_spawn.0, self.config.player_spawn.1, "dude");
        stage.set_bounce(player, self.config.player_bounce);
        stage.set_collide_world_bounds(player, true);

        stage.register_animation(AnimationDef {
            key: "left".to_string(),
            frames: (0..=3).collect(),
            frame_rate: 10,
            looped: true,
        });
        stage.register_animation(AnimationDef {
            key: "turn".to_string(),
            frames: vec![4],
            frame_rate: 20,
            looped: false,
        });
        stage.register_animation(AnimationDef {
            key: "right".to_string(),
            frames: (5..=8).collect(),
            frame_rate: 10,
            looped: true,
        });

        let stars = stage.add_group();
        let mut rng = Rng::new(self.config.seed);
        for index in 0..self.config.star_count {
            let x = self.config.star_start_x + index as f32 * self.config.star_step_x;
            let star = stage.add_group_sprite(stars, x, 0.0, "star");
            stage.set_bounce_y(star, rng.float_between(0.3, 0.4));
        }

        stage.add_collider(CollideTarget::Sprite(player), CollideTarget::Group(platforms));
        stage.add_collider(CollideTarget::Group(stars), CollideTarget::Group(platforms));
        let star_overlap =
            stage.add_overlap(CollideTarget::Sprite(player), CollideTarget::Group(stars));

        let score_text = stage.add_text(SCORE_TEXT_POS.0, SCORE_TEXT_POS.1, &self.score.display());

        self.player = Some(player);
        self.platforms = Some(platforms);
        self.stars = Some(stars);
        self.score_text = Some(score_text);
        self.star_overlap = Some(star_overlap);
    }

    fn update(&mut self, stage: &mut dyn Stage) {
        let Some(player) = self.player else {
            return;
        };
        let Some(label) = self.gesture.current() else {
            return;
        };

        if let Some(intent) = horizontal_intent(&label) {
            stage.set_velocity_x(player, intent.velocity_x);
            stage.play_animation(player, intent.animation.key());
        }
        if let Some(velocity) = jump_velocity(&label, stage.is_grounded(player)) {
            stage.set_velocity_y(player, velocity);
        }
    }

    fn on_overlap(&mut self, stage: &mut dyn Stage, event: OverlapEvent) {
        if self.star_overlap == Some(event.overlap) {
            self.collect_star(stage, event.b);
        }
    }
}

#[derive(Debug, Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }

    fn float_between(&mut self, low: f32, high: f32) -> f32 {
        let t = (self.next_u32() % 1001) as f32 / 1000.0;
        low + (high - low) * t
    }
}
