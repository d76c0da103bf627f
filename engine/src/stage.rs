use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlapId(pub u32);

/// Either side of a collider or overlap registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollideTarget {
    Sprite(SpriteId),
    Group(GroupId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub key: String,
    pub frames: Vec<u32>,
    pub frame_rate: u32,
    pub looped: bool,
}

/// One sprite pair that intersected during the last physics step, tagged
/// with the overlap registration that produced it. `a` and `b` follow the
/// registration order of the overlap's targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapEvent {
    pub overlap: OverlapId,
    pub a: SpriteId,
    pub b: SpriteId,
}

/// The capability surface a scene programs against. Scenes never touch
/// physics state directly; they issue commands and query the little they
/// need (grounded, active), which keeps every scene testable against the
/// headless arcade implementation.
pub trait Stage {
    fn load_image(&mut self, key: &str, path: &str, width: f32, height: f32);
    fn load_spritesheet(&mut self, key: &str, path: &str, frame_width: f32, frame_height: f32);

    fn add_image(&mut self, x: f32, y: f32, key: &str);
    fn add_sprite(&mut self, x: f32, y: f32, key: &str) -> SpriteId;
    fn add_static_group(&mut self) -> GroupId;
    fn add_group(&mut self) -> GroupId;
    fn add_group_sprite(&mut self, group: GroupId, x: f32, y: f32, key: &str) -> SpriteId;
    fn set_scale(&mut self, sprite: SpriteId, scale: f32);

    fn set_bounce(&mut self, sprite: SpriteId, bounce: f32);
    fn set_bounce_y(&mut self, sprite: SpriteId, bounce: f32);
    fn set_collide_world_bounds(&mut self, sprite: SpriteId, enabled: bool);
    fn set_velocity_x(&mut self, sprite: SpriteId, velocity: f32);
    fn set_velocity_y(&mut self, sprite: SpriteId, velocity: f32);
    fn is_grounded(&self, sprite: SpriteId) -> bool;
    fn is_active(&self, sprite: SpriteId) -> bool;
    fn disable_body(&mut self, sprite: SpriteId);

    fn register_animation(&mut self, def: AnimationDef);
    fn play_animation(&mut self, sprite: SpriteId, key: &str);

    fn add_collider(&mut self, a: CollideTarget, b: CollideTarget);
    fn add_overlap(&mut self, a: CollideTarget, b: CollideTarget) -> OverlapId;

    fn add_text(&mut self, x: f32, y: f32, content: &str) -> TextId;
    fn set_text(&mut self, text: TextId, content: &str);

    /// Advance the simulation by one frame and report every overlap pair
    /// that intersected after movement and collision resolution.
    fn step(&mut self, dt: Duration) -> Vec<OverlapEvent>;
}
