use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stage::{
    AnimationDef, CollideTarget, GroupId, OverlapEvent, OverlapId, SpriteId, Stage, TextId,
};

const DEFAULT_TEXTURE_SIZE: (f32, f32) = (32.0, 32.0);

// Contact within this distance of a surface still counts as touching, so a
// resting body does not flicker between grounded and airborne as gravity
// nudges it in and out of penetration.
const CONTACT_SLOP: f32 = 0.5;

// Rebounds slower than this are treated as rest.
const MIN_REST_VELOCITY: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcadeConfig {
    pub world: WorldBounds,
    pub gravity_y: f32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            world: WorldBounds {
                width: 800.0,
                height: 600.0,
            },
            gravity_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Dynamic,
    Static,
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    base_width: f32,
    base_height: f32,
    scale: f32,
    bounce_x: f32,
    bounce_y: f32,
    collide_world_bounds: bool,
    active: bool,
    visible: bool,
    touching_down: bool,
    animation: Option<String>,
    animation_elapsed: f32,
}

impl Body {
    fn half_width(&self) -> f32 {
        self.base_width * self.scale / 2.0
    }

    fn half_height(&self) -> f32 {
        self.base_height * self.scale / 2.0
    }
}

#[derive(Debug, Clone)]
struct Group {
    kind: BodyKind,
    members: Vec<SpriteId>,
}

#[derive(Debug, Clone)]
struct TextObject {
    x: f32,
    y: f32,
    content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSnapshot {
    pub id: SpriteId,
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub active: bool,
    pub animation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSnapshot {
    pub id: TextId,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub sprites: Vec<SpriteSnapshot>,
    pub texts: Vec<TextSnapshot>,
}

/// Headless arcade-physics stage: axis-aligned bodies, constant downward
/// gravity, dynamic-versus-static separation, and overlap reporting. The
/// coordinate system grows rightward and downward, so gravity is positive
/// and a jump impulse is negative.
#[derive(Debug, Clone, Default)]
pub struct ArcadeStage {
    config: ArcadeConfig,
    textures: HashMap<String, (f32, f32)>,
    bodies: Vec<Body>,
    groups: HashMap<GroupId, Group>,
    next_group_id: u32,
    images: Vec<(f32, f32, String)>,
    animations: HashMap<String, AnimationDef>,
    colliders: Vec<(CollideTarget, CollideTarget)>,
    overlaps: Vec<(OverlapId, CollideTarget, CollideTarget)>,
    texts: Vec<TextObject>,
}

impl ArcadeStage {
    pub fn new(config: ArcadeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> ArcadeConfig {
        self.config
    }

    pub fn sprite_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn position(&self, sprite: SpriteId) -> Option<(f32, f32)> {
        self.body(sprite).map(|b| (b.x, b.y))
    }

    pub fn velocity(&self, sprite: SpriteId) -> Option<(f32, f32)> {
        self.body(sprite).map(|b| (b.velocity_x, b.velocity_y))
    }

    pub fn is_visible(&self, sprite: SpriteId) -> bool {
        self.body(sprite).is_some_and(|b| b.visible)
    }

    pub fn current_animation(&self, sprite: SpriteId) -> Option<&str> {
        self.body(sprite)?.animation.as_deref()
    }

    /// The spritesheet frame the sprite currently shows, derived from the
    /// registered animation timing. `None` when nothing is playing or the
    /// animation key was never registered.
    pub fn animation_frame(&self, sprite: SpriteId) -> Option<u32> {
        let body = self.body(sprite)?;
        let key = body.animation.as_deref()?;
        let def = self.animations.get(key)?;
        if def.frames.is_empty() {
            return None;
        }
        let index = (body.animation_elapsed * def.frame_rate as f32) as usize;
        let frame = if def.looped {
            def.frames[index % def.frames.len()]
        } else {
            def.frames[index.min(def.frames.len() - 1)]
        };
        Some(frame)
    }

    pub fn group_members(&self, group: GroupId) -> &[SpriteId] {
        self.groups
            .get(&group)
            .map(|g| g.members.as_slice())
            .unwrap_or(&[])
    }

    pub fn text_content(&self, text: TextId) -> Option<&str> {
        self.texts.get(text.0 as usize).map(|t| t.content.as_str())
    }

    pub fn text_position(&self, text: TextId) -> Option<(f32, f32)> {
        self.texts.get(text.0 as usize).map(|t| (t.x, t.y))
    }

    /// Teleport helper for tests and editor tooling; velocities are left
    /// untouched.
    pub fn set_position(&mut self, sprite: SpriteId, x: f32, y: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.x = x;
            body.y = y;
        }
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            sprites: self
                .bodies
                .iter()
                .enumerate()
                .map(|(index, body)| SpriteSnapshot {
                    id: SpriteId(index as u32),
                    x: body.x,
                    y: body.y,
                    velocity_x: body.velocity_x,
                    velocity_y: body.velocity_y,
                    active: body.active,
                    animation: body.animation.clone(),
                })
                .collect(),
            texts: self
                .texts
                .iter()
                .enumerate()
                .map(|(index, text)| TextSnapshot {
                    id: TextId(index as u32),
                    content: text.content.clone(),
                })
                .collect(),
        }
    }

    fn body(&self, sprite: SpriteId) -> Option<&Body> {
        self.bodies.get(sprite.0 as usize)
    }

    fn body_mut(&mut self, sprite: SpriteId) -> Option<&mut Body> {
        self.bodies.get_mut(sprite.0 as usize)
    }

    fn texture_size(&self, key: &str) -> (f32, f32) {
        self.textures
            .get(key)
            .copied()
            .unwrap_or(DEFAULT_TEXTURE_SIZE)
    }

    fn spawn_body(&mut self, x: f32, y: f32, key: &str, kind: BodyKind) -> SpriteId {
        let (width, height) = self.texture_size(key);
        let id = SpriteId(self.bodies.len() as u32);
        self.bodies.push(Body {
            kind,
            x,
            y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            base_width: width,
            base_height: height,
            scale: 1.0,
            bounce_x: 0.0,
            bounce_y: 0.0,
            collide_world_bounds: false,
            active: true,
            visible: true,
            touching_down: false,
            animation: None,
            animation_elapsed: 0.0,
        });
        id
    }

    fn expand(&self, target: CollideTarget) -> Vec<SpriteId> {
        match target {
            CollideTarget::Sprite(sprite) => vec![sprite],
            CollideTarget::Group(group) => self.group_members(group).to_vec(),
        }
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity_y;
        for body in &mut self.bodies {
            if body.kind != BodyKind::Dynamic || !body.active {
                continue;
            }
            body.touching_down = false;
            body.velocity_y += gravity * dt;
            body.x += body.velocity_x * dt;
            body.y += body.velocity_y * dt;
            body.animation_elapsed += dt;
        }
    }

    // Only dynamic-versus-static pairs are resolved; the platformer never
    // registers a dynamic-versus-dynamic collider.
    fn resolve_collider_pair(&mut self, a: SpriteId, b: SpriteId) {
        let (dynamic, fixed) = match (self.body(a), self.body(b)) {
            (Some(first), Some(second)) => match (first.kind, second.kind) {
                (BodyKind::Dynamic, BodyKind::Static) => (a, b),
                (BodyKind::Static, BodyKind::Dynamic) => (b, a),
                _ => return,
            },
            _ => return,
        };

        let Some(fixed_body) = self.body(fixed) else {
            return;
        };
        if !fixed_body.active {
            return;
        }
        let (fx, fy) = (fixed_body.x, fixed_body.y);
        let (fhw, fhh) = (fixed_body.half_width(), fixed_body.half_height());

        let Some(body) = self.body_mut(dynamic) else {
            return;
        };
        if !body.active {
            return;
        }

        let dx = body.x - fx;
        let dy = body.y - fy;
        let penetration_x = body.half_width() + fhw - dx.abs();
        let penetration_y = body.half_height() + fhh - dy.abs();

        if penetration_x <= 0.0 || penetration_y <= -CONTACT_SLOP {
            return;
        }

        if penetration_y > 0.0 && penetration_x > 0.0 && penetration_x < penetration_y {
            // Side contact.
            if dx < 0.0 {
                body.x -= penetration_x;
            } else {
                body.x += penetration_x;
            }
            body.velocity_x = -body.velocity_x * body.bounce_x;
            if body.velocity_x.abs() < MIN_REST_VELOCITY {
                body.velocity_x = 0.0;
            }
            return;
        }

        if dy < 0.0 {
            // Resting on, or just above, the fixed body.
            if penetration_y > 0.0 {
                body.y -= penetration_y;
            }
            if body.velocity_y > 0.0 {
                body.velocity_y = -body.velocity_y * body.bounce_y;
                if body.velocity_y.abs() < MIN_REST_VELOCITY {
                    body.velocity_y = 0.0;
                }
            }
            body.touching_down = true;
        } else {
            if penetration_y > 0.0 {
                body.y += penetration_y;
            }
            if body.velocity_y < 0.0 {
                body.velocity_y = -body.velocity_y * body.bounce_y;
                if body.velocity_y.abs() < MIN_REST_VELOCITY {
                    body.velocity_y = 0.0;
                }
            }
        }
    }

    fn clamp_to_world(&mut self) {
        let world = self.config.world;
        for body in &mut self.bodies {
            if body.kind != BodyKind::Dynamic || !body.active || !body.collide_world_bounds {
                continue;
            }
            let half_w = body.half_width();
            let half_h = body.half_height();

            if body.x < half_w {
                body.x = half_w;
                body.velocity_x = -body.velocity_x * body.bounce_x;
            } else if body.x > world.width - half_w {
                body.x = world.width - half_w;
                body.velocity_x = -body.velocity_x * body.bounce_x;
            }

            if body.y < half_h {
                body.y = half_h;
                if body.velocity_y < 0.0 {
                    body.velocity_y = -body.velocity_y * body.bounce_y;
                }
            } else if body.y >= world.height - half_h - CONTACT_SLOP {
                if body.y > world.height - half_h {
                    body.y = world.height - half_h;
                }
                if body.velocity_y > 0.0 {
                    body.velocity_y = -body.velocity_y * body.bounce_y;
                    if body.velocity_y.abs() < MIN_REST_VELOCITY {
                        body.velocity_y = 0.0;
                    }
                }
                body.touching_down = true;
            }
        }
    }

    fn intersects(&self, a: SpriteId, b: SpriteId) -> bool {
        let (Some(first), Some(second)) = (self.body(a), self.body(b)) else {
            return false;
        };
        if !first.active || !second.active {
            return false;
        }
        let dx = (first.x - second.x).abs();
        let dy = (first.y - second.y).abs();
        dx < first.half_width() + second.half_width() && dy < first.half_height() + second.half_height()
    }

    fn collect_overlaps(&self) -> Vec<OverlapEvent> {
        let mut events = Vec::new();
        for &(overlap, target_a, target_b) in &self.overlaps {
            for a in self.expand(target_a) {
                for b in self.expand(target_b) {
                    if a != b && self.intersects(a, b) {
                        events.push(OverlapEvent { overlap, a, b });
                    }
                }
            }
        }
        events
    }
}

impl Stage for ArcadeStage {
    fn load_image(&mut self, key: &str, _path: &str, width: f32, height: f32) {
        self.textures.insert(key.to_string(), (width, height));
    }

    fn load_spritesheet(&mut self, key: &str, _path: &str, frame_width: f32, frame_height: f32) {
        self.textures.insert(key.to_string(), (frame_width, frame_height));
    }

    fn add_image(&mut self, x: f32, y: f32, key: &str) {
        self.images.push((x, y, key.to_string()));
    }

    fn add_sprite(&mut self, x: f32, y: f32, key: &str) -> SpriteId {
        self.spawn_body(x, y, key, BodyKind::Dynamic)
    }

    fn add_static_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        self.groups.insert(
            id,
            Group {
                kind: BodyKind::Static,
                members: Vec::new(),
            },
        );
        id
    }

    fn add_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group_id);
        self.next_group_id += 1;
        self.groups.insert(
            id,
            Group {
                kind: BodyKind::Dynamic,
                members: Vec::new(),
            },
        );
        id
    }

    fn add_group_sprite(&mut self, group: GroupId, x: f32, y: f32, key: &str) -> SpriteId {
        let kind = self
            .groups
            .get(&group)
            .map(|g| g.kind)
            .unwrap_or(BodyKind::Dynamic);
        let sprite = self.spawn_body(x, y, key, kind);
        if let Some(group) = self.groups.get_mut(&group) {
            group.members.push(sprite);
        }
        sprite
    }

    fn set_scale(&mut self, sprite: SpriteId, scale: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.scale = scale;
        }
    }

    fn set_bounce(&mut self, sprite: SpriteId, bounce: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.bounce_x = bounce;
            body.bounce_y = bounce;
        }
    }

    fn set_bounce_y(&mut self, sprite: SpriteId, bounce: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.bounce_y = bounce;
        }
    }

    fn set_collide_world_bounds(&mut self, sprite: SpriteId, enabled: bool) {
        if let Some(body) = self.body_mut(sprite) {
            body.collide_world_bounds = enabled;
        }
    }

    fn set_velocity_x(&mut self, sprite: SpriteId, velocity: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.velocity_x = velocity;
        }
    }

    fn set_velocity_y(&mut self, sprite: SpriteId, velocity: f32) {
        if let Some(body) = self.body_mut(sprite) {
            body.velocity_y = velocity;
        }
    }

    fn is_grounded(&self, sprite: SpriteId) -> bool {
        self.body(sprite).is_some_and(|b| b.touching_down)
    }

    fn is_active(&self, sprite: SpriteId) -> bool {
        self.body(sprite).is_some_and(|b| b.active)
    }

    fn disable_body(&mut self, sprite: SpriteId) {
        if let Some(body) = self.body_mut(sprite) {
            body.active = false;
            body.visible = false;
            body.velocity_x = 0.0;
            body.velocity_y = 0.0;
        }
    }

    fn register_animation(&mut self, def: AnimationDef) {
        self.animations.insert(def.key.clone(), def);
    }

    fn play_animation(&mut self, sprite: SpriteId, key: &str) {
        if let Some(body) = self.body_mut(sprite) {
            // Replaying the current animation keeps its timing.
            if body.animation.as_deref() == Some(key) {
                return;
            }
            body.animation = Some(key.to_string());
            body.animation_elapsed = 0.0;
        }
    }

    fn add_collider(&mut self, a: CollideTarget, b: CollideTarget) {
        self.colliders.push((a, b));
    }

    fn add_overlap(&mut self, a: CollideTarget, b: CollideTarget) -> OverlapId {
        let id = OverlapId(self.overlaps.len() as u32);
        self.overlaps.push((id, a, b));
        id
    }

    fn add_text(&mut self, x: f32, y: f32, content: &str) -> TextId {
        let id = TextId(self.texts.len() as u32);
        self.texts.push(TextObject {
            x,
            y,
            content: content.to_string(),
        });
        id
    }

    fn set_text(&mut self, text: TextId, content: &str) {
        if let Some(text) = self.texts.get_mut(text.0 as usize) {
            text.content = content.to_string();
        }
    }

    fn step(&mut self, dt: Duration) -> Vec<OverlapEvent> {
        self.integrate(dt.as_secs_f32());

        for (target_a, target_b) in self.colliders.clone() {
            for a in self.expand(target_a) {
                for b in self.expand(target_b) {
                    self.resolve_collider_pair(a, b);
                }
            }
        }

        self.clamp_to_world();
        self.collect_overlaps()
    }
}
