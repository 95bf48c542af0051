use glam::Vec2;

use crate::assets::registry::AssetRegistry;
use crate::components::layer::DrawPriority;
use crate::components::sprite::Sprite;
use crate::objects::{GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

/// Ticks a particle lives.
const LIFETIME: f32 = 60.0;

/// Cosmetic debris: constant acceleration, no collision.
#[derive(Debug, Clone)]
pub struct Particle {
    sprite: Sprite,
    position: Vec2,
    velocity: Vec2,
    delta: Vec2,
    timer: f32,
}

impl Particle {
    /// Gravity used for block debris.
    pub const DEBRIS_DELTA: Vec2 = Vec2::new(0.0, 0.25);

    pub fn new(assets: &AssetRegistry, path: &str, position: Vec2, velocity: Vec2, delta: Vec2) -> Self {
        let mut sprite = assets.load_sprite(path, None);
        sprite.set_position(position);
        Self {
            sprite,
            position,
            velocity,
            delta,
            timer: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl GameObject for Particle {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        self.velocity += self.delta * ctx.elapsed;
        self.position += self.velocity * ctx.elapsed;
        self.sprite.set_position(self.position);
        self.timer += ctx.elapsed;
        self.timer <= LIFETIME
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        &[]
    }

    fn draw_priority(&self) -> DrawPriority {
        DrawPriority::Front
    }
}
