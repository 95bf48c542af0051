use glam::Vec2;

use crate::assets::registry::AssetRegistry;
use crate::components::layer::DrawPriority;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::objects::pawn::move_and_collide;
use crate::objects::{Explosion, ExplosionKind, GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/bomb.png";
const SIZE: f32 = 8.0;
const GRAVITY: f32 = 0.125;
const THROW_VELOCITY: Vec2 = Vec2::new(1.5, -2.0);
/// Ticks before a bomb goes off on its own.
const FUSE: f32 = 300.0;

/// How the character released the bomb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombMode {
    Throw,
    Drop,
}

/// Player bomb: falls under gravity and explodes on contact with terrain or
/// a damaging object.
#[derive(Debug, Clone)]
pub struct Bomb {
    sprite: Sprite,
    position: Vec2,
    velocity: Vec2,
    timer: f32,
    hitbox: Hitbox,
}

impl Bomb {
    /// `direction` is true when facing right.
    pub fn new(assets: &AssetRegistry, position: Vec2, direction: bool, mode: BombMode) -> Self {
        let velocity = match mode {
            BombMode::Throw => Vec2::new(
                if direction { THROW_VELOCITY.x } else { -THROW_VELOCITY.x },
                THROW_VELOCITY.y,
            ),
            BombMode::Drop => Vec2::ZERO,
        };
        let mut sprite = assets.load_sprite(TEXTURE, None);
        sprite.set_position(position);
        sprite.set_flip(!direction);
        Self {
            sprite,
            position,
            velocity,
            timer: 0.0,
            hitbox: Hitbox::default(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    fn shape(&self) -> Polygon {
        Polygon::rectangle(self.position, self.position + Vec2::splat(SIZE))
    }
}

impl GameObject for Bomb {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        self.velocity.y += GRAVITY * ctx.elapsed;
        let blocking = CollisionFlags::SOLID | CollisionFlags::DAMAGE;
        let contact = move_and_collide(
            &mut self.position,
            Vec2::ZERO,
            Vec2::splat(SIZE),
            self.velocity * ctx.elapsed,
            |hitbox| ctx.check_collision(hitbox).intersects(blocking),
        );
        self.sprite.set_position(self.position);
        self.timer += ctx.elapsed;

        let touching = ctx.check_collision(&self.shape()).intersects(CollisionFlags::DAMAGE);
        if !contact.is_empty() || touching || self.timer > FUSE {
            let center = self.position + Vec2::splat(SIZE / 2.0);
            let explosion = Explosion::new(ctx.assets(), center - Vec2::splat(8.0), 0.0, ExplosionKind::First);
            ctx.spawn(explosion);
            return false;
        }

        self.hitbox = Hitbox::new(self.shape(), CollisionFlags::NONE);
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }

    fn draw_priority(&self) -> DrawPriority {
        DrawPriority::Front
    }
}
