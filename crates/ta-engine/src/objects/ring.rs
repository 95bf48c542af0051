use glam::Vec2;

use crate::api::types::{SoundChannel, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::objects::pawn::{move_and_collide, Contact};
use crate::objects::{GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/ring.png";
const ANIMATIONS: &str = "objects/ring";
const SIZE: f32 = 8.0;
const GRAVITY: f32 = 0.125;
const SLOWDOWN: f32 = 0.75;
/// Ticks before a dropped ring disappears.
const MAX_TIME: f32 = 300.0;
const COLLECT_SOUND: SoundCue = SoundCue::new(SoundChannel::Sfx1, "sound/ring.ogg");

/// Bouncing pickup. Collected when it touches the character.
#[derive(Debug, Clone)]
pub struct Ring {
    sprite: Sprite,
    position: Vec2,
    velocity: Vec2,
    timer: f32,
    expires: bool,
    hitbox: Hitbox,
}

impl Ring {
    pub fn new(assets: &AssetRegistry, position: Vec2, velocity: Vec2) -> Self {
        let mut sprite = assets.load_animated_sprite(TEXTURE, Some((SIZE as u32, SIZE as u32)), ANIMATIONS);
        sprite.play("ring");
        sprite.set_position(position);
        Self {
            sprite,
            position,
            velocity,
            timer: 0.0,
            expires: true,
            hitbox: Hitbox::default(),
        }
    }

    /// Rings placed in the level stay forever.
    pub fn with_expiry(mut self, expires: bool) -> Self {
        self.expires = expires;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl GameObject for Ring {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        self.velocity.y += GRAVITY * ctx.elapsed;
        let blocking = CollisionFlags::SOLID | CollisionFlags::HALF_SOLID | CollisionFlags::PUSHABLE;
        let contact = move_and_collide(
            &mut self.position,
            Vec2::ZERO,
            Vec2::splat(SIZE),
            self.velocity * ctx.elapsed,
            |hitbox| ctx.check_collision(hitbox).intersects(blocking),
        );
        self.sprite.set_position(self.position);

        if contact.contains(Contact::GROUND) && self.velocity.y > 0.0 {
            self.velocity.y *= -SLOWDOWN;
            if self.velocity.y > -0.5 {
                self.velocity.y = 0.0;
            }
        }
        if contact.contains(Contact::CEILING) && self.velocity.y < 0.0 {
            self.velocity.y = -self.velocity.y;
        }

        let shape = Polygon::rectangle(self.position, self.position + Vec2::splat(SIZE - 1.0));
        if ctx.check_collision(&shape).contains(CollisionFlags::CHARACTER) {
            ctx.play_sound(COLLECT_SOUND);
            return false;
        }
        self.hitbox = Hitbox::new(shape, CollisionFlags::NONE);

        self.timer += ctx.elapsed;
        !(self.expires && self.timer > MAX_TIME)
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }
}
