use glam::Vec2;

use crate::api::types::{SoundChannel, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::animation::Animation;
use crate::components::layer::DrawPriority;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::objects::{GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/explosion.png";
const SIZE: f32 = 16.0;
const FRAMES: u32 = 6;
const FRAME_DELAY: u32 = 3;
pub const SOUND: SoundCue = SoundCue::new(SoundChannel::Sfx2, "sound/explosion.ogg");

/// What an explosion damages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Primary blast of a player bomb; the only kind that hurts bosses.
    First,
    /// Secondary blast (enemies, debris chains).
    Regular,
    /// Cosmetic.
    Neutral,
}

/// Timed blast. Invisible and harmless until its delay elapses, then plays
/// once and retires.
#[derive(Debug, Clone)]
pub struct Explosion {
    sprite: Sprite,
    position: Vec2,
    delay: f32,
    timer: f32,
    kind: ExplosionKind,
    hitbox: Hitbox,
}

impl Explosion {
    pub fn new(assets: &AssetRegistry, position: Vec2, delay: f32, kind: ExplosionKind) -> Self {
        let mut sprite = assets.load_sprite(TEXTURE, Some((SIZE as u32, SIZE as u32)));
        sprite.set_animation(Animation::range(0, FRAMES - 1, FRAME_DELAY, 1));
        sprite.set_position(position);
        Self {
            sprite,
            position,
            delay: delay.max(0.0),
            timer: 0.0,
            kind,
            hitbox: Hitbox::default(),
        }
    }

    pub fn kind(&self) -> ExplosionKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.timer >= self.delay
    }

    fn flags(&self) -> CollisionFlags {
        if !self.is_active() {
            return CollisionFlags::NONE;
        }
        match self.kind {
            ExplosionKind::First => CollisionFlags::EXPLOSION_FIRST | CollisionFlags::EXPLOSION,
            ExplosionKind::Regular => CollisionFlags::EXPLOSION,
            ExplosionKind::Neutral => CollisionFlags::NONE,
        }
    }

    fn lifetime() -> f32 {
        (FRAMES * FRAME_DELAY) as f32
    }
}

impl GameObject for Explosion {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        let was_active = self.is_active();
        self.timer += ctx.elapsed;
        if self.is_active() && !was_active && self.kind != ExplosionKind::Neutral {
            ctx.play_sound(SOUND);
        }
        if self.timer - self.delay > Self::lifetime() {
            return false;
        }
        self.hitbox = Hitbox::rectangle(self.position, self.position + Vec2::splat(SIZE), self.flags());
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        if self.is_active() {
            self.sprite.draw(ctx);
        }
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }

    fn draw_priority(&self) -> DrawPriority {
        DrawPriority::Front
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::testing::World;
    use crate::objects::{Object, ObjectSet};

    fn query_box() -> crate::core::geometry::Polygon {
        crate::core::geometry::Polygon::rectangle(Vec2::new(22.0, 22.0), Vec2::new(26.0, 26.0))
    }

    #[test]
    fn delayed_explosion_is_harmless_until_active() {
        let world = World::new();
        let mut set = ObjectSet::new(1);
        set.spawn_explosion(&world.assets, Vec2::new(16.0, 16.0), 5.0, ExplosionKind::First);
        set.update(world.links(), 1.0);
        assert!(set.check_collision(&world.links(), &query_box()).is_empty());

        for _ in 0..4 {
            set.update(world.links(), 1.0);
        }
        let flags = set.check_collision(&world.links(), &query_box());
        assert!(flags.contains(CollisionFlags::EXPLOSION_FIRST | CollisionFlags::EXPLOSION));
        assert_eq!(set.take_sounds(), vec![SOUND]);
    }

    #[test]
    fn neutral_explosion_never_collides_and_retires() {
        let world = World::new();
        let mut set = ObjectSet::new(1);
        let id = set.spawn_explosion(&world.assets, Vec2::new(16.0, 16.0), 0.0, ExplosionKind::Neutral);
        set.update(world.links(), 1.0);
        assert!(set.check_collision(&world.links(), &query_box()).is_empty());
        assert!(matches!(set.get(id), Some(Object::Explosion(e)) if e.is_active()));
        for _ in 0..30 {
            set.update(world.links(), 1.0);
        }
        assert!(set.get(id).is_none());
        assert!(set.take_sounds().is_empty());
    }
}
