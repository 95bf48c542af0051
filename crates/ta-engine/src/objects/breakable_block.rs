use glam::Vec2;

use crate::api::types::{SoundChannel, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::objects::{GameObject, Hitbox, ObjectContext, Particle, Ring};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/breakable_block.png";
const PARTICLE_TEXTURE: &str = "objects/breakable_block_particle.png";
const SIZE: f32 = 16.0;
const BREAK_SOUND: SoundCue = SoundCue::new(SoundChannel::Sfx2, "sound/break.ogg");
const RING_VELOCITY: Vec2 = Vec2::new(0.0, -2.0);

/// Offset inside the block and launch velocity of each debris piece.
const DEBRIS: [(Vec2, Vec2); 4] = [
    (Vec2::new(0.0, 0.0), Vec2::new(-1.0, -3.0)),
    (Vec2::new(8.0, 0.0), Vec2::new(1.0, -3.0)),
    (Vec2::new(0.0, 8.0), Vec2::new(-0.5, -2.0)),
    (Vec2::new(8.0, 8.0), Vec2::new(0.5, -2.0)),
];

/// Solid block that shatters when hit by an explosion or the hammer.
#[derive(Debug, Clone)]
pub struct BreakableBlock {
    sprite: Sprite,
    position: Vec2,
    drops_ring: bool,
    hitbox: Hitbox,
}

impl BreakableBlock {
    pub fn new(assets: &AssetRegistry, position: Vec2, drops_ring: bool) -> Self {
        let mut sprite = assets.load_sprite(TEXTURE, None);
        sprite.set_position(position);
        Self {
            sprite,
            position,
            drops_ring,
            hitbox: Hitbox::rectangle(position, position + Vec2::splat(SIZE), CollisionFlags::SOLID),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    fn shatter(&self, ctx: &mut ObjectContext) {
        let assets = ctx.assets();
        for (offset, velocity) in DEBRIS {
            ctx.spawn(Particle::new(
                assets,
                PARTICLE_TEXTURE,
                self.position + offset,
                velocity,
                Particle::DEBRIS_DELTA,
            ));
        }
        if self.drops_ring {
            let center = self.position + Vec2::splat(SIZE / 2.0);
            ctx.spawn(Ring::new(assets, center - Vec2::splat(4.0), RING_VELOCITY));
        }
        ctx.play_sound(BREAK_SOUND);
    }
}

impl GameObject for BreakableBlock {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        let breaking = CollisionFlags::EXPLOSION | CollisionFlags::EXPLOSION_FIRST | CollisionFlags::HAMMER;
        if ctx.check_collision(&self.hitbox.shape).intersects(breaking) {
            self.shatter(ctx);
            return false;
        }
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }
}
