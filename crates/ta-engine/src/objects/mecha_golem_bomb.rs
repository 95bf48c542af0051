use glam::Vec2;

use crate::api::types::CameraCommand;
use crate::assets::registry::AssetRegistry;
use crate::components::layer::DrawPriority;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::objects::pawn::{move_and_collide, Contact};
use crate::objects::{Explosion, ExplosionKind, GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/mecha_golem/bomb.png";
const SIZE: f32 = 16.0;
const GRAVITY: f32 = 0.125;
const EXPLOSION_SHAKE: f32 = 12.0;

/// Bomb shaken loose from the ceiling by the boss's bite attack. Falls
/// straight down and explodes on the ground.
#[derive(Debug, Clone)]
pub struct MechaGolemBomb {
    sprite: Sprite,
    position: Vec2,
    velocity: Vec2,
    hitbox: Hitbox,
}

impl MechaGolemBomb {
    pub fn new(assets: &AssetRegistry, position: Vec2) -> Self {
        let mut sprite = assets.load_sprite(TEXTURE, None);
        sprite.set_position(position);
        Self {
            sprite,
            position,
            velocity: Vec2::ZERO,
            hitbox: Hitbox::default(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

impl GameObject for MechaGolemBomb {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        self.velocity.y += GRAVITY * ctx.elapsed;
        let contact = move_and_collide(
            &mut self.position,
            Vec2::ZERO,
            Vec2::splat(SIZE),
            self.velocity * ctx.elapsed,
            |hitbox| {
                ctx.links
                    .tilemap
                    .check_collision_default(hitbox, None)
                    .contains(CollisionFlags::SOLID)
                    && hitbox.bounds().is_some_and(|(min, _)| min.y >= 0.0)
            },
        );
        self.sprite.set_position(self.position);

        if contact.contains(Contact::GROUND) {
            let explosion = Explosion::new(ctx.assets(), self.position, 0.0, ExplosionKind::Regular);
            ctx.spawn(explosion);
            ctx.camera_command(CameraCommand::Shake(EXPLOSION_SHAKE));
            return false;
        }

        self.hitbox = Hitbox::rectangle(self.position, self.position + Vec2::splat(SIZE), CollisionFlags::DAMAGE);
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
