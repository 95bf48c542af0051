use glam::Vec2;

use crate::api::types::{SoundChannel, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::objects::{Explosion, ExplosionKind, GameObject, Hitbox, ObjectContext};
use crate::renderer::instance::DrawContext;

const TEXTURE: &str = "objects/walker.png";
const ANIMATIONS: &str = "objects/walker";
const BULLET_TEXTURE: &str = "objects/walker_bullet.png";
const SIZE: f32 = 24.0;
const SPEED: f32 = 0.5;
/// Ticks between shots.
const SHOOT_INTERVAL: f32 = 120.0;
/// Ticks standing still while shooting.
const SHOOT_TIME: f32 = 30.0;
/// Horizontal distance at which the character is noticed.
const SHOOT_DISTANCE: f32 = 160.0;
const BULLET_SPEED: f32 = 2.0;
const BULLET_SIZE: f32 = 6.0;
const BULLET_LIFETIME: f32 = 180.0;
const SHOOT_SOUND: SoundCue = SoundCue::new(SoundChannel::Sfx2, "sound/shoot.ogg");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkerState {
    Walk,
    Shoot,
}

/// Patrol enemy: walks back and forth over `range` pixels to the right of
/// its start and shoots when the character is near.
#[derive(Debug, Clone)]
pub struct Walker {
    sprite: Sprite,
    position: Vec2,
    start_x: f32,
    range: f32,
    /// True when facing right.
    direction: bool,
    state: WalkerState,
    timer: f32,
    shoot_timer: f32,
    hitbox: Hitbox,
}

impl Walker {
    pub fn new(assets: &AssetRegistry, position: Vec2, range: f32, direction: bool) -> Self {
        let mut sprite = assets.load_animated_sprite(TEXTURE, Some((SIZE as u32, SIZE as u32)), ANIMATIONS);
        sprite.set_position(position);
        Self {
            sprite,
            position,
            start_x: position.x,
            range: range.max(0.0),
            direction,
            state: WalkerState::Walk,
            timer: 0.0,
            shoot_timer: 0.0,
            hitbox: Hitbox::default(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> bool {
        self.direction
    }

    fn shape(&self) -> Polygon {
        Polygon::rectangle(self.position + Vec2::new(4.0, 4.0), self.position + Vec2::new(20.0, SIZE))
    }

    fn walk(&mut self, ctx: &mut ObjectContext) {
        if self.range > 0.0 {
            let step = SPEED * ctx.elapsed;
            if self.direction {
                self.position.x += step;
                if self.position.x >= self.start_x + self.range {
                    self.position.x = self.start_x + self.range;
                    self.direction = false;
                }
            } else {
                self.position.x -= step;
                if self.position.x <= self.start_x {
                    self.position.x = self.start_x;
                    self.direction = true;
                }
            }
            self.sprite.play("walk");
        } else {
            self.sprite.play("idle");
        }

        self.shoot_timer += ctx.elapsed;
        let character = ctx.character_position();
        if self.shoot_timer >= SHOOT_INTERVAL && (character.x - self.position.x).abs() < SHOOT_DISTANCE {
            self.direction = character.x > self.position.x;
            self.state = WalkerState::Shoot;
            self.timer = 0.0;
            self.shoot(ctx);
        }
    }

    fn shoot(&mut self, ctx: &mut ObjectContext) {
        let (offset_x, speed) = if self.direction {
            (SIZE - 4.0, BULLET_SPEED)
        } else {
            (4.0 - BULLET_SIZE, -BULLET_SPEED)
        };
        let bullet = WalkerBullet::new(
            ctx.assets(),
            self.position + Vec2::new(offset_x, 10.0),
            Vec2::new(speed, 0.0),
        );
        ctx.spawn(bullet);
        ctx.play_sound(SHOOT_SOUND);
        self.sprite.play("shoot");
    }
}

impl GameObject for Walker {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        let hurting = CollisionFlags::EXPLOSION | CollisionFlags::EXPLOSION_FIRST | CollisionFlags::HAMMER;
        if ctx.check_collision(&self.shape()).intersects(hurting) {
            let center = self.position + Vec2::splat(SIZE / 2.0);
            let explosion = Explosion::new(ctx.assets(), center - Vec2::splat(8.0), 0.0, ExplosionKind::Regular);
            ctx.spawn(explosion);
            return false;
        }

        match self.state {
            WalkerState::Walk => self.walk(ctx),
            WalkerState::Shoot => {
                self.timer += ctx.elapsed;
                if self.timer > SHOOT_TIME {
                    self.state = WalkerState::Walk;
                    self.shoot_timer = 0.0;
                }
            }
        }

        self.sprite.set_position(self.position);
        self.sprite.set_flip(!self.direction);
        self.hitbox = Hitbox::new(self.shape(), CollisionFlags::DAMAGE);
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }
}

/// Straight-flying walker projectile. Disappears on terrain or the character.
#[derive(Debug, Clone)]
pub struct WalkerBullet {
    sprite: Sprite,
    position: Vec2,
    velocity: Vec2,
    timer: f32,
    hitbox: Hitbox,
}

impl WalkerBullet {
    pub fn new(assets: &AssetRegistry, position: Vec2, velocity: Vec2) -> Self {
        let mut sprite = assets.load_sprite(BULLET_TEXTURE, None);
        sprite.set_position(position);
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

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

impl GameObject for WalkerBullet {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        self.position += self.velocity * ctx.elapsed;
        self.sprite.set_position(self.position);
        self.timer += ctx.elapsed;

        let shape = Polygon::rectangle(self.position, self.position + Vec2::splat(BULLET_SIZE));
        let flags = ctx.check_collision(&shape);
        if flags.intersects(CollisionFlags::SOLID | CollisionFlags::CHARACTER) || self.timer > BULLET_LIFETIME {
            return false;
        }
        self.hitbox = Hitbox::new(shape, CollisionFlags::DAMAGE);
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.sprite.draw(ctx);
    }

    fn hitboxes(&self) -> &[Hitbox] {
        std::slice::from_ref(&self.hitbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::testing::World;
    use crate::objects::{Object, ObjectSet};

    fn walker_of(set: &ObjectSet) -> Option<&Walker> {
        set.live().find_map(|o| match o {
            Object::Walker(w) => Some(w),
            _ => None,
        })
    }

    #[test]
    fn walker_patrols_within_range() {
        let world = World::new();
        let mut set = ObjectSet::new(1);
        set.spawn_walker(&world.assets, Vec2::new(100.0, 120.0), 20.0, true);
        let mut turned = false;
        for _ in 0..200 {
            set.update(world.links(), 1.0);
            let walker = walker_of(&set).expect("walker alive");
            assert!((100.0..=120.0).contains(&walker.position().x));
            turned |= !walker.direction();
        }
        assert!(turned);
    }

    #[test]
    fn walker_shoots_at_nearby_character() {
        let mut world = World::new();
        world.place_character(Vec2::new(40.0, 112.0));
        let mut set = ObjectSet::new(1);
        set.spawn_walker(&world.assets, Vec2::new(100.0, 120.0), 0.0, true);
        for _ in 0..(SHOOT_INTERVAL as usize + 2) {
            set.update(world.links(), 1.0);
        }
        let bullet = set
            .live()
            .find_map(|o| match o {
                Object::WalkerBullet(b) => Some(b),
                _ => None,
            })
            .expect("bullet fired");
        assert!(bullet.velocity().x < 0.0);
        assert!(!walker_of(&set).expect("walker alive").direction());
        assert!(set.take_sounds().contains(&SHOOT_SOUND));
    }

    #[test]
    fn hammer_destroys_walker() {
        let mut world = World::new();
        let mut set = ObjectSet::new(1);
        set.spawn_walker(&world.assets, Vec2::new(100.0, 120.0), 0.0, true);
        set.update(world.links(), 1.0);
        world.character.hammer = Some(Polygon::rectangle(Vec2::new(96.0, 120.0), Vec2::new(112.0, 136.0)));
        set.update(world.links(), 1.0);
        assert!(walker_of(&set).is_none());
    }
}
