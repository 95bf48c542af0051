//! Game objects: every dynamic entity of a level, owned by the [`ObjectSet`].
//!
//! The roster is closed: [`Object`] is an enum over the concrete variants and
//! forwards the [`GameObject`] capabilities to them without dynamic dispatch.
//! Objects never mutate collaborators directly; side effects (spawns, sounds,
//! camera commands) are requested through the [`ObjectContext`].

pub mod bomb;
pub mod breakable_block;
pub mod explosion;
pub mod mecha_golem;
pub mod mecha_golem_bomb;
pub mod particle;
pub mod pawn;
pub mod ring;
pub mod set;
#[cfg(test)]
mod testing;
pub mod walker;

use crate::components::layer::DrawPriority;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::renderer::instance::DrawContext;

pub use bomb::{Bomb, BombMode};
pub use breakable_block::BreakableBlock;
pub use explosion::{Explosion, ExplosionKind};
pub use mecha_golem::{GolemState, MechaGolem};
pub use mecha_golem_bomb::MechaGolemBomb;
pub use particle::Particle;
pub use ring::Ring;
pub use set::{Links, ObjectContext, ObjectSet, Requests};
pub use walker::{Walker, WalkerBullet};

/// A collision shape tagged with the bits it reports to overlapping queries.
#[derive(Debug, Clone, Default)]
pub struct Hitbox {
    pub shape: Polygon,
    pub flags: CollisionFlags,
}

impl Hitbox {
    pub fn new(shape: Polygon, flags: CollisionFlags) -> Self {
        Self { shape, flags }
    }

    pub fn rectangle(top_left: glam::Vec2, bottom_right: glam::Vec2, flags: CollisionFlags) -> Self {
        Self::new(Polygon::rectangle(top_left, bottom_right), flags)
    }
}

/// Per-frame contract of every object.
pub trait GameObject {
    /// Advance one frame. Returning `false` retires the object: it is no
    /// longer updated or drawn, but stays visible to collision queries until
    /// the next frame starts.
    fn update(&mut self, ctx: &mut ObjectContext) -> bool;

    fn draw(&mut self, ctx: &mut DrawContext);

    /// Current collision shapes, in world space.
    fn hitboxes(&self) -> &[Hitbox];

    fn draw_priority(&self) -> DrawPriority {
        DrawPriority::Behind
    }

    /// Bits of every hitbox overlapping `query`.
    fn collision(&self, query: &Polygon) -> CollisionFlags {
        self.hitboxes()
            .iter()
            .filter(|hitbox| hitbox.shape.intersects(query))
            .fold(CollisionFlags::NONE, |flags, hitbox| flags | hitbox.flags)
    }
}

/// Every object variant a level can contain.
#[derive(Debug, Clone)]
pub enum Object {
    Explosion(Explosion),
    Bomb(Bomb),
    BreakableBlock(BreakableBlock),
    Ring(Ring),
    Walker(Walker),
    WalkerBullet(WalkerBullet),
    Particle(Particle),
    MechaGolem(Box<MechaGolem>),
    MechaGolemBomb(MechaGolemBomb),
}

macro_rules! dispatch {
    ($object:expr, $inner:ident => $body:expr) => {
        match $object {
            Object::Explosion($inner) => $body,
            Object::Bomb($inner) => $body,
            Object::BreakableBlock($inner) => $body,
            Object::Ring($inner) => $body,
            Object::Walker($inner) => $body,
            Object::WalkerBullet($inner) => $body,
            Object::Particle($inner) => $body,
            Object::MechaGolem($inner) => $body,
            Object::MechaGolemBomb($inner) => $body,
        }
    };
}

impl GameObject for Object {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        dispatch!(self, object => object.update(ctx))
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        dispatch!(self, object => object.draw(ctx))
    }

    fn hitboxes(&self) -> &[Hitbox] {
        dispatch!(self, object => object.hitboxes())
    }

    fn draw_priority(&self) -> DrawPriority {
        dispatch!(self, object => object.draw_priority())
    }
}

impl Object {
    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Explosion(_) => "explosion",
            Object::Bomb(_) => "bomb",
            Object::BreakableBlock(_) => "breakable_block",
            Object::Ring(_) => "ring",
            Object::Walker(_) => "walker",
            Object::WalkerBullet(_) => "walker_bullet",
            Object::Particle(_) => "particle",
            Object::MechaGolem(_) => "mecha_golem",
            Object::MechaGolemBomb(_) => "mecha_golem_bomb",
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Object {
                fn from(object: $variant) -> Self {
                    Object::$variant(object)
                }
            }
        )*
    };
}

impl_from!(
    Explosion,
    Bomb,
    BreakableBlock,
    Ring,
    Walker,
    WalkerBullet,
    Particle,
    MechaGolemBomb,
);

impl From<MechaGolem> for Object {
    fn from(golem: MechaGolem) -> Self {
        Object::MechaGolem(Box::new(golem))
    }
}
