//! Axis-separated movement against a "blocked" predicate, shared by the
//! gravity-driven objects.

use std::ops::BitOr;

use glam::Vec2;

use crate::core::geometry::Polygon;

/// Number of halvings used to find the largest free step.
const BISECT_STEPS: u32 = 10;

/// Sides that touched something during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact(u8);

impl Contact {
    pub const NONE: Self = Self(0);
    pub const GROUND: Self = Self(1 << 0);
    pub const CEILING: Self = Self(1 << 1);
    pub const WALL: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Contact {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Move a box (`top_left`..`bottom_right`, relative to `position`) by
/// `velocity`, horizontal axis first. On each axis the full step is taken if
/// free, otherwise the largest free fraction of it.
pub fn move_and_collide(
    position: &mut Vec2,
    top_left: Vec2,
    bottom_right: Vec2,
    velocity: Vec2,
    blocked: impl Fn(&Polygon) -> bool,
) -> Contact {
    let mut contact = Contact::NONE;

    let (dx, hit_x) = step(*position, top_left, bottom_right, Vec2::new(velocity.x, 0.0), &blocked);
    *position += dx;
    if hit_x {
        contact = contact | Contact::WALL;
    }

    let (dy, hit_y) = step(*position, top_left, bottom_right, Vec2::new(0.0, velocity.y), &blocked);
    *position += dy;
    if hit_y {
        contact = contact
            | if velocity.y > 0.0 {
                Contact::GROUND
            } else {
                Contact::CEILING
            };
    }

    contact
}

fn step(
    position: Vec2,
    top_left: Vec2,
    bottom_right: Vec2,
    delta: Vec2,
    blocked: &impl Fn(&Polygon) -> bool,
) -> (Vec2, bool) {
    if delta == Vec2::ZERO {
        return (Vec2::ZERO, false);
    }
    let hitbox_at = |p: Vec2| Polygon::rectangle(p + top_left, p + bottom_right);
    if !blocked(&hitbox_at(position + delta)) {
        return (delta, false);
    }

    let (mut free, mut hit) = (0.0f32, 1.0f32);
    for _ in 0..BISECT_STEPS {
        let mid = (free + hit) / 2.0;
        if blocked(&hitbox_at(position + delta * mid)) {
            hit = mid;
        } else {
            free = mid;
        }
    }
    (delta * free, true)
}
