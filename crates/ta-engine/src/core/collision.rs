use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bit set describing what a collision query touched.
///
/// Several bits can be set at once; callers mask for the ones they care about.
/// Tile collision types from the level description select a bit by index
/// (see [`CollisionFlags::from_type_index`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CollisionFlags(pub u32);

impl CollisionFlags {
    pub const NONE: Self = Self(0);
    pub const SOLID: Self = Self(1 << 0);
    pub const HALF_SOLID: Self = Self(1 << 1);
    pub const DAMAGE: Self = Self(1 << 2);
    pub const PUSHABLE: Self = Self(1 << 3);
    pub const EXPLOSION_FIRST: Self = Self(1 << 4);
    pub const EXPLOSION: Self = Self(1 << 5);
    pub const HAMMER: Self = Self(1 << 6);
    pub const TRANSPARENT: Self = Self(1 << 7);
    pub const CHARACTER: Self = Self(1 << 8);

    /// Tile type index that marks half-solid (jump-through) tiles.
    pub const HALF_SOLID_TYPE: u32 = 1;

    /// Flag for a collision type index from the level description.
    pub fn from_type_index(index: u32) -> Self {
        if index < u32::BITS {
            Self(1 << index)
        } else {
            Self::NONE
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CollisionFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_index_maps_to_bits() {
        assert_eq!(CollisionFlags::from_type_index(0), CollisionFlags::SOLID);
        assert_eq!(
            CollisionFlags::from_type_index(CollisionFlags::HALF_SOLID_TYPE),
            CollisionFlags::HALF_SOLID
        );
        assert_eq!(CollisionFlags::from_type_index(40), CollisionFlags::NONE);
    }

    #[test]
    fn masks_combine() {
        let flags = CollisionFlags::SOLID | CollisionFlags::CHARACTER;
        assert!(flags.contains(CollisionFlags::SOLID));
        assert!(flags.intersects(CollisionFlags::CHARACTER | CollisionFlags::HAMMER));
        assert!(!flags.intersects(CollisionFlags::HAMMER));
        assert_eq!(flags & CollisionFlags::SOLID, CollisionFlags::SOLID);
    }
}
