use glam::Vec2;

use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;

pub use crate::renderer::camera::CameraCommand;

/// Handle to an object slot in the object set. The generation changes when
/// the slot is reused, so stale handles never alias a newer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub index: u32,
    pub generation: u32,
}

/// Output channel of a sound cue. A new cue on a channel replaces the one
/// playing there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundChannel {
    Sfx1,
    Sfx2,
    Sfx3,
    Music,
}

/// A sound the external player should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue {
    pub channel: SoundChannel,
    pub path: &'static str,
}

impl SoundCue {
    pub const fn new(channel: SoundChannel, path: &'static str) -> Self {
        Self { channel, path }
    }
}

/// Player character as seen by the objects: read-only, refreshed by the host
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct CharacterState {
    pub position: Vec2,
    pub hitbox: Polygon,
    /// Active hammer swing, if any.
    pub hammer: Option<Polygon>,
}

impl CharacterState {
    pub fn new(position: Vec2, hitbox: Polygon) -> Self {
        Self {
            position,
            hitbox,
            hammer: None,
        }
    }

    pub fn with_hammer(mut self, hammer: Polygon) -> Self {
        self.hammer = Some(hammer);
        self
    }

    /// CHARACTER when `query` overlaps the hitbox, HAMMER when it overlaps the
    /// hammer.
    pub fn collision(&self, query: &Polygon) -> CollisionFlags {
        let mut flags = CollisionFlags::NONE;
        if self.hitbox.intersects(query) {
            flags |= CollisionFlags::CHARACTER;
        }
        if self.hammer.as_ref().is_some_and(|hammer| hammer.intersects(query)) {
            flags |= CollisionFlags::HAMMER;
        }
        flags
    }
}
