pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod extensions;
pub mod objects;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::game::{GameConfig, GameScreen};
pub use api::types::{CameraCommand, CharacterState, ObjectId, SoundChannel, SoundCue};
pub use assets::error::LoadError;
pub use assets::manifest::{AnimationDescription, AssetManifest, LevelDescription, SpawnDescription};
pub use assets::registry::AssetRegistry;
pub use components::animation::{Animation, AnimationSet};
pub use components::layer::DrawPriority;
pub use components::sprite::{Placement, Sprite, TextureHandle, TextureId};
pub use components::tilemap::{TileInfo, Tilemap};
pub use core::collision::CollisionFlags;
pub use core::geometry::{Point, Polygon};
pub use core::rng::Rng;
pub use core::time::FrameClock;
pub use objects::{
    GameObject, Hitbox, Links, Object, ObjectContext, ObjectSet, Requests,
};
pub use renderer::camera::Camera;
pub use renderer::instance::{DrawCommand, DrawContext, DrawList, Rect};

// Extensions: scripted movement helpers
pub use extensions::{lerp_vec2, step_arc, swing, Easing};
