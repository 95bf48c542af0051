pub mod error;
pub mod manifest;
pub mod registry;

pub use error::LoadError;
pub use manifest::{AnimationDescription, AssetManifest, LevelDescription, SpawnDescription};
pub use registry::AssetRegistry;
