pub mod animation;
pub mod layer;
pub mod sprite;
pub mod tilemap;
