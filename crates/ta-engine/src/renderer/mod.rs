pub mod camera;
pub mod instance;

// Re-export key types for convenient access
pub use camera::{Camera, CameraCommand};
pub use instance::{DrawCommand, DrawContext, DrawList, Rect};
