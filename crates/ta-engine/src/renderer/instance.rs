use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::sprite::TextureId;
use crate::renderer::camera::Camera;

/// Rectangle in pixels: top-left corner plus size.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self::new(corner.x, corner.y, size.x, size.y)
    }
}

/// One textured quad handed to the external rendering surface.
/// Plain 4-byte fields so a host can read the list as a flat buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawCommand {
    /// Texture id from the asset registry.
    pub texture: u32,
    /// Non-zero when mirrored horizontally.
    pub flip: u32,
    /// Cell of the texture to sample.
    pub src: Rect,
    /// Screen-space destination.
    pub dst: Rect,
    /// Opacity, 0-255.
    pub alpha: f32,
    /// RGB color modulation, 0-255 per channel.
    pub color_mod: [f32; 3],
}

impl DrawCommand {
    pub fn texture_id(&self) -> TextureId {
        TextureId(self.texture)
    }

    pub fn is_flipped(&self) -> bool {
        self.flip != 0
    }
}

/// Draw calls of one frame, in submission (back-to-front) order.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(512),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Raw bytes of the command buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.commands)
    }
}

/// Everything a draw pass needs: the camera for placement, the frame's
/// elapsed ticks for lazy animation updates and the output list.
pub struct DrawContext<'a> {
    pub camera: &'a Camera,
    pub elapsed: f32,
    pub list: &'a mut DrawList,
}

impl<'a> DrawContext<'a> {
    pub fn new(camera: &'a Camera, elapsed: f32, list: &'a mut DrawList) -> Self {
        Self {
            camera,
            elapsed,
            list,
        }
    }
}
