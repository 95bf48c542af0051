use glam::Vec2;

use crate::components::animation::{Animation, AnimationSet};
use crate::renderer::instance::{DrawCommand, DrawContext, Rect};

/// Identifies a texture registered with the asset registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureId(pub u32);

/// A registered texture and its pixel size. Shared by every sprite and
/// tileset drawing from it; read-only after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// How a sprite's position maps to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// World coordinates, translated by the camera.
    #[default]
    World,
    /// Screen coordinates that still follow the camera's per-frame jitter.
    Fixed,
    /// Raw screen coordinates.
    Screen,
}

/// Texture-backed sprite with timed frame playback.
///
/// The resolved frame is recomputed lazily: `draw` (or a frame query) advances
/// the animation at most once, then the sprite is marked dirty again for the
/// next draw.
#[derive(Debug, Clone)]
pub struct Sprite {
    texture: Option<TextureHandle>,
    frame_width: u32,
    frame_height: u32,
    animations: AnimationSet,
    animation: Animation,
    animation_frame: usize,
    animation_timer: f32,
    frame: u32,
    dirty: bool,
    pub position: Vec2,
    pub placement: Placement,
    scale: Vec2,
    flip: bool,
    alpha: u8,
    color_mod: [u8; 3],
    hidden: bool,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: None,
            frame_width: 0,
            frame_height: 0,
            animations: AnimationSet::new(),
            animation: Animation::default(),
            animation_frame: 0,
            animation_timer: 0.0,
            frame: 0,
            dirty: true,
            position: Vec2::ZERO,
            placement: Placement::World,
            scale: Vec2::ONE,
            flip: false,
            alpha: 255,
            color_mod: [255; 3],
            hidden: false,
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the whole texture as a single frame.
    pub fn load(&mut self, texture: TextureHandle) {
        self.load_frames(texture, texture.width, texture.height);
    }

    /// Use `texture` as a grid of `frame_width` x `frame_height` cells.
    pub fn load_frames(&mut self, texture: TextureHandle, frame_width: u32, frame_height: u32) {
        self.texture = Some(texture);
        self.frame_width = frame_width.max(1);
        self.frame_height = frame_height.max(1);
        self.animation = Animation::still(0);
        self.animation_frame = 0;
        self.animation_timer = 0.0;
        self.dirty = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    /// Named animations available to [`Sprite::play`].
    pub fn load_animations(&mut self, animations: AnimationSet) {
        self.animations = animations;
    }

    /// Switch animation. Re-asserting the same frames and delay keeps the
    /// current phase.
    pub fn set_animation(&mut self, animation: Animation) {
        if self.animation.same_sequence(&animation) {
            return;
        }
        self.animation = animation;
        self.animation_frame = 0;
        self.animation_timer = 0.0;
        self.dirty = true;
    }

    /// Switch to a named animation. Unknown names are logged and ignored.
    pub fn play(&mut self, name: &str) -> bool {
        match self.animations.get(name) {
            Some(animation) => {
                let animation = animation.clone();
                self.set_animation(animation);
                true
            }
            None => {
                log::warn!("sprite has no animation named {name:?}");
                false
            }
        }
    }

    pub fn set_frame(&mut self, frame: u32) {
        self.set_animation(Animation::still(frame));
    }

    pub fn is_animated(&self) -> bool {
        !self.animation.is_static()
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Texture cell to display, advancing the animation if needed.
    pub fn current_frame(&mut self, elapsed: f32) -> u32 {
        self.update_animation(elapsed);
        self.frame
    }

    /// Index into the current animation's frame list.
    pub fn animation_frame(&mut self, elapsed: f32) -> usize {
        self.update_animation(elapsed);
        self.animation_frame
    }

    /// Last resolved frame, without advancing.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    fn update_animation(&mut self, elapsed: f32) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        if self.animation.is_static() {
            self.frame = self.animation.frames.first().copied().unwrap_or(0);
            return;
        }

        let len = self.animation.frame_count();
        let delay = self.animation.delay as f32;
        // NaN and infinite steps would poison the timer for good.
        if elapsed.is_finite() {
            self.animation_timer += elapsed.max(0.0);
        }
        let steps = (self.animation_timer / delay).floor();
        self.animation_timer = (self.animation_timer - steps * delay).max(0.0);

        // Counted in f64 so a huge finite step cannot overflow the index.
        let mut position = self.animation_frame as f64 + steps as f64;
        let count = len as f64;
        if position >= count {
            if self.animation.repeat != Animation::INFINITE {
                let cycles = (position / count).floor();
                if cycles >= self.animation.repeat as f64 {
                    let last = self.animation.frames[len - 1];
                    self.set_animation(Animation::still(last));
                    self.dirty = false;
                    self.frame = last;
                    return;
                }
                self.animation.repeat -= cycles as i32;
            }
            position %= count;
        }

        self.animation_frame = position as usize;
        self.frame = self.animation.frames[self.animation_frame];
    }

    /// Opacity 0-255. Zero hides the sprite.
    pub fn set_alpha(&mut self, alpha: i32) {
        self.alpha = alpha.clamp(0, 255) as u8;
        self.hidden = self.alpha == 0;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_color_mod(&mut self, r: i32, g: i32, b: i32) {
        let channel = |c: i32| c.clamp(0, 255) as u8;
        self.color_mod = [channel(r), channel(g), channel(b)];
    }

    pub fn color_mod(&self) -> [u8; 3] {
        self.color_mod
    }

    pub fn set_flip(&mut self, flip: bool) {
        self.flip = flip;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn width(&self) -> u32 {
        self.frame_width
    }

    pub fn height(&self) -> u32 {
        self.frame_height
    }

    pub fn draw(&mut self, ctx: &mut DrawContext) {
        let Some(texture) = self.texture else {
            return;
        };
        self.update_animation(ctx.elapsed);

        let tex_width = texture.width.max(1);
        let cell = self.frame_width * self.frame;
        let src = Rect::new(
            (cell % tex_width) as f32,
            (cell / tex_width * self.frame_height) as f32,
            self.frame_width as f32,
            self.frame_height as f32,
        );

        let screen = match self.placement {
            Placement::World => ctx.camera.relative(self.position),
            Placement::Fixed => self.position + ctx.camera.shake_offset(),
            Placement::Screen => self.position,
        };
        let size = Vec2::new(self.frame_width as f32, self.frame_height as f32) * self.scale;

        if !self.hidden {
            let [r, g, b] = self.color_mod;
            ctx.list.push(DrawCommand {
                texture: texture.id.0,
                flip: self.flip as u32,
                src,
                dst: Rect::from_corner(screen, size),
                alpha: self.alpha as f32,
                color_mod: [r as f32, g as f32, b as f32],
            });
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::camera::Camera;
    use crate::renderer::instance::DrawList;
    use proptest::prelude::*;

    fn texture() -> TextureHandle {
        TextureHandle {
            id: TextureId(3),
            width: 64,
            height: 32,
        }
    }

    fn animated(frames: Vec<u32>, delay: u32, repeat: i32) -> Sprite {
        let mut sprite = Sprite::new();
        sprite.load_frames(texture(), 16, 16);
        sprite.set_animation(Animation::new(frames, delay, repeat));
        sprite
    }

    /// Simulates one draw per tick.
    fn advance(sprite: &mut Sprite, ticks: u32) -> u32 {
        let mut frame = sprite.frame();
        for _ in 0..ticks {
            frame = sprite.current_frame(1.0);
            sprite.dirty = true;
        }
        frame
    }

    #[test]
    fn static_animation_uses_first_frame() {
        let mut sprite = animated(vec![5], 4, -1);
        assert_eq!(sprite.current_frame(100.0), 5);
        assert!(!sprite.is_animated());
    }

    #[test]
    fn frame_advances_with_delay() {
        let mut sprite = animated(vec![1, 2, 3], 10, -1);
        assert_eq!(advance(&mut sprite, 9), 1);
        assert_eq!(advance(&mut sprite, 1), 2);
        assert_eq!(advance(&mut sprite, 10), 3);
        assert_eq!(advance(&mut sprite, 10), 1);
    }

    #[test]
    fn frame_updates_only_once_per_draw() {
        let mut sprite = animated(vec![1, 2, 3], 1, -1);
        assert_eq!(sprite.current_frame(1.0), 2);
        // Not dirty until the next draw.
        assert_eq!(sprite.current_frame(1.0), 2);
        assert_eq!(sprite.animation_frame(1.0), 1);
    }

    #[test]
    fn repeat_twice_holds_last_frame() {
        let mut sprite = animated(vec![4, 5, 6], 10, 2);
        assert_eq!(advance(&mut sprite, 10 * 3 * 2), 6);
        assert!(!sprite.is_animated());
        assert_eq!(advance(&mut sprite, 100), 6);
    }

    #[test]
    fn repeat_consumed_in_one_large_step() {
        let mut sprite = animated(vec![4, 5, 6], 10, 2);
        assert_eq!(sprite.current_frame(60.0), 6);
    }

    #[test]
    fn same_sequence_keeps_phase() {
        let mut sprite = animated(vec![1, 2, 3], 10, -1);
        advance(&mut sprite, 15);
        sprite.set_animation(Animation::new(vec![1, 2, 3], 10, 3));
        assert_eq!(advance(&mut sprite, 1), 2);
        assert_eq!(sprite.animation_frame(0.0), 1);
    }

    #[test]
    fn unknown_animation_keeps_current() {
        let mut sprite = animated(vec![1, 2], 10, -1);
        let mut set = AnimationSet::new();
        set.insert("walk", Animation::new(vec![7, 8], 5, -1));
        sprite.load_animations(set);
        assert!(!sprite.play("run"));
        assert_eq!(sprite.animation().frames, vec![1, 2]);
        assert!(sprite.play("walk"));
        assert_eq!(sprite.animation().frames, vec![7, 8]);
    }

    #[test]
    fn alpha_and_color_are_clamped() {
        let mut sprite = Sprite::new();
        sprite.set_alpha(300);
        assert_eq!(sprite.alpha(), 255);
        sprite.set_alpha(-4);
        assert_eq!(sprite.alpha(), 0);
        sprite.set_color_mod(-1, 128, 999);
        assert_eq!(sprite.color_mod(), [0, 128, 255]);
    }

    #[test]
    fn draw_emits_camera_relative_command() {
        let mut camera = Camera::new(256.0, 144.0);
        camera.set_follow_position(Vec2::new(10.0, 0.0));
        let mut list = DrawList::new();
        let mut sprite = Sprite::new();
        sprite.load_frames(texture(), 16, 16);
        sprite.set_frame(5);
        sprite.set_position(Vec2::new(30.0, 20.0));
        sprite.set_flip(true);

        sprite.draw(&mut DrawContext::new(&camera, 1.0, &mut list));

        let cmd = list.commands()[0];
        assert_eq!(cmd.texture, 3);
        assert!(cmd.is_flipped());
        // Cell 5 of a 4-wide grid.
        assert_eq!(cmd.src, Rect::new(16.0, 16.0, 16.0, 16.0));
        assert_eq!(cmd.dst, Rect::new(20.0, 20.0, 16.0, 16.0));
    }

    #[test]
    fn hidden_and_unloaded_sprites_skip_draw() {
        let camera = Camera::new(256.0, 144.0);
        let mut list = DrawList::new();
        let mut unloaded = Sprite::new();
        unloaded.draw(&mut DrawContext::new(&camera, 1.0, &mut list));
        let mut hidden = Sprite::new();
        hidden.load(texture());
        hidden.set_alpha(0);
        hidden.draw(&mut DrawContext::new(&camera, 1.0, &mut list));
        assert!(list.is_empty());
    }

    #[test]
    fn non_finite_or_huge_elapsed_is_survived() {
        let mut sprite = animated(vec![1, 2, 3], 10, -1);
        assert_eq!(sprite.current_frame(f32::NAN), 1);
        sprite.dirty = true;
        assert_eq!(sprite.current_frame(f32::INFINITY), 1);
        sprite.dirty = true;
        assert_eq!(advance(&mut sprite, 10), 2);

        sprite.dirty = true;
        let frame = sprite.current_frame(1.0e30);
        assert!([1, 2, 3].contains(&frame));
        assert!(sprite.animation_frame(0.0) < 3);

        let mut once = animated(vec![4, 5, 6], 2, 1);
        assert_eq!(once.current_frame(f32::MAX), 6);
        assert!(!once.is_animated());
    }

    #[test]
    fn placement_decides_camera_offset() {
        let mut camera = Camera::new(256.0, 144.0);
        camera.set_follow_position(Vec2::new(50.0, 30.0));
        camera.shake(10.0);
        camera.update(1.0);
        let jitter = camera.shake_offset();
        assert_ne!(jitter, Vec2::ZERO);
        assert_eq!(camera.position(), Vec2::new(50.0, 30.0));

        let draw_at = |placement: Placement| {
            let mut list = DrawList::new();
            let mut sprite = Sprite::new();
            sprite.load_frames(texture(), 16, 16);
            sprite.set_position(Vec2::new(10.0, 20.0));
            sprite.placement = placement;
            sprite.draw(&mut DrawContext::new(&camera, 1.0, &mut list));
            let dst = list.commands()[0].dst;
            Vec2::new(dst.x, dst.y)
        };

        let close = |a: Vec2, b: Vec2| (a - b).length() < 1e-4;
        let base = Vec2::new(10.0, 20.0);
        assert!(close(draw_at(Placement::World), base - Vec2::new(50.0, 30.0) - jitter));
        // Camera-fixed: ignores the camera position, follows the shake.
        assert!(close(draw_at(Placement::Fixed), base + jitter));
        assert_eq!(draw_at(Placement::Screen), base);
    }

    proptest! {
        #[test]
        fn infinite_animation_returns_to_first_frame(
            len in 2usize..8,
            delay in 1u32..12,
            k in 0u32..6,
        ) {
            let frames: Vec<u32> = (10..10 + len as u32).collect();
            let mut sprite = animated(frames, delay, -1);
            let period = len as u32 * delay;
            prop_assert_eq!(sprite.current_frame((k * period) as f32), 10);
        }
    }
}
