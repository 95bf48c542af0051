use glam::Vec2;

use crate::core::rng::Rng;

/// Largest shake jitter in pixels, reached at the start of a shake.
const SHAKE_MAGNITUDE: f32 = 3.0;

/// Side-scrolling camera. `position` is the top-left corner of the view in
/// world space.
///
/// Follows a target with a per-tick speed cap, stays inside a border, can be
/// locked onto a fixed point (boss arenas) and shaken.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Visible size in world units.
    pub view_size: Vec2,
    position: Vec2,
    follow: Vec2,
    movement_speed: f32,
    border: Option<(Vec2, Vec2)>,
    lock_position: Option<Vec2>,
    locked: bool,
    shake_timer: f32,
    shake_duration: f32,
    shake_offset: Vec2,
    rng: Rng,
}

/// Camera change requested by game objects, applied by the camera's owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    Shake(f32),
    Lock(Vec2),
    Unlock,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            view_size: Vec2::new(width, height),
            position: Vec2::ZERO,
            follow: Vec2::ZERO,
            movement_speed: 4.0,
            border: None,
            lock_position: None,
            locked: false,
            shake_timer: 0.0,
            shake_duration: 0.0,
            shake_offset: Vec2::ZERO,
            rng: Rng::new(1),
        }
    }

    pub fn with_speed(mut self, movement_speed: f32) -> Self {
        self.movement_speed = movement_speed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Start following `target` and jump straight onto it.
    pub fn set_follow_position(&mut self, target: Vec2) {
        self.follow = target;
        self.position = target;
    }

    /// Update the follow target without moving yet.
    pub fn follow(&mut self, target: Vec2) {
        self.follow = target;
    }

    /// Clamp range for `position`.
    pub fn set_border(&mut self, top_left: Vec2, bottom_right: Vec2) {
        self.border = Some((top_left, bottom_right.max(top_left)));
    }

    pub fn clear_border(&mut self) {
        self.border = None;
    }

    /// Move toward `position` and hold there once reached.
    pub fn set_lock_position(&mut self, position: Vec2) {
        self.lock_position = Some(position);
        self.locked = self.position == position;
    }

    pub fn unlock(&mut self) {
        self.lock_position = None;
        self.locked = false;
    }

    /// True once the camera has arrived at its lock position.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn shake(&mut self, duration: f32) {
        if duration > 0.0 {
            self.shake_timer = duration;
            self.shake_duration = duration;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer > 0.0
    }

    pub fn apply(&mut self, command: CameraCommand) {
        match command {
            CameraCommand::Shake(duration) => self.shake(duration),
            CameraCommand::Lock(position) => self.set_lock_position(position),
            CameraCommand::Unlock => self.unlock(),
        }
    }

    /// Advance one frame of `elapsed` ticks.
    pub fn update(&mut self, elapsed: f32) {
        let step = self.movement_speed * elapsed;
        let approach = |current: f32, need: f32| {
            if current < need {
                need.min(current + step)
            } else {
                need.max(current - step)
            }
        };

        match self.lock_position {
            Some(lock) if self.locked => self.position = lock,
            Some(lock) => {
                self.position.x = approach(self.position.x, lock.x);
                self.position.y = approach(self.position.y, lock.y);
                self.locked = self.position == lock;
            }
            None => {
                self.position.x = approach(self.position.x, self.follow.x);
                self.position.y = approach(self.position.y, self.follow.y);
                if let Some((top_left, bottom_right)) = self.border {
                    self.position = self.position.clamp(top_left, bottom_right);
                }
            }
        }

        self.update_shake(elapsed);
    }

    fn update_shake(&mut self, elapsed: f32) {
        if self.shake_timer <= 0.0 {
            self.shake_offset = Vec2::ZERO;
            return;
        }
        self.shake_timer = (self.shake_timer - elapsed).max(0.0);
        let magnitude = SHAKE_MAGNITUDE * self.shake_timer / self.shake_duration;
        let mut jitter = || (self.rng.next_f32() * 2.0 - 1.0) * magnitude;
        self.shake_offset = Vec2::new(jitter(), jitter());
    }

    /// Current jitter added to everything drawn through this camera.
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Position used for rendering, jitter included.
    pub fn render_position(&self) -> Vec2 {
        self.position + self.shake_offset
    }

    /// World to screen.
    pub fn relative(&self, world: Vec2) -> Vec2 {
        world - self.render_position()
    }

    /// Whether a world-space rectangle overlaps the view.
    pub fn is_rect_visible(&self, top_left: Vec2, size: Vec2) -> bool {
        let view_min = self.render_position();
        let view_max = view_min + self.view_size;
        let bottom_right = top_left + size;
        bottom_right.x >= view_min.x
            && top_left.x <= view_max.x
            && bottom_right.y >= view_min.y
            && top_left.y <= view_max.y
    }
}
