/// Converts variable wall-clock frame durations into tick units.
///
/// Every timer in the simulation counts ticks (1/`tick_rate` s). The clock
/// computes one elapsed value per frame; components treat it as read-only.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_rate: f32,
    max_ticks: f32,
    elapsed: f32,
}

impl FrameClock {
    pub fn new(tick_rate: f32, max_ticks: f32) -> Self {
        Self {
            tick_rate,
            max_ticks,
            elapsed: 0.0,
        }
    }

    /// Feed the duration of the last frame in seconds. Returns elapsed ticks,
    /// capped so a long stall does not teleport objects.
    pub fn advance(&mut self, frame_seconds: f32) -> f32 {
        self.elapsed = (frame_seconds * self.tick_rate).clamp(0.0, self.max_ticks);
        self.elapsed
    }

    /// Elapsed ticks of the current frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn tick_rate(&self) -> f32 {
        self.tick_rate
    }
}

/// Convert a millisecond duration to whole ticks, rounding to nearest.
pub fn millis_to_ticks(millis: u32, tick_rate: f32) -> u32 {
    (millis as f32 * tick_rate / 1000.0 + 0.5) as u32
}
