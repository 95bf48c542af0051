// extensions/easing.rs
//
// Curves for timer-driven movement: `t` is `timer / duration`, clamped to
// [0, 1].

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Accelerating from rest.
    QuadIn,
    /// Half a cosine wave, slow at both ends.
    SineInOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
        }
    }
}

#[inline]
pub fn lerp_vec2(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from + (to - from) * t
}

/// Height of a footstep: 0 at both ends, 1 halfway.
#[inline]
pub fn step_arc(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin()
}

/// Quarter-circle swing from `from` to `to`: starts moving along x and
/// ends moving along y (a downward strike when `to` is below `from`).
pub fn swing(from: Vec2, to: Vec2, t: f32, easing: Easing) -> Vec2 {
    let angle = FRAC_PI_2 * (1.0 + easing.apply(t));
    Vec2::new(
        from.x + (to.x - from.x) * -angle.cos(),
        to.y + (to.y - from.y) * -angle.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn curves_hit_endpoints() {
        for easing in [Easing::Linear, Easing::QuadIn, Easing::SineInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(7.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
        assert!(Easing::QuadIn.apply(0.5) < 0.5);
    }

    #[test]
    fn sine_in_out_is_symmetric() {
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::SineInOut.apply(0.2);
        let b = Easing::SineInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn step_arc_peaks_halfway() {
        assert!(step_arc(0.0).abs() < 1e-6);
        assert!((step_arc(0.5) - 1.0).abs() < 1e-6);
        assert!(step_arc(1.0).abs() < 1e-6);
    }

    #[test]
    fn swing_runs_corner_to_corner() {
        let from = Vec2::new(10.0, 0.0);
        let to = Vec2::new(-20.0, 60.0);
        assert!(close(swing(from, to, 0.0, Easing::Linear), from));
        assert!(close(swing(from, to, 1.0, Easing::Linear), to));
        // Halfway along the arc, not along the chord.
        let mid = swing(from, to, 0.5, Easing::Linear);
        let radius = (to - from).abs();
        assert!(close(mid, Vec2::new(from.x - radius.x * 0.7071068, to.y - radius.y * 0.7071068)));
    }

    #[test]
    fn lerp_vec2_blends() {
        assert_eq!(lerp_vec2(Vec2::ZERO, Vec2::new(4.0, 8.0), 0.25), Vec2::new(1.0, 2.0));
    }
}
