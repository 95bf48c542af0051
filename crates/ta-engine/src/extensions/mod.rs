// extensions/mod.rs
//
// Helpers for scripted movement, used by objects that animate on timers
// rather than physics.

pub mod easing;

pub use easing::{lerp_vec2, step_arc, swing, Easing};
