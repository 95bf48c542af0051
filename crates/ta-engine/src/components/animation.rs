//! Frame sequences for sprites and animated tiles.

use std::collections::HashMap;

use crate::assets::error::LoadError;
use crate::assets::manifest::AnimationDescription;

/// An immutable frame sequence: texture cell indices, per-frame delay in
/// ticks and a repeat count ([`Animation::INFINITE`] loops forever).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub frames: Vec<u32>,
    pub delay: u32,
    pub repeat: i32,
}

impl Animation {
    pub const INFINITE: i32 = -1;

    pub fn new(frames: Vec<u32>, delay: u32, repeat: i32) -> Self {
        Self {
            frames,
            delay: delay.max(1),
            repeat,
        }
    }

    /// Consecutive cells `first..=last`.
    pub fn range(first: u32, last: u32, delay: u32, repeat: i32) -> Self {
        Self::new((first..=last).collect(), delay, repeat)
    }

    /// A single still frame.
    pub fn still(frame: u32) -> Self {
        Self::new(vec![frame], 1, Self::INFINITE)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Fewer than two frames never advance.
    pub fn is_static(&self) -> bool {
        self.frames.len() < 2
    }

    /// Ticks for one full pass through the sequence.
    pub fn period(&self) -> u32 {
        self.delay * self.frames.len() as u32
    }

    /// Same frames and delay; the repeat count is not compared.
    pub fn same_sequence(&self, other: &Animation) -> bool {
        self.frames == other.frames && self.delay == other.delay
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::still(0)
    }
}

/// Named animations loaded from an animation description.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    animations: HashMap<String, Animation>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: &AnimationDescription) -> Result<Self, LoadError> {
        let mut set = Self::new();
        for entry in &description.animations {
            if entry.frames.is_empty() {
                return Err(LoadError::EmptyAnimation(entry.name.clone()));
            }
            set.insert(
                entry.name.clone(),
                Animation::new(entry.frames.clone(), entry.delay, entry.repeat),
            );
        }
        Ok(set)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Self::from_description(&AnimationDescription::from_json(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, animation: Animation) {
        self.animations.insert(name.into(), animation);
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_builds_consecutive_frames() {
        let anim = Animation::range(2, 5, 4, Animation::INFINITE);
        assert_eq!(anim.frames, vec![2, 3, 4, 5]);
        assert_eq!(anim.period(), 16);
        assert!(!anim.is_static());
    }

    #[test]
    fn zero_delay_is_raised_to_one() {
        assert_eq!(Animation::new(vec![0, 1], 0, 1).delay, 1);
    }

    #[test]
    fn same_sequence_ignores_repeat() {
        let a = Animation::range(0, 3, 2, 1);
        let b = Animation::range(0, 3, 2, Animation::INFINITE);
        assert!(a.same_sequence(&b));
        assert!(!a.same_sequence(&Animation::range(0, 3, 3, 1)));
    }

    #[test]
    fn loads_named_animations_with_defaults() {
        let json = r#"{
            "animations": [
                { "name": "ring", "frames": [0, 1, 2, 3], "delay": 4 },
                { "name": "pop", "frames": [4, 5], "repeat": 1 }
            ]
        }"#;
        let set = AnimationSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        let ring = set.get("ring").unwrap();
        assert_eq!(ring.delay, 4);
        assert_eq!(ring.repeat, Animation::INFINITE);
        let pop = set.get("pop").unwrap();
        assert_eq!(pop.delay, 1);
        assert_eq!(pop.repeat, 1);
    }

    #[test]
    fn empty_frame_list_is_a_load_error() {
        let json = r#"{ "animations": [ { "name": "broken", "frames": [] } ] }"#;
        assert!(matches!(
            AnimationSet::from_json(json),
            Err(LoadError::EmptyAnimation(name)) if name == "broken"
        ));
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(matches!(AnimationSet::from_json("{"), Err(LoadError::Json(_))));
    }
}
