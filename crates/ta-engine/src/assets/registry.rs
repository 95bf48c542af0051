use std::collections::HashMap;

use crate::assets::error::LoadError;
use crate::assets::manifest::AssetManifest;
use crate::components::animation::AnimationSet;
use crate::components::sprite::{Sprite, TextureHandle, TextureId};

/// Textures (by path) and named animation sets, registered once at load and
/// shared read-only by every sprite afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    textures: HashMap<String, TextureHandle>,
    animations: HashMap<String, AnimationSet>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed AssetManifest. Ids follow manifest order.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut registry = Self::new();
        for texture in &manifest.textures {
            registry.register_texture(&texture.path, texture.width, texture.height);
        }
        registry
    }

    /// Register a texture decoded by the host. Re-registering a path keeps
    /// its id and updates the size.
    pub fn register_texture(&mut self, path: &str, width: u32, height: u32) -> TextureHandle {
        let next = TextureId(self.textures.len() as u32);
        let handle = self
            .textures
            .entry(path.to_owned())
            .and_modify(|h| {
                h.width = width;
                h.height = height;
            })
            .or_insert(TextureHandle {
                id: next,
                width,
                height,
            });
        *handle
    }

    pub fn texture(&self, path: &str) -> Option<TextureHandle> {
        self.textures.get(path).copied()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn register_animations(&mut self, name: &str, animations: AnimationSet) {
        self.animations.insert(name.to_owned(), animations);
    }

    /// Parse and register an animation description.
    pub fn register_animations_json(&mut self, name: &str, json: &str) -> Result<(), LoadError> {
        let set = AnimationSet::from_json(json)?;
        self.register_animations(name, set);
        Ok(())
    }

    pub fn animations(&self, name: &str) -> Option<&AnimationSet> {
        self.animations.get(name)
    }

    /// Sprite over the texture at `path`, cut into `frame` sized cells (the
    /// whole texture when `None`). A missing texture is logged and yields an
    /// unloaded sprite whose draws are skipped.
    pub fn load_sprite(&self, path: &str, frame: Option<(u32, u32)>) -> Sprite {
        let mut sprite = Sprite::new();
        match (self.texture(path), frame) {
            (Some(texture), Some((w, h))) => sprite.load_frames(texture, w, h),
            (Some(texture), None) => sprite.load(texture),
            (None, _) => log::warn!("texture {path:?} is not registered"),
        }
        sprite
    }

    /// [`AssetRegistry::load_sprite`] plus the named animation set `animations`.
    pub fn load_animated_sprite(
        &self,
        path: &str,
        frame: Option<(u32, u32)>,
        animations: &str,
    ) -> Sprite {
        let mut sprite = self.load_sprite(path, frame);
        match self.animations(animations) {
            Some(set) => sprite.load_animations(set.clone()),
            None => log::warn!("animation set {animations:?} is not registered"),
        }
        sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "textures": [
                { "path": "tiles.png", "width": 128, "height": 64 },
                { "path": "objects/ring.png", "width": 32, "height": 8 }
            ]
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let reg = AssetRegistry::from_manifest(&manifest);

        let ring = reg.texture("objects/ring.png").expect("ring should exist");
        assert_eq!(ring.id, TextureId(1));
        assert_eq!((ring.width, ring.height), (32, 8));
        assert_eq!(reg.texture_count(), 2);
    }

    #[test]
    fn reregister_keeps_id() {
        let mut reg = AssetRegistry::new();
        let first = reg.register_texture("a.png", 8, 8);
        reg.register_texture("b.png", 8, 8);
        let again = reg.register_texture("a.png", 16, 16);
        assert_eq!(first.id, again.id);
        assert_eq!(again.width, 16);
    }

    #[test]
    fn unknown_returns_none() {
        let reg = AssetRegistry::new();
        assert!(reg.texture("nonexistent").is_none());
        assert!(!reg.load_sprite("nonexistent", None).is_loaded());
    }

    #[test]
    fn animated_sprite_plays_registered_animation() {
        let mut reg = AssetRegistry::new();
        reg.register_texture("ring.png", 32, 8);
        reg.register_animations_json(
            "ring",
            r#"{ "animations": [{ "name": "spin", "frames": [0, 1, 2, 3], "delay": 4 }] }"#,
        )
        .unwrap();
        let mut sprite = reg.load_animated_sprite("ring.png", Some((8, 8)), "ring");
        assert!(sprite.play("spin"));
        assert!(sprite.is_animated());
        assert_eq!(sprite.width(), 8);
    }
}
