//! Fixture shared by the object tests.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::CharacterState;
use crate::assets::registry::AssetRegistry;
use crate::components::tilemap::Tilemap;
use crate::core::geometry::Polygon;
use crate::objects::set::Links;
use crate::renderer::camera::Camera;

pub struct World {
    pub tilemap: Tilemap,
    pub camera: Camera,
    pub character: CharacterState,
    pub assets: AssetRegistry,
    pub config: GameConfig,
}

impl World {
    /// Empty 40x10 map of 16px tiles with a solid floor row at y = 9
    /// (pixels 144..160). The character stands far outside the map.
    pub fn new() -> Self {
        let mut data = vec![0u32; 400];
        for cell in &mut data[360..] {
            *cell = 1;
        }
        let data: Vec<String> = data.iter().map(|d| d.to_string()).collect();
        let json = format!(
            r#"{{ "width": 40, "height": 10, "tilewidth": 16, "tileheight": 16,
                 "tilesets": [{{ "tilecount": 2, "tilewidth": 16, "tileheight": 16,
                    "tiles": [{{ "id": 0, "objectgroup": {{ "objects": [
                        {{ "x": 0, "y": 0, "width": 16, "height": 16 }} ] }} }}] }}],
                 "layers": [{{ "id": 1, "data": [{}] }}] }}"#,
            data.join(",")
        );
        Self {
            tilemap: Tilemap::from_json(&json, 60.0).unwrap(),
            camera: Camera::new(256.0, 144.0),
            character: CharacterState::new(
                Vec2::new(-100.0, -100.0),
                Polygon::rectangle(Vec2::new(-100.0, -100.0), Vec2::new(-90.0, -80.0)),
            ),
            assets: AssetRegistry::new(),
            config: GameConfig::default(),
        }
    }

    pub fn links(&self) -> Links<'_> {
        Links {
            tilemap: &self.tilemap,
            camera: &self.camera,
            character: &self.character,
            assets: &self.assets,
            config: &self.config,
        }
    }

    /// Move the character (position and a 16x32 hitbox anchored there).
    pub fn place_character(&mut self, position: Vec2) {
        self.character.position = position;
        self.character.hitbox = Polygon::rectangle(position, position + Vec2::new(16.0, 32.0));
    }
}
