//! Serde models of the on-disk descriptions: asset manifest, level
//! (Tiled JSON layout) and named animation lists.

use serde::{Deserialize, Serialize};

use crate::assets::error::LoadError;

/// Textures the host has decoded, with their pixel sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub textures: Vec<TextureDescriptor>,
}

/// Describes a single texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Path used by objects and tilesets to refer to the texture.
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl AssetManifest {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Level description. Sizes are in tiles, tile data is 1-based (0 = empty).
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDescription {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub tilesets: Vec<TilesetDescription>,
    #[serde(default)]
    pub layers: Vec<LayerDescription>,
    /// Objects placed in the level at load.
    #[serde(default)]
    pub spawns: Vec<SpawnDescription>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TilesetDescription {
    pub tilecount: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    /// Texture path of the tileset image.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tiles: Vec<TileDescription>,
}

/// Per-tile metadata: animation and/or collision shape.
#[derive(Debug, Clone, Deserialize)]
pub struct TileDescription {
    pub id: u32,
    #[serde(default)]
    pub animation: Vec<TileFrameDescription>,
    #[serde(default)]
    pub objectgroup: Option<ObjectGroupDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TileFrameDescription {
    pub tileid: u32,
    /// Milliseconds.
    pub duration: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectGroupDescription {
    #[serde(default)]
    pub objects: Vec<ShapeDescription>,
}

/// Collision shape of a tile. Either a polygon (vertices relative to `x`, `y`)
/// or, without a polygon, a `width` x `height` box.
#[derive(Debug, Clone, Deserialize)]
pub struct ShapeDescription {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub polygon: Vec<PointDescription>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
}

impl ShapeDescription {
    /// Collision bit index from the `type` property (0 when absent).
    pub fn collision_type(&self) -> u32 {
        self.properties
            .iter()
            .find(|p| p.name == "type")
            .and_then(|p| p.value.as_u64())
            .map(|v| v as u32)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointDescription {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDescription {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayerDescription {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub data: Vec<u32>,
}

/// An object placed by the level description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnDescription {
    BreakableBlock {
        x: f32,
        y: f32,
        #[serde(default)]
        drops_ring: bool,
    },
    Walker {
        x: f32,
        y: f32,
        #[serde(default)]
        range: f32,
        #[serde(default)]
        direction: bool,
    },
    Ring {
        x: f32,
        y: f32,
    },
    MechaGolem,
    /// Any kind outside the object roster, `hover_pod` included.
    #[serde(other)]
    Unsupported,
}

/// Named animation list.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationDescription {
    pub animations: Vec<AnimationEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationEntry {
    pub name: String,
    pub frames: Vec<u32>,
    /// Ticks per frame.
    #[serde(default = "default_delay")]
    pub delay: u32,
    /// Number of passes; -1 loops forever.
    #[serde(default = "default_repeat")]
    pub repeat: i32,
}

impl AnimationDescription {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_delay() -> u32 {
    1
}

fn default_repeat() -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_textures() {
        let json = r#"{
            "textures": [
                { "path": "objects/ring.png", "width": 32, "height": 8 }
            ]
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.textures.len(), 1);
        assert_eq!(manifest.textures[0].width, 32);
    }

    #[test]
    fn parse_level_with_tile_metadata() {
        let json = r#"{
            "width": 2, "height": 1,
            "tilesets": [{
                "tilecount": 4, "tilewidth": 16, "tileheight": 16, "image": "tiles.png",
                "tiles": [
                    { "id": 1, "animation": [ { "tileid": 1, "duration": 100 }, { "tileid": 2, "duration": 100 } ] },
                    { "id": 3, "objectgroup": { "objects": [ {
                        "x": 0, "y": 8,
                        "polygon": [ { "x": 0, "y": 0 }, { "x": 16, "y": 0 } ],
                        "properties": [ { "name": "type", "value": 1 } ]
                    } ] } }
                ]
            }],
            "layers": [ { "id": 1, "data": [1, 0] } ]
        }"#;
        let level = LevelDescription::from_json(json).unwrap();
        assert_eq!(level.tilesets[0].tiles.len(), 2);
        let shape = &level.tilesets[0].tiles[1].objectgroup.as_ref().unwrap().objects[0];
        assert_eq!(shape.collision_type(), 1);
        assert_eq!(shape.polygon.len(), 2);
        assert!(level.spawns.is_empty());
    }

    #[test]
    fn parse_tagged_spawns() {
        let json = r#"{
            "width": 1, "height": 1, "layers": [],
            "spawns": [
                { "kind": "breakable_block", "x": 16, "y": 32, "drops_ring": true },
                { "kind": "walker", "x": 64, "y": 32, "range": 40, "direction": true },
                { "kind": "mecha_golem" }
            ]
        }"#;
        let level = LevelDescription::from_json(json).unwrap();
        assert_eq!(
            level.spawns[0],
            SpawnDescription::BreakableBlock { x: 16.0, y: 32.0, drops_ring: true }
        );
        assert_eq!(level.spawns[2], SpawnDescription::MechaGolem);
    }

    #[test]
    fn unknown_spawn_kinds_parse_as_unsupported() {
        let json = r#"{
            "width": 1, "height": 1, "layers": [],
            "spawns": [{ "kind": "hover_pod", "x": 384, "y": 160, "range": 272, "direction": true }]
        }"#;
        let level = LevelDescription::from_json(json).unwrap();
        assert_eq!(level.spawns, vec![SpawnDescription::Unsupported]);
    }

    #[test]
    fn missing_type_property_defaults_to_solid() {
        let shape: ShapeDescription = serde_json::from_str(r#"{ "width": 16, "height": 16 }"#).unwrap();
        assert_eq!(shape.collision_type(), 0);
    }
}
