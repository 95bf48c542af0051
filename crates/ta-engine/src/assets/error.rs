use thiserror::Error;

/// Failure while loading a level, animation or config description.
/// Load errors are fatal for the level: nothing partial is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level has no tileset")]
    MissingTileset,

    #[error("level has no tile layers")]
    NoLayers,

    #[error("invalid map dimensions {width}x{height} with {tile_width}x{tile_height} tiles")]
    InvalidDimensions {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },

    #[error("map of {width}x{height} tiles is too large")]
    MapTooLarge { width: u32, height: u32 },

    #[error("layer {layer} has {found} tiles, expected {expected}")]
    LayerSize {
        layer: u32,
        expected: usize,
        found: usize,
    },

    #[error("layer {layer} references tile {index} but the tileset has {tile_count}")]
    TileOutOfRange {
        layer: u32,
        index: u32,
        tile_count: u32,
    },

    #[error("tile metadata for id {id} but the tileset has {tile_count}")]
    TileIdOutOfRange { id: u32, tile_count: u32 },

    #[error("animation '{0}' has no frames")]
    EmptyAnimation(String),
}
