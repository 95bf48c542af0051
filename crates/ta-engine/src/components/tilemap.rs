//! Static level grid: layered tile indices, per-tile collision shapes and
//! animated tiles.
//!
//! Collision queries only visit the tiles under the query's bounding box.
//! Rendering culls tiles outside the camera view.

use glam::Vec2;

use crate::assets::error::LoadError;
use crate::assets::manifest::LevelDescription;
use crate::components::sprite::TextureHandle;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::core::time::millis_to_ticks;
use crate::renderer::instance::{DrawCommand, DrawContext, Rect};

/// Thickness of the invisible walls around the map.
const BORDER_MARGIN: f32 = 16.0;

/// Height offset applied to sloped (non-rectangular) half-solid tiles when
/// deciding whether an object lands on them.
const SLOPE_TOP_OFFSET: f32 = 16.0;

/// One tileset entry.
#[derive(Debug, Clone)]
pub struct TileInfo {
    /// Tileset cells cycled through; a single entry for static tiles.
    pub animation: Vec<u32>,
    /// Ticks per animation frame.
    pub delay: u32,
    /// Collision shape relative to the tile's top-left corner. Empty when the
    /// tile does not collide.
    pub polygon: Polygon,
    /// Collision bit index.
    pub collision_type: u32,
}

impl TileInfo {
    fn plain(id: u32) -> Self {
        Self {
            animation: vec![id],
            delay: 1,
            polygon: Polygon::new(),
            collision_type: 0,
        }
    }

    /// Tileset cell shown after `timer` ticks.
    pub fn frame_at(&self, timer: f32) -> u32 {
        match self.animation.len() {
            0 => 0,
            1 => self.animation[0],
            len => {
                let step = (timer.max(0.0) / self.delay.max(1) as f32) as usize;
                self.animation[step % len]
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tilemap {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    tileset: Vec<TileInfo>,
    /// Back-to-front; each layer is row-major (`y * width + x`).
    layers: Vec<Vec<Option<u32>>>,
    borders: [Polygon; 4],
    texture_path: String,
    texture: Option<TextureHandle>,
    animation_timer: f32,
    collision_layer: usize,
}

impl Tilemap {
    /// Parse a JSON level description. `tick_rate` converts tile animation
    /// durations from milliseconds to ticks.
    pub fn from_json(json: &str, tick_rate: f32) -> Result<Self, LoadError> {
        Self::from_description(&LevelDescription::from_json(json)?, tick_rate)
    }

    pub fn from_description(desc: &LevelDescription, tick_rate: f32) -> Result<Self, LoadError> {
        let tileset_desc = desc.tilesets.first().ok_or(LoadError::MissingTileset)?;
        let tile_width = if tileset_desc.tilewidth > 0 {
            tileset_desc.tilewidth
        } else {
            desc.tilewidth
        };
        let tile_height = if tileset_desc.tileheight > 0 {
            tileset_desc.tileheight
        } else {
            desc.tileheight
        };
        if desc.width == 0 || desc.height == 0 || tile_width == 0 || tile_height == 0 {
            return Err(LoadError::InvalidDimensions {
                width: desc.width,
                height: desc.height,
                tile_width,
                tile_height,
            });
        }
        if desc.layers.is_empty() {
            return Err(LoadError::NoLayers);
        }
        // Cell indices and pixel extents are computed in u32.
        let too_large = || LoadError::MapTooLarge {
            width: desc.width,
            height: desc.height,
        };
        let cell_count = desc.width.checked_mul(desc.height).ok_or_else(too_large)?;
        desc.width.checked_mul(tile_width).ok_or_else(too_large)?;
        desc.height.checked_mul(tile_height).ok_or_else(too_large)?;

        let tile_count = tileset_desc.tilecount;
        let mut tileset: Vec<TileInfo> = (0..tile_count).map(TileInfo::plain).collect();

        for tile in &tileset_desc.tiles {
            let info = tileset
                .get_mut(tile.id as usize)
                .ok_or(LoadError::TileIdOutOfRange { id: tile.id, tile_count })?;

            if let Some(first) = tile.animation.first() {
                info.delay = millis_to_ticks(first.duration, tick_rate).max(1);
                info.animation = tile.animation.iter().map(|f| f.tileid).collect();
                if let Some(&id) = info.animation.iter().find(|&&id| id >= tile_count) {
                    return Err(LoadError::TileIdOutOfRange { id, tile_count });
                }
            }

            if let Some(shape) = tile.objectgroup.as_ref().and_then(|g| g.objects.first()) {
                let origin = Vec2::new(shape.x, shape.y);
                info.polygon = if shape.polygon.is_empty() {
                    Polygon::rectangle(origin, origin + Vec2::new(shape.width, shape.height))
                } else {
                    Polygon::from_vertices(
                        shape.polygon.iter().map(|p| origin + Vec2::new(p.x, p.y)),
                    )
                };
                info.collision_type = shape.collision_type();
            }
        }

        let mut ordered: Vec<_> = desc.layers.iter().collect();
        ordered.sort_by_key(|layer| layer.id);

        let expected = cell_count as usize;
        let mut layers = Vec::with_capacity(ordered.len());
        for layer in ordered {
            if layer.data.len() != expected {
                return Err(LoadError::LayerSize {
                    layer: layer.id,
                    expected,
                    found: layer.data.len(),
                });
            }
            let cells = layer
                .data
                .iter()
                .map(|&raw| match raw {
                    0 => Ok(None),
                    index if index - 1 < tile_count => Ok(Some(index - 1)),
                    index => Err(LoadError::TileOutOfRange {
                        layer: layer.id,
                        index: index - 1,
                        tile_count,
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            layers.push(cells);
        }

        let pixel_w = (desc.width * tile_width) as f32;
        let pixel_h = (desc.height * tile_height) as f32;
        let borders = [
            Polygon::rectangle(Vec2::new(0.0, -BORDER_MARGIN), Vec2::new(pixel_w, 0.0)),
            Polygon::rectangle(Vec2::new(0.0, pixel_h), Vec2::new(pixel_w, pixel_h + BORDER_MARGIN)),
            Polygon::rectangle(Vec2::new(-BORDER_MARGIN, 0.0), Vec2::new(0.0, pixel_h)),
            Polygon::rectangle(Vec2::new(pixel_w, 0.0), Vec2::new(pixel_w + BORDER_MARGIN, pixel_h)),
        ];

        log::info!(
            "loaded tilemap {}x{} ({}x{} tiles), {} layers, {} tileset entries",
            desc.width,
            desc.height,
            tile_width,
            tile_height,
            layers.len(),
            tile_count,
        );

        Ok(Self {
            width: desc.width,
            height: desc.height,
            tile_width,
            tile_height,
            tileset,
            layers,
            borders,
            texture_path: tileset_desc.image.clone(),
            texture: None,
            animation_timer: 0.0,
            collision_layer: 0,
        })
    }

    /// Layer used by [`Tilemap::check_collision_default`]; clamped to the
    /// last layer.
    pub fn with_collision_layer(mut self, layer: usize) -> Self {
        self.collision_layer = layer.min(self.layers.len().saturating_sub(1));
        self
    }

    pub fn collision_layer(&self) -> usize {
        self.collision_layer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Map extents in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.width * self.tile_width) as f32,
            (self.height * self.tile_height) as f32,
        )
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn tile(&self, layer: usize, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.layers
            .get(layer)
            .and_then(|cells| cells[(y * self.width + x) as usize])
    }

    pub fn tile_info(&self, id: u32) -> Option<&TileInfo> {
        self.tileset.get(id as usize)
    }

    pub fn borders(&self) -> &[Polygon; 4] {
        &self.borders
    }

    /// Texture path of the tileset image.
    pub fn texture_path(&self) -> &str {
        &self.texture_path
    }

    pub fn set_texture(&mut self, texture: TextureHandle) {
        self.texture = Some(texture);
    }

    /// Clamp range for a camera showing `screen` pixels of this map.
    pub fn camera_border(&self, screen: Vec2) -> (Vec2, Vec2) {
        (Vec2::ZERO, (self.pixel_size() - screen).max(Vec2::ZERO))
    }

    /// Advance the shared tile animation clock.
    pub fn update(&mut self, elapsed: f32) {
        self.animation_timer += elapsed.max(0.0);
    }

    /// Collision bits of everything `polygon` touches on `layer`.
    ///
    /// `top` is the querying object's reference height for half-solid tiles:
    /// a half-solid tile only blocks when its top is at or below `top`
    /// (16 units lower for sloped tiles). `None` never lands on half-solids.
    pub fn check_collision(&self, polygon: &Polygon, layer: usize, top: Option<f32>) -> CollisionFlags {
        let mut flags = CollisionFlags::NONE;
        let Some(cells) = self.layers.get(layer) else {
            return self.check_borders(polygon, flags);
        };
        let Some((min, max)) = polygon.bounds() else {
            return flags;
        };

        let tw = self.tile_width as f32;
        let th = self.tile_height as f32;
        let clamp_x = |v: f32| (v / tw).floor().clamp(0.0, (self.width - 1) as f32) as u32;
        let clamp_y = |v: f32| (v / th).floor().clamp(0.0, (self.height - 1) as f32) as u32;
        let top = top.unwrap_or(f32::INFINITY);

        for tile_x in clamp_x(min.x)..=clamp_x(max.x) {
            for tile_y in clamp_y(min.y)..=clamp_y(max.y) {
                let Some(id) = cells[(tile_y * self.width + tile_x) as usize] else {
                    continue;
                };
                let info = &self.tileset[id as usize];
                if info.polygon.is_empty() {
                    continue;
                }
                let tile_top = tile_y as f32 * th;
                let shape = info.polygon.at(Vec2::new(tile_x as f32 * tw, tile_top));
                if !polygon.intersects(&shape) {
                    continue;
                }
                flags |= CollisionFlags::from_type_index(info.collision_type);
                let current_top = if shape.is_rectangle() {
                    top
                } else {
                    top - SLOPE_TOP_OFFSET
                };
                if info.collision_type != CollisionFlags::HALF_SOLID_TYPE || tile_top >= current_top {
                    flags |= CollisionFlags::SOLID;
                    return flags;
                }
            }
        }

        self.check_borders(polygon, flags)
    }

    /// [`Tilemap::check_collision`] on the configured collision layer.
    pub fn check_collision_default(&self, polygon: &Polygon, top: Option<f32>) -> CollisionFlags {
        self.check_collision(polygon, self.collision_layer, top)
    }

    fn check_borders(&self, polygon: &Polygon, mut flags: CollisionFlags) -> CollisionFlags {
        if self.borders.iter().any(|border| border.intersects(polygon)) {
            flags |= CollisionFlags::SOLID;
        }
        flags
    }

    /// Emit draw commands for the visible non-empty tiles of `layer`.
    pub fn draw(&self, layer: usize, ctx: &mut DrawContext) {
        let (Some(texture), Some(cells)) = (self.texture, self.layers.get(layer)) else {
            return;
        };
        let columns = (texture.width / self.tile_width).max(1);
        let size = Vec2::new(self.tile_width as f32, self.tile_height as f32);

        for tile_y in 0..self.height {
            for tile_x in 0..self.width {
                let Some(id) = cells[(tile_y * self.width + tile_x) as usize] else {
                    continue;
                };
                let world = Vec2::new(tile_x as f32, tile_y as f32) * size;
                if !ctx.camera.is_rect_visible(world, size) {
                    continue;
                }
                let cell = self.tileset[id as usize].frame_at(self.animation_timer);
                let src = Rect::new(
                    (cell % columns) as f32 * size.x,
                    (cell / columns) as f32 * size.y,
                    size.x,
                    size.y,
                );
                ctx.list.push(DrawCommand {
                    texture: texture.id.0,
                    flip: 0,
                    src,
                    dst: Rect::from_corner(ctx.camera.relative(world), size),
                    alpha: 255.0,
                    color_mod: [255.0; 3],
                });
            }
        }
    }
}
