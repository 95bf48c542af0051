use glam::Vec2;
use serde::Deserialize;

use crate::api::types::{CharacterState, SoundCue};
use crate::assets::error::LoadError;
use crate::assets::manifest::{LevelDescription, SpawnDescription};
use crate::assets::registry::AssetRegistry;
use crate::components::layer::DrawPriority;
use crate::components::tilemap::Tilemap;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::core::time::FrameClock;
use crate::objects::{Links, ObjectSet};
use crate::renderer::camera::Camera;
use crate::renderer::instance::{DrawContext, DrawList};

/// Tile layers drawn behind every object and the character.
const BACKGROUND_LAYERS: usize = 2;

/// Configuration for the runtime, provided by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical screen width in pixels (default: 256).
    pub screen_width: f32,
    /// Logical screen height in pixels (default: 144).
    pub screen_height: f32,
    /// Ticks per second (default: 60).
    pub tick_rate: f32,
    /// Cap on elapsed ticks for a single frame (default: 10).
    pub max_ticks_per_frame: f32,
    /// Camera movement cap per tick (default: 4).
    pub camera_speed: f32,
    /// Tilemap layer used for object collision (default: 1).
    pub collision_layer: usize,
    /// Seed of the object and camera random sources (default: 42).
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 256.0,
            screen_height: 144.0,
            tick_rate: 60.0,
            max_ticks_per_frame: 10.0,
            camera_speed: 4.0,
            collision_layer: 1,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }
}

/// One loaded level: tilemap, camera and objects driven frame by frame.
///
/// The host supplies the character each frame and renders the resulting
/// [`DrawList`]; sounds requested by objects are collected until
/// [`GameScreen::take_sounds`].
pub struct GameScreen {
    config: GameConfig,
    assets: AssetRegistry,
    tilemap: Tilemap,
    camera: Camera,
    objects: ObjectSet,
    clock: FrameClock,
    sounds: Vec<SoundCue>,
}

impl GameScreen {
    /// Load a level description and place its objects.
    pub fn load(config: GameConfig, assets: AssetRegistry, level_json: &str) -> Result<Self, LoadError> {
        let level = LevelDescription::from_json(level_json)?;
        let mut tilemap =
            Tilemap::from_description(&level, config.tick_rate)?.with_collision_layer(config.collision_layer);

        if !tilemap.texture_path().is_empty() {
            match assets.texture(tilemap.texture_path()) {
                Some(texture) => tilemap.set_texture(texture),
                None => log::warn!("tileset texture '{}' is not registered", tilemap.texture_path()),
            }
        }

        let mut camera = Camera::new(config.screen_width, config.screen_height)
            .with_speed(config.camera_speed)
            .with_seed(config.seed);
        let (top_left, bottom_right) = tilemap.camera_border(config.screen());
        camera.set_border(top_left, bottom_right);

        let mut objects = ObjectSet::new(config.seed);
        for spawn in &level.spawns {
            match *spawn {
                SpawnDescription::BreakableBlock { x, y, drops_ring } => {
                    objects.spawn_breakable_block(&assets, Vec2::new(x, y), drops_ring);
                }
                SpawnDescription::Walker { x, y, range, direction } => {
                    objects.spawn_walker(&assets, Vec2::new(x, y), range, direction);
                }
                SpawnDescription::Ring { x, y } => {
                    objects.spawn_ring(&assets, Vec2::new(x, y));
                }
                SpawnDescription::MechaGolem => {
                    objects.spawn_mecha_golem(&assets, &config);
                }
                SpawnDescription::Unsupported => log::warn!("skipping spawn of unsupported kind"),
            }
        }
        for command in objects.take_camera_commands() {
            camera.apply(command);
        }

        log::info!(
            "level loaded: {}x{} tiles, {} layers, {} spawns",
            tilemap.width(),
            tilemap.height(),
            tilemap.layer_count(),
            level.spawns.len()
        );

        let clock = FrameClock::new(config.tick_rate, config.max_ticks_per_frame);
        Ok(Self {
            config,
            assets,
            tilemap,
            camera,
            objects,
            clock,
            sounds: Vec::new(),
        })
    }

    /// Run one frame of `frame_seconds` wall-clock time.
    pub fn update(&mut self, frame_seconds: f32, character: &CharacterState) {
        let elapsed = self.clock.advance(frame_seconds);
        self.tilemap.update(elapsed);

        let links = Links {
            tilemap: &self.tilemap,
            camera: &self.camera,
            character,
            assets: &self.assets,
            config: &self.config,
        };
        self.objects.update(links, elapsed);

        for command in self.objects.take_camera_commands() {
            self.camera.apply(command);
        }
        self.sounds.extend(self.objects.take_sounds());

        self.camera.follow(character.position - self.config.screen() / 2.0);
        self.camera.update(elapsed);
    }

    /// Emit the frame back to front. `draw_character` runs between the
    /// objects behind the character and those in front of it.
    pub fn draw(&mut self, list: &mut DrawList, draw_character: impl FnOnce(&mut DrawContext)) {
        let mut ctx = DrawContext::new(&self.camera, self.clock.elapsed(), list);
        let layers = self.tilemap.layer_count();
        let background = BACKGROUND_LAYERS.min(layers);

        for layer in 0..background {
            self.tilemap.draw(layer, &mut ctx);
        }
        self.objects.draw(DrawPriority::Behind, &mut ctx);
        draw_character(&mut ctx);
        self.objects.draw(DrawPriority::Front, &mut ctx);
        for layer in background..layers {
            self.tilemap.draw(layer, &mut ctx);
        }
    }

    /// Collision bits for a host-side query against the tilemap and every
    /// object. Half-solid tiles report their own bit but never block.
    pub fn check_collision(&self, character: &CharacterState, hitbox: &Polygon) -> CollisionFlags {
        self.objects.check_collision(&self.links(character), hitbox)
    }

    /// Collision bits for the character's own movement. `top` is the bottom
    /// of the character before the move: half-solid tiles whose top is at or
    /// below it block like solid ones.
    pub fn check_character_collision(
        &self,
        character: &CharacterState,
        hitbox: &Polygon,
        top: f32,
    ) -> CollisionFlags {
        self.objects
            .check_collision_with_top(&self.links(character), hitbox, top)
    }

    fn links<'a>(&'a self, character: &'a CharacterState) -> Links<'a> {
        Links {
            tilemap: &self.tilemap,
            camera: &self.camera,
            character,
            assets: &self.assets,
            config: &self.config,
        }
    }

    /// Sound cues requested since the last call, in request order.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectSet {
        &mut self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::SoundChannel;
    use crate::objects::{ExplosionKind, GolemState, MechaGolemBomb, Object};
    use crate::renderer::instance::DrawCommand;

    const FRAME: f32 = 1.0 / 60.0;

    /// 20x10 map of 16px tiles: one tile in the top-left corner of the back
    /// and front layers, a floor row and a half-solid platform at
    /// (80, 80)..(96, 96) on the collision layer.
    fn level(spawns: &str) -> String {
        let mut floor = vec![0u32; 200];
        for cell in &mut floor[180..] {
            *cell = 1;
        }
        floor[5 * 20 + 5] = 2;
        let mut corner = vec![0u32; 200];
        corner[0] = 2;
        let join = |data: &[u32]| data.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",");
        format!(
            r#"{{ "width": 20, "height": 10, "tilewidth": 16, "tileheight": 16,
                 "tilesets": [{{ "tilecount": 2, "tilewidth": 16, "tileheight": 16, "image": "tiles.png",
                    "tiles": [
                        {{ "id": 0, "objectgroup": {{ "objects": [
                            {{ "x": 0, "y": 0, "width": 16, "height": 16 }} ] }} }},
                        {{ "id": 1, "objectgroup": {{ "objects": [
                            {{ "x": 0, "y": 0, "width": 16, "height": 16,
                               "properties": [{{ "name": "type", "value": 1 }}] }} ] }} }}] }}],
                 "layers": [
                    {{ "id": 3, "data": [{corner}] }},
                    {{ "id": 1, "data": [{corner}] }},
                    {{ "id": 2, "data": [{floor}] }} ],
                 "spawns": [{spawns}] }}"#,
            corner = join(&corner),
            floor = join(&floor),
        )
    }

    fn assets() -> AssetRegistry {
        let mut assets = AssetRegistry::new();
        assets.register_texture("tiles.png", 32, 16);
        assets.register_texture("objects/explosion.png", 96, 16);
        assets
    }

    fn character_at(position: Vec2) -> CharacterState {
        CharacterState::new(position, Polygon::rectangle(position, position + Vec2::new(16.0, 32.0)))
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = GameConfig::from_json(r#"{ "screen_width": 320, "seed": 7 }"#).unwrap();
        assert_eq!(config.screen_width, 320.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.screen_height, 144.0);
        assert_eq!(config.collision_layer, 1);
        assert!(GameConfig::from_json("{ nope").is_err());
    }

    #[test]
    fn load_sets_up_tilemap_and_spawns() {
        let json = level(
            r#"{ "kind": "breakable_block", "x": 64, "y": 128, "drops_ring": true },
               { "kind": "ring", "x": 100, "y": 100 }"#,
        );
        let screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        assert_eq!(screen.tilemap().layer_count(), 3);
        assert_eq!(screen.tilemap().collision_layer(), 1);
        assert_eq!(screen.objects().pending_count(), 2);
        // Floor lives on the layer with id 2, the collision layer.
        let floor = Polygon::rectangle(Vec2::new(0.0, 150.0), Vec2::new(8.0, 152.0));
        let flags = screen.check_collision(&CharacterState::default(), &floor);
        assert!(flags.contains(CollisionFlags::SOLID));
    }

    #[test]
    fn unsupported_spawns_are_skipped() {
        let json = level(
            r#"{ "kind": "hover_pod", "x": 384, "y": 160, "range": 272, "direction": true },
               { "kind": "ring", "x": 100, "y": 100 }"#,
        );
        let screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        assert_eq!(screen.objects().pending_count(), 1);
    }

    #[test]
    fn character_lands_on_half_solid_only_from_above() {
        let json = level("");
        let screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let character = CharacterState::default();
        let feet = Polygon::rectangle(Vec2::new(84.0, 84.0), Vec2::new(88.0, 88.0));

        let from_above = screen.check_character_collision(&character, &feet, 70.0);
        assert!(from_above.contains(CollisionFlags::SOLID | CollisionFlags::HALF_SOLID));
        let from_below = screen.check_character_collision(&character, &feet, 90.0);
        assert_eq!(from_below, CollisionFlags::HALF_SOLID);
        assert_eq!(screen.check_collision(&character, &feet), CollisionFlags::HALF_SOLID);
    }

    #[test]
    fn load_rejects_broken_levels() {
        let result = GameScreen::load(GameConfig::default(), assets(), r#"{ "width": 2, "height": 2 }"#);
        assert!(matches!(result, Err(LoadError::MissingTileset)));
        assert!(GameScreen::load(GameConfig::default(), assets(), "[]").is_err());
    }

    #[test]
    fn ring_pickup_reaches_host_sounds() {
        let json = level(r#"{ "kind": "ring", "x": 100, "y": 100 }"#);
        let mut screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let character = character_at(Vec2::new(96.0, 90.0));

        for _ in 0..3 {
            screen.update(FRAME, &character);
        }
        let sounds = screen.take_sounds();
        assert!(sounds.iter().any(|cue| cue.channel == SoundChannel::Sfx1));
        assert_eq!(screen.objects().live_count(), 0);
        assert!(screen.take_sounds().is_empty());
    }

    #[test]
    fn camera_follows_character_within_border() {
        let json = level("");
        let mut screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let character = character_at(Vec2::new(150.0, 120.0));
        for _ in 0..60 {
            screen.update(FRAME, &character);
        }
        // Map is 320x160, screen 256x144: the border stops y at 16.
        let position = screen.camera().position();
        assert!((position.x - 22.0).abs() < 1e-3, "{position}");
        assert!((position.y - 16.0).abs() < 1e-3, "{position}");

        let far = character_at(Vec2::new(310.0, 0.0));
        for _ in 0..60 {
            screen.update(FRAME, &far);
        }
        assert!((screen.camera().position().x - 64.0).abs() < 1e-3);
    }

    #[test]
    fn boss_spawn_locks_camera_on_arena() {
        let json = level(r#"{ "kind": "mecha_golem" }"#);
        let mut screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let character = character_at(Vec2::new(200.0, 112.0));
        for _ in 0..40 {
            screen.update(FRAME, &character);
        }
        assert!(screen.camera().is_locked());
        assert_eq!(screen.camera().position(), Vec2::new(128.0, 0.0));
        let boss = screen.objects().live().find_map(|o| match o {
            Object::MechaGolem(golem) => Some(golem.state()),
            _ => None,
        });
        assert_eq!(boss, Some(GolemState::Wait));
    }

    #[test]
    fn draw_interleaves_character_between_priorities() {
        let json = level("");
        let mut screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let assets = screen.assets().clone();
        screen
            .objects_mut()
            .spawn_explosion(&assets, Vec2::new(40.0, 40.0), 0.0, ExplosionKind::Neutral);
        screen.update(FRAME, &CharacterState::default());

        let mut list = DrawList::new();
        screen.draw(&mut list, |ctx| {
            ctx.list.push(DrawCommand {
                texture: 999,
                ..Default::default()
            });
        });

        let textures: Vec<u32> = list.commands().iter().map(|c| c.texture).collect();
        let tiles = assets.texture("tiles.png").unwrap().id.0;
        let explosion = assets.texture("objects/explosion.png").unwrap().id.0;
        let character = textures.iter().position(|&t| t == 999).unwrap();
        let blast = textures.iter().position(|&t| t == explosion).unwrap();
        let last_tile = textures.iter().rposition(|&t| t == tiles).unwrap();
        let first_tile = textures.iter().position(|&t| t == tiles).unwrap();
        assert!(first_tile < character);
        assert!(character < blast);
        assert!(blast < last_tile);
    }

    #[test]
    fn falling_bomb_shakes_camera() {
        let json = level("");
        let mut screen = GameScreen::load(GameConfig::default(), assets(), &json).unwrap();
        let bomb = MechaGolemBomb::new(screen.assets(), Vec2::new(100.0, 100.0));
        screen.objects_mut().spawn(bomb);

        let mut shaken = false;
        for _ in 0..60 {
            screen.update(FRAME, &CharacterState::default());
            if screen.camera().is_shaking() {
                shaken = true;
                break;
            }
        }
        assert!(shaken);
    }
}
