//! Owns every object of a level and runs the frame cycle:
//! destroy retired objects, promote pending spawns, update the live set.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::{CameraCommand, CharacterState, ObjectId, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::layer::DrawPriority;
use crate::components::tilemap::Tilemap;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::core::rng::Rng;
use crate::objects::{
    Bomb, BombMode, BreakableBlock, Explosion, ExplosionKind, GameObject, MechaGolem, Object,
    Particle, Ring, Walker,
};
use crate::renderer::camera::Camera;
use crate::renderer::instance::DrawContext;

/// Read-only collaborators of a frame. Owned by the game screen, borrowed by
/// the object set for the duration of one update.
#[derive(Clone, Copy)]
pub struct Links<'a> {
    pub tilemap: &'a Tilemap,
    pub camera: &'a Camera,
    pub character: &'a CharacterState,
    pub assets: &'a AssetRegistry,
    pub config: &'a GameConfig,
}

/// Side effects requested by objects, drained by the owner each frame.
#[derive(Debug, Default)]
pub struct Requests {
    pub spawns: Vec<Object>,
    pub sounds: Vec<SoundCue>,
    pub camera: Vec<CameraCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vacant,
    /// Waiting in the spawn queue.
    Spawned,
    Live,
    /// Retired this frame; still answers collision queries.
    Dying,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    stage: Stage,
    object: Option<Object>,
}

/// What an object sees while it updates.
pub struct ObjectContext<'a> {
    pub links: Links<'a>,
    /// Ticks elapsed this frame.
    pub elapsed: f32,
    pub rng: &'a mut Rng,
    requests: &'a mut Requests,
    slots: &'a [Slot],
}

impl<'a> ObjectContext<'a> {
    /// Queue an object; it becomes live at the start of the next frame.
    pub fn spawn(&mut self, object: impl Into<Object>) {
        self.requests.spawns.push(object.into());
    }

    pub fn play_sound(&mut self, cue: SoundCue) {
        self.requests.sounds.push(cue);
    }

    pub fn camera_command(&mut self, command: CameraCommand) {
        self.requests.camera.push(command);
    }

    pub fn assets(&self) -> &'a AssetRegistry {
        self.links.assets
    }

    pub fn camera(&self) -> &'a Camera {
        self.links.camera
    }

    pub fn character_position(&self) -> Vec2 {
        self.links.character.position
    }

    /// Combined collision bits of the tilemap, the other objects and the
    /// character for `hitbox`. The querying object is not part of the set
    /// while it updates, so it never reports itself.
    pub fn check_collision(&self, hitbox: &Polygon) -> CollisionFlags {
        collide(self.slots, &self.links, hitbox, None)
    }
}

fn collide(slots: &[Slot], links: &Links, hitbox: &Polygon, top: Option<f32>) -> CollisionFlags {
    let mut flags = links.tilemap.check_collision_default(hitbox, top);
    for slot in slots {
        if !matches!(slot.stage, Stage::Live | Stage::Dying) {
            continue;
        }
        if let Some(object) = &slot.object {
            flags |= object.collision(hitbox);
        }
    }
    flags | links.character.collision(hitbox)
}

/// Arena of game objects with deferred spawn and delete queues.
///
/// Every occupied slot is in exactly one stage (spawn queue, live set or
/// delete queue), so an object cannot be destroyed twice.
pub struct ObjectSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: Vec<u32>,
    spawn_queue: Vec<u32>,
    delete_queue: Vec<u32>,
    rng: Rng,
    requests: Requests,
}

impl ObjectSet {
    pub fn new(seed: u64) -> Self {
        Self {
            slots: Vec::with_capacity(256),
            free: Vec::new(),
            live: Vec::with_capacity(256),
            spawn_queue: Vec::new(),
            delete_queue: Vec::new(),
            rng: Rng::new(seed),
            requests: Requests::default(),
        }
    }

    /// Queue `object`. It joins the live set when the next update starts.
    pub fn spawn(&mut self, object: impl Into<Object>) -> ObjectId {
        let object = object.into();
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.stage = Stage::Spawned;
                slot.object = Some(object);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    stage: Stage::Spawned,
                    object: Some(object),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.spawn_queue.push(index);
        ObjectId {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Run one frame: destroy last frame's retired objects, promote pending
    /// spawns, then update every live object.
    pub fn update(&mut self, links: Links, elapsed: f32) {
        for index in self.delete_queue.drain(..) {
            let slot = &mut self.slots[index as usize];
            slot.object = None;
            slot.stage = Stage::Vacant;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(index);
        }

        for index in self.spawn_queue.drain(..) {
            self.slots[index as usize].stage = Stage::Live;
            self.live.push(index);
        }

        let current = std::mem::take(&mut self.live);
        let mut kept = Vec::with_capacity(current.len());
        for index in current {
            let Some(mut object) = self.slots[index as usize].object.take() else {
                continue;
            };
            let alive = {
                let mut ctx = ObjectContext {
                    links,
                    elapsed,
                    rng: &mut self.rng,
                    requests: &mut self.requests,
                    slots: &self.slots,
                };
                object.update(&mut ctx)
            };
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            if alive {
                kept.push(index);
            } else {
                slot.stage = Stage::Dying;
                self.delete_queue.push(index);
            }
        }
        self.live = kept;

        for object in std::mem::take(&mut self.requests.spawns) {
            self.spawn(object);
        }
    }

    /// Draw the live objects of one priority.
    pub fn draw(&mut self, priority: DrawPriority, ctx: &mut DrawContext) {
        for &index in &self.live {
            if let Some(object) = self.slots[index as usize].object.as_mut() {
                if object.draw_priority() == priority {
                    object.draw(ctx);
                }
            }
        }
    }

    /// Collision bits for `hitbox` against the tilemap, the live and
    /// just-retired objects and the character.
    pub fn check_collision(&self, links: &Links, hitbox: &Polygon) -> CollisionFlags {
        collide(&self.slots, links, hitbox, None)
    }

    /// Like [`ObjectSet::check_collision`], landing on half-solid tiles whose
    /// top is at or below `top`.
    pub fn check_collision_with_top(&self, links: &Links, hitbox: &Polygon, top: f32) -> CollisionFlags {
        collide(&self.slots, links, hitbox, Some(top))
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_ref()
    }

    /// Whether `id` is in the live set.
    pub fn is_live(&self, id: ObjectId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && slot.stage == Stage::Live)
    }

    pub fn live(&self) -> impl Iterator<Item = &Object> + '_ {
        self.live
            .iter()
            .filter_map(|&index| self.slots[index as usize].object.as_ref())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pending_count(&self) -> usize {
        self.spawn_queue.len()
    }

    pub fn dying_count(&self) -> usize {
        self.delete_queue.len()
    }

    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.requests.sounds)
    }

    pub fn take_camera_commands(&mut self) -> Vec<CameraCommand> {
        std::mem::take(&mut self.requests.camera)
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    // -- Factories --

    pub fn spawn_explosion(
        &mut self,
        assets: &AssetRegistry,
        position: Vec2,
        delay: f32,
        kind: ExplosionKind,
    ) -> ObjectId {
        self.spawn(Explosion::new(assets, position, delay, kind))
    }

    pub fn spawn_bomb(&mut self, assets: &AssetRegistry, position: Vec2, direction: bool, mode: BombMode) -> ObjectId {
        self.spawn(Bomb::new(assets, position, direction, mode))
    }

    pub fn spawn_breakable_block(&mut self, assets: &AssetRegistry, position: Vec2, drops_ring: bool) -> ObjectId {
        self.spawn(BreakableBlock::new(assets, position, drops_ring))
    }

    pub fn spawn_ring(&mut self, assets: &AssetRegistry, position: Vec2) -> ObjectId {
        self.spawn(Ring::new(assets, position, Vec2::ZERO).with_expiry(false))
    }

    pub fn spawn_walker(&mut self, assets: &AssetRegistry, position: Vec2, range: f32, direction: bool) -> ObjectId {
        self.spawn(Walker::new(assets, position, range, direction))
    }

    pub fn spawn_particle(
        &mut self,
        assets: &AssetRegistry,
        path: &str,
        position: Vec2,
        velocity: Vec2,
        delta: Vec2,
    ) -> ObjectId {
        self.spawn(Particle::new(assets, path, position, velocity, delta))
    }

    /// Spawn the boss and lock the camera onto its arena.
    pub fn spawn_mecha_golem(&mut self, assets: &AssetRegistry, config: &GameConfig) -> ObjectId {
        let golem = MechaGolem::new(assets, config);
        self.requests.camera.push(CameraCommand::Lock(golem.arena_camera_position()));
        self.spawn(golem)
    }
}

impl Default for ObjectSet {
    fn default() -> Self {
        Self::new(42)
    }
}
