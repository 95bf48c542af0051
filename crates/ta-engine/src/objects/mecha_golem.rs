//! Armored boss: a walking golem with a detachable arm.
//!
//! Behavior is a state machine. Each state has an update handler that
//! advances the state timer and returns the next state when its time is up;
//! [`MechaGolem::enter`] performs the entry actions of that state. Movement
//! is scripted from `timer / duration` through easing curves.

use glam::Vec2;

use crate::api::game::GameConfig;
use crate::api::types::{CameraCommand, SoundChannel, SoundCue};
use crate::assets::registry::AssetRegistry;
use crate::components::sprite::Sprite;
use crate::core::collision::CollisionFlags;
use crate::core::geometry::Polygon;
use crate::extensions::easing::{lerp_vec2, step_arc, swing, Easing};
use crate::objects::{Explosion, ExplosionKind, GameObject, Hitbox, MechaGolemBomb, ObjectContext};
use crate::renderer::instance::DrawContext;

const HEALTH: u32 = 10;
const PHASE_CHANGE_HEALTH: u32 = 8;

const WAIT_TIME: f32 = 60.0;
const GO_TIME: f32 = 60.0;
const GO_DISTANCE: f32 = 32.0;
const GO_BORDER: f32 = 16.0;
const STEP_HEIGHT: f32 = 8.0;
const ARM_MOVE_TIME: f32 = 30.0;
const ARM_MOVE_MAX_DISTANCE: f32 = 96.0;
const PHASE_CHANGE_TIME: f32 = 180.0;
const PHASE_CHANGE_EXPLOSION_INTERVAL: usize = 6;
const ARM_BITE1_TIME: f32 = 30.0;
const ARM_BITE2_TIME: f32 = 20.0;
const ARM_BITE3_TIME: f32 = 40.0;
const ARM_BITE4_TIME: f32 = 30.0;
const INVINCIBLE_TIME: f32 = 60.0;
const DAMAGE_FLASH_TIME: f32 = 3.0;
const BITE_SHAKE: f32 = 24.0;

/// Left edge of the boss arena; the camera locks here.
const ARENA_X: f32 = 128.0;
const ARENA_FLOOR: f32 = 112.0;
const BODY_WIDTH: f32 = 56.0;
/// Spawn offset from the right edge of the arena.
const START_OFFSET: f32 = 61.0;
const BOMB_Y: f32 = -34.0;

/// Arm anchors relative to the golem position.
const ARM_REST: Vec2 = Vec2::new(-11.0, -42.0);
const ARM_TARGETS: [Vec2; 3] = [
    Vec2::new(-11.0, -82.0),
    Vec2::new(-51.0, -42.0),
    Vec2::new(-43.0, -74.0),
];
const ARM_RAISED: Vec2 = Vec2::new(-11.0, -82.0);
const BITE_END: Vec2 = Vec2::new(-32.0, -15.0);

const HIT_SOUND: SoundCue = SoundCue::new(SoundChannel::Sfx3, "sound/hit.ogg");
const BOSS_MUSIC: SoundCue = SoundCue::new(SoundChannel::Music, "music/boss.ogg");

const HITBOX_WALL_LEFT: usize = 0;
const HITBOX_WALL_RIGHT: usize = 1;
const HITBOX_BODY: usize = 2;
const HITBOX_WEAK: usize = 3;
const HITBOX_ARM: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GolemState {
    /// Waiting for the camera to settle on the arena.
    Idle,
    Wait,
    GoLeft,
    GoRight,
    ArmMove,
    ArmMoveBack,
    PhaseChange,
    ArmBite1,
    ArmBite2,
    ArmBite3,
    ArmBite4,
}

impl GolemState {
    fn moves_arm(self) -> bool {
        matches!(
            self,
            GolemState::ArmMove
                | GolemState::ArmMoveBack
                | GolemState::ArmBite1
                | GolemState::ArmBite2
                | GolemState::ArmBite3
                | GolemState::ArmBite4
        )
    }

    fn is_walking(self) -> bool {
        matches!(self, GolemState::GoLeft | GolemState::GoRight)
    }
}

#[derive(Debug, Clone)]
pub struct MechaGolem {
    head: Sprite,
    head_flash: Sprite,
    body: Sprite,
    left_foot_sprite: Sprite,
    right_foot_sprite: Sprite,
    arm: Sprite,
    arm_part: Sprite,

    position: Vec2,
    arm_position: Vec2,
    arm_target: Vec2,
    left_foot: Vec2,
    right_foot: Vec2,
    start_x: f32,
    screen_width: f32,

    state: GolemState,
    timer: f32,
    invincible_timer: f32,
    health: u32,
    second_phase: bool,
    music_started: bool,
    hitboxes: [Hitbox; 5],
}

impl MechaGolem {
    pub fn new(assets: &AssetRegistry, config: &GameConfig) -> Self {
        let head = assets.load_animated_sprite(
            "objects/mecha_golem/head.png",
            Some((24, 32)),
            "objects/mecha_golem/head",
        );
        let head_flash = assets.load_sprite("objects/mecha_golem/head.png", Some((24, 32)));
        let body = assets.load_sprite("objects/mecha_golem/body.png", None);
        let left_foot_sprite = assets.load_sprite("objects/mecha_golem/feet.png", Some((16, 11)));
        let mut right_foot_sprite = assets.load_sprite("objects/mecha_golem/feet.png", Some((16, 11)));
        right_foot_sprite.set_frame(1);
        let arm = assets.load_animated_sprite(
            "objects/mecha_golem/arm.png",
            Some((16, 16)),
            "objects/mecha_golem/arm",
        );
        let arm_part = assets.load_sprite("objects/mecha_golem/arm_part.png", None);

        let screen_width = config.screen_width;
        let position = Vec2::new(ARENA_X + screen_width - START_OFFSET, ARENA_FLOOR);
        let mut golem = Self {
            head,
            head_flash,
            body,
            left_foot_sprite,
            right_foot_sprite,
            arm,
            arm_part,
            position,
            arm_position: position + ARM_REST,
            arm_target: position + ARM_REST,
            left_foot: Vec2::ZERO,
            right_foot: Vec2::ZERO,
            start_x: position.x,
            screen_width,
            state: GolemState::Idle,
            timer: 0.0,
            invincible_timer: INVINCIBLE_TIME,
            health: HEALTH,
            second_phase: false,
            music_started: false,
            hitboxes: Default::default(),
        };
        golem.rest_feet();
        golem.update_hitboxes();
        golem
    }

    /// Camera position that frames the arena.
    pub fn arena_camera_position(&self) -> Vec2 {
        Vec2::new(ARENA_X, 0.0)
    }

    pub fn state(&self) -> GolemState {
        self.state
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_second_phase(&self) -> bool {
        self.second_phase
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn arm_position(&self) -> Vec2 {
        self.arm_position
    }

    /// Hitbox that takes damage from explosions and the hammer.
    pub fn weak_point(&self) -> &Polygon {
        &self.hitboxes[HITBOX_WEAK].shape
    }

    fn enter(&mut self, next: GolemState, ctx: &mut ObjectContext) {
        log::debug!("mecha golem: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.timer = 0.0;

        match next {
            GolemState::Wait if !self.music_started => {
                self.music_started = true;
                ctx.play_sound(BOSS_MUSIC);
            }
            GolemState::GoLeft | GolemState::GoRight => {
                self.start_x = self.position.x;
                if next == GolemState::GoRight {
                    self.head.play("turn_back");
                }
            }
            GolemState::ArmMove => {
                self.arm_target = optimal_arm_target(self.position, ctx.character_position());
                self.arm.play("attack");
            }
            GolemState::PhaseChange => {
                self.second_phase = true;
                log::debug!("mecha golem: second phase");
                let origin = self.position + Vec2::new(5.0, -56.0);
                let duration = (PHASE_CHANGE_TIME * 2.0 / 3.0) as usize;
                for delay in (0..duration).step_by(PHASE_CHANGE_EXPLOSION_INTERVAL) {
                    let jitter = Vec2::new(ctx.rng.next_int(8) as f32, ctx.rng.next_int(16) as f32);
                    let explosion =
                        Explosion::new(ctx.assets(), origin + jitter, delay as f32, ExplosionKind::Neutral);
                    ctx.spawn(explosion);
                }
            }
            GolemState::ArmBite3 => {
                self.arm_position = self.position + BITE_END;
                ctx.camera_command(CameraCommand::Shake(BITE_SHAKE));
                let bomb_position = Vec2::new(ctx.character_position().x - 8.0, BOMB_Y);
                ctx.spawn(MechaGolemBomb::new(ctx.assets(), bomb_position));
            }
            _ => {}
        }
    }

    fn update_idle(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        ctx.camera().is_locked().then_some(GolemState::Wait)
    }

    fn update_wait(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer < WAIT_TIME {
            return None;
        }

        let next = if !self.second_phase {
            let distance = ctx.character_position().distance(self.position + ARM_REST);
            if distance < ARM_MOVE_MAX_DISTANCE && ctx.rng.next_int(3) != 0 {
                GolemState::ArmMove
            } else {
                self.choose_direction(ctx)
            }
        } else if ctx.rng.next_int(2) == 0 {
            self.choose_direction(ctx)
        } else {
            GolemState::ArmBite1
        };
        Some(next)
    }

    /// Walk away from the screen edges, otherwise usually toward the
    /// character.
    fn choose_direction(&self, ctx: &mut ObjectContext) -> GolemState {
        let camera_x = ctx.camera().position().x;
        if self.position.x < camera_x + GO_BORDER {
            GolemState::GoRight
        } else if self.position.x > camera_x + self.screen_width - GO_BORDER - BODY_WIDTH {
            GolemState::GoLeft
        } else {
            let toward_right = self.position.x + BODY_WIDTH / 2.0 < ctx.character_position().x;
            let contrary = ctx.rng.next_int(4) == 0;
            if toward_right != contrary {
                GolemState::GoRight
            } else {
                GolemState::GoLeft
            }
        }
    }

    fn update_go(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        let direction = if self.state == GolemState::GoLeft { -1.0 } else { 1.0 };
        let distance = GO_DISTANCE * direction;
        self.timer += ctx.elapsed;

        if self.timer > GO_TIME {
            if self.state == GolemState::GoRight {
                self.head.play("turn_forward");
            }
            self.position.x = self.start_x + distance;
            return Some(GolemState::Wait);
        }

        self.position.x = self.start_x + distance * (self.timer / GO_TIME);

        // One foot per half of the walk, each lifted along an arc.
        let half = GO_TIME / 2.0;
        let first_half = self.timer < half;
        let t = if first_half { self.timer / half } else { (self.timer - half) / half };
        let x = self.start_x + Easing::SineInOut.apply(t) * distance;
        let lift = step_arc(t) * STEP_HEIGHT;
        let ground = self.position.y - 10.0;
        let moving_left_foot = first_half == (direction < 0.0);

        if moving_left_foot {
            self.left_foot = Vec2::new(x + 5.0, ground - lift);
            let right_x = if first_half { self.start_x } else { self.start_x + distance };
            self.right_foot = Vec2::new(right_x + 26.0, ground);
        } else {
            let left_x = if first_half { self.start_x } else { self.start_x + distance };
            self.left_foot = Vec2::new(left_x + 5.0, ground);
            self.right_foot = Vec2::new(x + 26.0, ground - lift);
        }
        None
    }

    fn update_arm_move(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > ARM_MOVE_TIME {
            return Some(GolemState::ArmMoveBack);
        }
        let rest = self.position + ARM_REST;
        self.arm_position = lerp_vec2(rest, self.arm_target, self.timer / ARM_MOVE_TIME);
        None
    }

    fn update_arm_move_back(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > ARM_MOVE_TIME {
            return Some(GolemState::Wait);
        }
        let rest = self.position + ARM_REST;
        self.arm_position = lerp_vec2(self.arm_target, rest, self.timer / ARM_MOVE_TIME);
        None
    }

    fn update_phase_change(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > PHASE_CHANGE_TIME {
            self.head.play("idle2");
            return Some(GolemState::Wait);
        }
        if self.timer > PHASE_CHANGE_TIME / 3.0 {
            self.head.play("laugh");
        }
        None
    }

    fn update_arm_bite1(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > ARM_BITE1_TIME {
            return Some(GolemState::ArmBite2);
        }
        self.arm.play("attack");
        let t = self.timer / ARM_BITE1_TIME;
        self.arm_position = lerp_vec2(self.position + ARM_REST, self.position + ARM_RAISED, t);
        None
    }

    /// Arm swings down onto the floor along a quarter circle, speeding up.
    fn update_arm_bite2(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > ARM_BITE2_TIME {
            return Some(GolemState::ArmBite3);
        }
        self.arm.play("bite");
        let start = self.position + ARM_RAISED;
        let end = self.position + BITE_END;
        self.arm_position = swing(start, end, self.timer / ARM_BITE2_TIME, Easing::QuadIn);
        None
    }

    fn update_arm_bite3(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        (self.timer > ARM_BITE3_TIME).then_some(GolemState::ArmBite4)
    }

    fn update_arm_bite4(&mut self, ctx: &mut ObjectContext) -> Option<GolemState> {
        self.timer += ctx.elapsed;
        if self.timer > ARM_BITE4_TIME {
            return Some(GolemState::Wait);
        }
        let t = self.timer / ARM_BITE4_TIME;
        self.arm_position = lerp_vec2(self.position + BITE_END, self.position + ARM_REST, t);
        None
    }

    fn update_damage(&mut self, ctx: &mut ObjectContext) {
        if self.invincible_timer <= INVINCIBLE_TIME {
            self.invincible_timer += ctx.elapsed;
            return;
        }
        let flags = ctx.check_collision(&self.hitboxes[HITBOX_WEAK].shape);
        if !flags.intersects(CollisionFlags::EXPLOSION_FIRST | CollisionFlags::HAMMER) {
            return;
        }
        ctx.play_sound(HIT_SOUND);
        self.invincible_timer = 0.0;
        self.health = self.health.saturating_sub(1);
    }

    fn update_hitboxes(&mut self) {
        let wall_flags = if self.state == GolemState::Idle {
            CollisionFlags::TRANSPARENT
        } else {
            CollisionFlags::SOLID
        };
        let right_edge = ARENA_X + self.screen_width;
        let p = self.position;
        let a = self.arm_position;

        self.hitboxes[HITBOX_WALL_LEFT] = Hitbox::rectangle(
            Vec2::new(ARENA_X - 16.0, 0.0),
            Vec2::new(ARENA_X, ARENA_FLOOR),
            wall_flags,
        );
        self.hitboxes[HITBOX_WALL_RIGHT] = Hitbox::rectangle(
            Vec2::new(right_edge, 0.0),
            Vec2::new(right_edge + 16.0, ARENA_FLOOR),
            wall_flags,
        );
        self.hitboxes[HITBOX_BODY] =
            Hitbox::rectangle(p + Vec2::new(5.0, -44.0), p + Vec2::new(52.0, -16.0), CollisionFlags::DAMAGE);
        self.hitboxes[HITBOX_WEAK] =
            Hitbox::rectangle(p + Vec2::new(8.0, -55.0), p + Vec2::new(24.0, -42.0), CollisionFlags::DAMAGE);
        self.hitboxes[HITBOX_ARM] =
            Hitbox::rectangle(a + Vec2::new(4.0, 4.0), a + Vec2::new(12.0, 12.0), CollisionFlags::DAMAGE);
    }

    fn rest_feet(&mut self) {
        self.left_foot = self.position + Vec2::new(5.0, -10.0);
        self.right_foot = self.position + Vec2::new(26.0, -10.0);
    }

    fn draw_arm(&mut self, ctx: &mut DrawContext) {
        self.arm.set_position(self.arm_position);
        self.arm.draw(ctx);

        let start = Vec2::new(2.0, -26.0);
        let end = (self.arm_position - self.position) + Vec2::new(4.0, 8.0);
        for part in [0.25, 0.5, 0.75] {
            let offset = lerp_vec2(start, end, part).round();
            self.arm_part.set_position(self.position + offset);
            self.arm_part.draw(ctx);
        }
    }
}

impl GameObject for MechaGolem {
    fn update(&mut self, ctx: &mut ObjectContext) -> bool {
        let phase_change_due = self.health <= PHASE_CHANGE_HEALTH
            && !self.second_phase
            && self.state != GolemState::PhaseChange;

        let next = if phase_change_due {
            Some(GolemState::PhaseChange)
        } else {
            match self.state {
                GolemState::Idle => self.update_idle(ctx),
                GolemState::Wait => self.update_wait(ctx),
                GolemState::GoLeft | GolemState::GoRight => self.update_go(ctx),
                GolemState::ArmMove => self.update_arm_move(ctx),
                GolemState::ArmMoveBack => self.update_arm_move_back(ctx),
                GolemState::PhaseChange => self.update_phase_change(ctx),
                GolemState::ArmBite1 => self.update_arm_bite1(ctx),
                GolemState::ArmBite2 => self.update_arm_bite2(ctx),
                GolemState::ArmBite3 => self.update_arm_bite3(ctx),
                GolemState::ArmBite4 => self.update_arm_bite4(ctx),
            }
        };
        if let Some(next) = next {
            self.enter(next, ctx);
        }

        if !self.state.moves_arm() {
            self.arm_position = self.position + ARM_REST;
            self.arm.play("idle");
        }
        if !self.state.is_walking() {
            self.rest_feet();
        }
        if !self.second_phase {
            self.head.play("idle");
        }

        self.update_damage(ctx);
        self.update_hitboxes();
        true
    }

    fn draw(&mut self, ctx: &mut DrawContext) {
        self.head.set_position(self.position + Vec2::new(5.0, -56.0));
        self.body.set_position(self.position + Vec2::new(0.0, -57.0));
        self.left_foot_sprite.set_position(self.left_foot);
        self.right_foot_sprite.set_position(self.right_foot);
        self.head_flash.set_position(self.head.position);
        let head_frame = self.head.current_frame(ctx.elapsed);
        self.head_flash.set_frame(head_frame + 5);

        self.body.draw(ctx);
        self.head.draw(ctx);
        self.left_foot_sprite.draw(ctx);
        self.right_foot_sprite.draw(ctx);
        self.draw_arm(ctx);

        let flashing = self.invincible_timer < DAMAGE_FLASH_TIME * 4.0
            && (self.invincible_timer / DAMAGE_FLASH_TIME) as u32 % 2 == 0;
        if flashing {
            self.head_flash.draw(ctx);
        }
    }

    fn hitboxes(&self) -> &[Hitbox] {
        &self.hitboxes
    }
}

/// Attack anchor closest to the character.
fn optimal_arm_target(position: Vec2, character: Vec2) -> Vec2 {
    ARM_TARGETS
        .iter()
        .map(|offset| position + *offset)
        .min_by(|a, b| a.distance(character).total_cmp(&b.distance(character)))
        .unwrap_or(position + ARM_REST)
}
