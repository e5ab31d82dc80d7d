//! Enemy subsystem
//!
//! Walkers spawn just off a horizontal edge and march across the ground.
//! The boss stands still at the right edge and fires volleys on a timer.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Rgb};
use super::collision::explode_at;
use super::pool::EntityId;
use super::power_ups::drop_random;
use super::projectiles::fire_enemy_shot;
use super::state::{BossBrain, Enemy, EnemyKind, GameEvent, GamePhase, GameState};
use super::wave::open_shop;
use crate::consts::ENEMY_BASE_DAMAGE;

/// Walkers this far past the far edge are culled without reward
const CULL_MARGIN: f32 = 100.0;
/// Death burst
const DEATH_BLAST_RADIUS: f32 = 30.0;
const DEATH_BLAST_POWER: f32 = 0.5;
const BOSS_BASE_HEALTH: f32 = 5000.0;
const BOSS_SHOT_SPEED: f32 = 8.0;
const BOSS_FAST_SHOT_SPEED: f32 = 12.0;

impl EnemyKind {
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Crawler => Vec2::new(35.0, 40.0),
            EnemyKind::FastRunner => Vec2::new(25.0, 30.0),
            EnemyKind::Giant => Vec2::new(60.0, 80.0),
            EnemyKind::Tank => Vec2::new(85.0, 65.0),
            EnemyKind::Boss => Vec2::new(140.0, 160.0),
        }
    }

    /// Score granted on death
    pub fn reward(self) -> u64 {
        match self {
            EnemyKind::Crawler => 15,
            EnemyKind::FastRunner => 25,
            EnemyKind::Giant => 80,
            EnemyKind::Tank => 150,
            EnemyKind::Boss => 5000,
        }
    }

    /// Damage dealt to the player per tick of body overlap
    pub fn contact_damage(self) -> f32 {
        match self {
            EnemyKind::Crawler | EnemyKind::FastRunner => 0.6,
            EnemyKind::Giant => 1.0,
            EnemyKind::Tank => 1.5,
            EnemyKind::Boss => 2.0,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            EnemyKind::Crawler => Rgb(0x7C3AED),
            EnemyKind::FastRunner => Rgb(0xF97316),
            EnemyKind::Giant => Rgb(0x065F46),
            EnemyKind::Tank => Rgb(0x475569),
            EnemyKind::Boss => Rgb(0x991B1B),
        }
    }

    /// Weighted draw from a uniform roll in `[0, 1)`
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.05 {
            EnemyKind::Tank
        } else if roll < 0.15 {
            EnemyKind::Giant
        } else if roll < 0.35 {
            EnemyKind::FastRunner
        } else {
            EnemyKind::Crawler
        }
    }

    fn base_health(self, level: u32) -> f32 {
        let l = level as f32;
        match self {
            EnemyKind::Crawler => 40.0 + 20.0 * l,
            EnemyKind::FastRunner => 30.0 + 10.0 * l,
            EnemyKind::Giant => 300.0 + 50.0 * l,
            EnemyKind::Tank => 600.0 + 100.0 * l,
            EnemyKind::Boss => BOSS_BASE_HEALTH * l / 5.0,
        }
    }
}

/// Walking speed for a freshly spawned enemy
fn walk_speed(kind: EnemyKind, level: u32, rng: &mut impl Rng) -> f32 {
    let l = level as f32;
    match kind {
        EnemyKind::Crawler => (1.5 + rng.random_range(0.0..2.0)) * (1.0 + 0.1 * l),
        EnemyKind::FastRunner => 6.0 + 0.3 * l,
        EnemyKind::Giant => 1.0,
        EnemyKind::Tank => 0.6,
        EnemyKind::Boss => 0.0,
    }
}

/// Per-tick spawn roll
pub fn maybe_spawn(state: &mut GameState) -> Option<EntityId> {
    let chance = state.tuning.spawn_chance(state.wave.level);
    if state.rng.random::<f32>() < chance {
        let kind = EnemyKind::from_roll(state.rng.random());
        let from_left = state.rng.random_bool(0.5);
        spawn_walker(state, kind, from_left)
    } else {
        None
    }
}

/// Spawn a walker just off one edge, heading for the other
pub fn spawn_walker(state: &mut GameState, kind: EnemyKind, from_left: bool) -> Option<EntityId> {
    let level = state.wave.level;
    let size = kind.size();
    let speed = walk_speed(kind, level, &mut state.rng);
    let health = kind.base_health(level);
    let (x, vx) = if from_left {
        (-size.x, speed)
    } else {
        (state.tuning.arena_width, -speed)
    };
    let pos = Vec2::new(x, state.ground_y() - size.y);

    state.enemies.spawn(|id| Enemy {
        id,
        kind,
        body: Body::new(pos, size, kind.color()).with_vel(Vec2::new(vx, 0.0)),
        health,
        max_health: health,
        boss: None,
    })
}

/// Spawn the level's boss on the ground at the right edge
pub fn spawn_boss(state: &mut GameState) -> Option<EntityId> {
    let level = state.wave.level;
    let kind = EnemyKind::Boss;
    let size = kind.size();
    let health = kind.base_health(level);
    let pos = Vec2::new(
        state.tuning.arena_width - size.x,
        state.ground_y() - size.y,
    );
    let attack_timer = state.tuning.boss_attack_ticks;

    let id = state.enemies.spawn(|id| Enemy {
        id,
        kind,
        body: Body::new(pos, size, kind.color()),
        health,
        max_health: health,
        boss: Some(BossBrain {
            pattern: 0,
            attack_timer,
        }),
    })?;
    state.wave.boss = Some(id);
    log::info!("Boss spawned on level {} with {} health", level, health);
    state.events.push(GameEvent::BossSpawned { level });
    Some(id)
}

/// Walk, cull and run boss attack timers
pub fn advance_enemies(state: &mut GameState) {
    let arena_width = state.tuning.arena_width;
    let attack_period = state.tuning.boss_attack_ticks;
    let mut volleys: Vec<(Vec2, u8)> = Vec::new();

    state.enemies.retain(|enemy| {
        enemy.body.integrate();

        if let Some(brain) = &mut enemy.boss {
            brain.attack_timer = brain.attack_timer.saturating_sub(1);
            if brain.attack_timer == 0 {
                volleys.push((enemy.body.center(), brain.pattern));
                brain.pattern = (brain.pattern + 1) % 3;
                brain.attack_timer = attack_period.max(1);
            }
        }

        let vx = enemy.body.vel.x;
        let past_right = vx > 0.0 && enemy.body.pos.x > arena_width + CULL_MARGIN;
        let past_left = vx < 0.0 && enemy.body.right() < -CULL_MARGIN;
        !(past_right || past_left)
    });

    for (origin, pattern) in volleys {
        boss_volley(state, origin, pattern);
    }
}

/// Fire a single boss shot at the player.
///
/// Pattern 0 aims at the player's current center, 1 leads a moving player
/// by the shot's flight time, 2 is a faster aimed shot.
fn boss_volley(state: &mut GameState, origin: Vec2, pattern: u8) {
    let player = &state.player.body;
    let speed = if pattern == 2 {
        BOSS_FAST_SHOT_SPEED
    } else {
        BOSS_SHOT_SPEED
    };
    let mut target = player.center();
    if pattern == 1 {
        let flight_ticks = target.distance(origin) / speed;
        target += player.vel * flight_ticks;
    }
    let aim = target - origin;
    let angle = aim.y.atan2(aim.x);
    let tier = state.wave.level as f32 / state.tuning.boss_every.max(1) as f32;
    let damage = ENEMY_BASE_DAMAGE * tier;

    fire_enemy_shot(state, origin, angle, speed, damage);
}

/// Remove dead enemies, granting each reward exactly once.
///
/// Death bursts can push neighbors below zero; those are collected on the
/// next call.
pub fn resolve_deaths(state: &mut GameState) {
    let mut dead: Vec<(EntityId, EnemyKind, Vec2)> = Vec::new();
    state.enemies.retain(|enemy| {
        if enemy.is_dead() {
            dead.push((enemy.id, enemy.kind, enemy.body.center()));
            false
        } else {
            true
        }
    });

    for (id, kind, center) in dead {
        let reward = kind.reward();
        state.score += reward;
        log::debug!("{:?} {} killed (+{})", kind, id.0, reward);
        state.events.push(GameEvent::EnemyKilled { id, kind, reward });

        let drops = kind == EnemyKind::Boss
            || state.rng.random::<f32>() < state.tuning.power_up_drop_chance;
        if drops {
            drop_random(state, center);
        }
        explode_at(state, center, DEATH_BLAST_RADIUS, DEATH_BLAST_POWER);

        if state.wave.boss == Some(id) {
            state.wave.boss = None;
            let level = state.wave.level;
            log::info!("Boss defeated on level {}", level);
            state.events.push(GameEvent::BossDefeated { level });
            if state.wave.phase == GamePhase::BossFight {
                open_shop(state);
            }
        }
    }
}
