//! Game state and core simulation types
//!
//! `GameState` is the single owned aggregate the tick mutates. Nothing else
//! holds a reference into it between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Rgb};
use super::pool::{EntityId, Pool, Pooled};
use super::weapons::{Upgrades, WeaponKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Wave/shop phase. Pause is tracked separately in `WaveState::paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Timed wave in progress
    Playing,
    /// Timer ran out on a boss level; held at 0 until the boss dies
    BossFight,
    /// Between waves, spending score on upgrades
    Shop,
    /// Player died
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Heal,
    DoubleDamage,
    ShieldRefill,
    InfiniteEnergy,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Heal,
        PowerUpKind::DoubleDamage,
        PowerUpKind::ShieldRefill,
        PowerUpKind::InfiniteEnergy,
    ];

    pub fn color(self) -> Rgb {
        match self {
            PowerUpKind::Heal => Rgb(0x22C55E),
            PowerUpKind::DoubleDamage => Rgb(0xEF4444),
            PowerUpKind::ShieldRefill => Rgb(0x3B82F6),
            PowerUpKind::InfiniteEnergy => Rgb(0x22D3EE),
        }
    }
}

/// Timed buff currently applied to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub ticks_left: u32,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub shield: f32,
    pub energy: f32,
    pub weapon: WeaponKind,
    pub airborne: bool,
    pub facing_right: bool,
    /// Single source of truth for multipliers, caps and weapon mastery
    pub upgrades: Upgrades,
    pub power_up: Option<ActivePowerUp>,
    /// Sim clock of the most recent damage taken
    pub last_hit_ms: Option<f64>,
    /// Sim clock of the last accepted shot, per weapon
    pub last_shot_ms: [Option<f64>; 7],
    /// Jump input on the previous tick (for edge detection)
    pub jump_held: bool,
}

impl Player {
    pub fn new(spawn_x: f32) -> Self {
        let upgrades = Upgrades::default();
        Self {
            body: Body::new(
                Vec2::new(spawn_x - PLAYER_WIDTH / 2.0, PLAYER_SPAWN_Y),
                Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                Rgb::PLAYER_YELLOW,
            ),
            health: upgrades.health_max,
            shield: upgrades.shield_max,
            energy: upgrades.energy_max,
            weapon: WeaponKind::BrickGun,
            airborne: true,
            facing_right: true,
            upgrades,
            power_up: None,
            last_hit_ms: None,
            last_shot_ms: [None; 7],
            jump_held: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_up.is_some_and(|p| p.kind == kind)
    }

    pub fn health_pct(&self) -> f32 {
        pct(self.health, self.upgrades.health_max)
    }

    pub fn shield_pct(&self) -> f32 {
        pct(self.shield, self.upgrades.shield_max)
    }

    pub fn energy_pct(&self) -> f32 {
        pct(self.energy, self.upgrades.energy_max)
    }

    /// Pull every resource back into `[0, cap]`
    pub fn clamp_resources(&mut self) {
        let up = &self.upgrades;
        self.health = self.health.clamp(0.0, up.health_max);
        self.shield = self.shield.clamp(0.0, up.shield_max);
        self.energy = self.energy.clamp(0.0, up.energy_max);
    }
}

fn pct(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max * 100.0).clamp(0.0, 100.0)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Crawler,
    Giant,
    FastRunner,
    Tank,
    Boss,
}

/// Boss attack state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossBrain {
    /// Which volley comes next (cycles 0..3)
    pub pattern: u8,
    /// Live ticks until the next volley
    pub attack_timer: u32,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    pub boss: Option<BossBrain>,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

impl Pooled for Enemy {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shooter {
    Player(WeaponKind),
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub shooter: Shooter,
    pub body: Body,
    pub damage: f32,
    /// Remaining ticks; removed at 0
    pub life: i32,
    /// Remaining ground bounces for bouncing projectiles
    pub bounces: Option<u32>,
    pub piercing: bool,
}

impl Projectile {
    pub fn from_enemy(&self) -> bool {
        self.shooter == Shooter::Enemy
    }

    pub fn weapon(&self) -> Option<WeaponKind> {
        match self.shooter {
            Shooter::Player(kind) => Some(kind),
            Shooter::Enemy => None,
        }
    }

    /// Stays alive after hitting an enemy
    pub fn survives_hit(&self) -> bool {
        self.piercing || self.bounces.is_some()
    }
}

impl Pooled for Projectile {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A pickup lying on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub body: Body,
    pub life: u32,
}

impl Pooled for PowerUp {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Cosmetic debris (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub life: u32,
    pub max_life: u32,
    pub rotation: f32,
    pub rotation_vel: f32,
}

impl Particle {
    /// Remaining life as 0..1, for fading
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Ray beam drawn this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayBeam {
    pub origin: Vec2,
    pub angle: f32,
    pub half_width: f32,
}

/// Level counter and the wave/shop state machine fields.
///
/// This is the only part of the state the one-second countdown touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// 1-based level
    pub level: u32,
    /// Whole seconds left in the wave
    pub time_left: u32,
    pub phase: GamePhase,
    pub paused: bool,
    /// Boss spawned for the current boss fight
    pub boss: Option<EntityId>,
}

impl WaveState {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            level: 1,
            time_left: duration_secs,
            phase: GamePhase::Playing,
            paused: false,
            boss: None,
        }
    }

    /// Whether gameplay advances this tick
    pub fn is_live(&self) -> bool {
        !self.paused && matches!(self.phase, GamePhase::Playing | GamePhase::BossFight)
    }

    pub fn is_shop_open(&self) -> bool {
        self.phase == GamePhase::Shop
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WeaponFired(WeaponKind),
    WeaponSwitched(WeaponKind),
    EnemyKilled {
        id: EntityId,
        kind: EnemyKind,
        reward: u64,
    },
    Explosion {
        pos: Vec2,
        radius: f32,
    },
    PlayerHit {
        damage: f32,
    },
    PowerUpCollected(PowerUpKind),
    BossSpawned {
        level: u32,
    },
    BossDefeated {
        level: u32,
    },
    ShopOpened {
        level: u32,
    },
    LevelStarted {
        level: u32,
    },
    PauseToggled {
        paused: bool,
    },
    GameOver {
        score: u64,
    },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub wave: WaveState,
    pub score: u64,
    /// Live ticks elapsed
    pub time_ticks: u64,
    /// Sim clock in milliseconds (advances only on live ticks)
    pub clock_ms: f64,
    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub power_ups: Pool<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Pool<Particle>,
    /// Last recorded pointer position; `None` until the first pointer event
    pub pointer: Option<Vec2>,
    /// Ray beam fired this tick, if any
    pub ray: Option<RayBeam>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Pause input on the previous tick (for edge detection)
    pub pause_held: bool,
}

/// Default particle cap when no quality setting is supplied
pub const MAX_PARTICLES: usize = 500;

impl GameState {
    /// Create a new game state with the given seed and balance
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_particle_cap(seed, tuning, MAX_PARTICLES)
    }

    pub fn with_particle_cap(seed: u64, tuning: Tuning, max_particles: usize) -> Self {
        let player = Player::new(tuning.arena_width / 2.0);
        let wave = WaveState::new(tuning.level_duration_secs);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            wave,
            score: 0,
            time_ticks: 0,
            clock_ms: 0.0,
            player,
            enemies: Pool::new(),
            projectiles: Pool::new(),
            power_ups: Pool::new(),
            particles: Pool::bounded(max_particles),
            pointer: None,
            ray: None,
            events: Vec::new(),
            pause_held: false,
            tuning,
        }
    }

    /// Reset to a fresh run, keeping seed stream, balance and particle cap
    pub fn reset(&mut self) {
        let max_particles = self.particles.capacity().unwrap_or(MAX_PARTICLES);
        let seed = self.seed.wrapping_add(1);
        *self = Self::with_particle_cap(seed, self.tuning.clone(), max_particles);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.tuning.ground_y()
    }

    pub fn is_game_over(&self) -> bool {
        self.wave.phase == GamePhase::GameOver
    }
}
