//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order within each pool
//! - No rendering, audio or file I/O

pub mod body;
pub mod collision;
pub mod enemies;
pub mod particles;
pub mod player;
pub mod pool;
pub mod power_ups;
pub mod projectiles;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;
pub mod weapons;

pub use body::{Body, Rgb};
pub use collision::explode_at;
pub use pool::{EntityId, Pool};
pub use projectiles::FireOutcome;
pub use shop::{GlobalUpgrade, PurchaseOutcome, buy_global, buy_weapon};
pub use snapshot::Snapshot;
pub use state::{
    Enemy, EnemyKind, GameEvent, GamePhase, GameState, Particle, Player, PowerUp, PowerUpKind,
    Projectile, Shooter, WaveState,
};
pub use tick::{TickInput, tick};
pub use wave::{WaveTransition, countdown_second, next_level};
pub use weapons::{Upgrades, WeaponKind, WeaponStats};
