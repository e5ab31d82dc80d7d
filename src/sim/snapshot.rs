//! Read-only per-tick view for rendering and HUD collaborators

use super::state::{
    ActivePowerUp, Enemy, GamePhase, GameState, Particle, Player, PowerUp, Projectile, RayBeam,
};
use super::weapons::WeaponKind;

/// Borrowed view of everything a frame needs to draw
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub health_pct: f32,
    pub shield_pct: f32,
    pub energy_pct: f32,
    pub score: u64,
    pub level: u32,
    pub time_left: u32,
    pub weapon: WeaponKind,
    pub power_up: Option<ActivePowerUp>,
    pub paused: bool,
    pub shop_open: bool,
    pub game_over: bool,
    /// Boss health as 0..1, while a boss is on the field
    pub boss_health: Option<f32>,
    pub ray: Option<RayBeam>,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub power_ups: &'a [PowerUp],
    pub particles: &'a [Particle],
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let player = &state.player;
        let boss_health = state
            .wave
            .boss
            .and_then(|id| state.enemies.find(id))
            .filter(|boss| boss.max_health > 0.0)
            .map(|boss| (boss.health / boss.max_health).clamp(0.0, 1.0));

        Self {
            health_pct: player.health_pct(),
            shield_pct: player.shield_pct(),
            energy_pct: player.energy_pct(),
            score: state.score,
            level: state.wave.level,
            time_left: state.wave.time_left,
            weapon: player.weapon,
            power_up: player.power_up,
            paused: state.wave.paused,
            shop_open: state.wave.is_shop_open(),
            game_over: state.wave.phase == GamePhase::GameOver,
            boss_health,
            ray: state.ray,
            player,
            enemies: state.enemies.as_slice(),
            projectiles: state.projectiles.as_slice(),
            power_ups: state.power_ups.as_slice(),
            particles: state.particles.as_slice(),
        }
    }
}
