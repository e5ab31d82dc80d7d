//! Data-driven game balance
//!
//! Every gameplay constant that a designer might want to tweak lives here.
//! Defaults reproduce the shipped balance; a JSON file can override any
//! subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::StoreError;

/// Gameplay balance parameters. Physics values are per tick at 60 Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Distance of the ground line from the bottom of the arena
    pub ground_margin: f32,

    // === Player physics ===
    pub gravity: f32,
    pub player_speed: f32,
    /// Upward impulse applied on jump (negative = up)
    pub jump_impulse: f32,

    // === Resources ===
    pub energy_regen: f32,
    /// Energy regen while the infinite-energy power-up is active
    pub infinite_energy_regen: f32,
    pub ray_base_cost: f32,
    pub ray_cost_per_level: f32,
    pub ray_min_cost: f32,
    /// Time since the last hit before the shield starts regenerating
    pub shield_regen_delay_ms: f64,

    // === Waves ===
    pub level_duration_secs: u32,
    pub spawn_rate_base: f32,
    pub spawn_rate_per_level: f32,
    /// Every Nth level ends with a boss fight instead of a timeout
    pub boss_every: u32,
    pub boss_attack_ticks: u32,

    // === Power-ups ===
    pub power_up_drop_chance: f32,
    pub power_up_ticks: u32,
    pub power_up_lifetime_ticks: u32,
    pub heal_amount: f32,
    pub plasma_splash_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 1280.0,
            arena_height: 720.0,
            ground_margin: 100.0,

            gravity: 0.5,
            player_speed: 5.0,
            jump_impulse: -12.0,

            energy_regen: 0.4,
            infinite_energy_regen: 10.0,
            ray_base_cost: 2.5,
            ray_cost_per_level: 0.2,
            ray_min_cost: 0.5,
            shield_regen_delay_ms: 3000.0,

            level_duration_secs: 30,
            spawn_rate_base: 0.015,
            spawn_rate_per_level: 0.005,
            boss_every: 5,
            boss_attack_ticks: 60,

            power_up_drop_chance: 0.2,
            power_up_ticks: 600,
            power_up_lifetime_ticks: 600,
            heal_amount: 50.0,
            plasma_splash_chance: 0.2,
        }
    }
}

impl Tuning {
    /// Y coordinate of the ground line
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.arena_height - self.ground_margin
    }

    /// Per-tick chance of an enemy spawning at the given level
    #[inline]
    pub fn spawn_chance(&self, level: u32) -> f32 {
        self.spawn_rate_base + level as f32 * self.spawn_rate_per_level
    }

    /// Energy drained per tick of holding the ray at a given weapon level
    pub fn ray_cost(&self, weapon_level: u32) -> f32 {
        (self.ray_base_cost - weapon_level as f32 * self.ray_cost_per_level).max(self.ray_min_cost)
    }

    /// Whether this level ends in a boss fight
    #[inline]
    pub fn is_boss_level(&self, level: u32) -> bool {
        self.boss_every > 0 && level > 0 && level % self.boss_every == 0
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file, falling back to defaults if absent or invalid
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Could not read tuning {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
