//! Cube Siege - a wave-based side-view brick shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, weapons, enemies, collisions, waves)
//! - `session`: Frame/countdown scheduling around a running simulation
//! - `audio`: Fire-and-forget sound cues
//! - `highscores`: Top-5 leaderboard and its file store
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScoreStore, HighScores, StoreError};
pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, physics constants are per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per tick, for the fire-rate and shield-regen clocks
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPAWN_Y: f32 = 300.0;

    /// Base damage of one player shot before multipliers
    pub const PLAYER_BASE_DAMAGE: f32 = 25.0;
    /// Base damage of one enemy shot before boss tier scaling
    pub const ENEMY_BASE_DAMAGE: f32 = 10.0;
    /// Flat damage of an explosion before multipliers
    pub const EXPLOSION_DAMAGE: f32 = 200.0;
    /// Particles spawned by every explosion
    pub const EXPLOSION_PARTICLES: usize = 20;

    /// Vertical restitution of a bouncing projectile
    pub const BOUNCE_RESTITUTION: f32 = 0.7;
    /// Horizontal damping when no direction is held
    pub const MOVE_DAMPING: f32 = 0.8;

    /// Number of entries kept on the leaderboard
    pub const MAX_HIGH_SCORES: usize = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Absolute angular distance between two angles, accounting for wraparound
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Unit direction for an angle
#[inline]
pub fn direction(theta: f32) -> glam::Vec2 {
    glam::Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        // Either side of the seam is acceptable for an odd multiple of π
        assert!(angle_between(normalize_angle(3.0 * PI), PI) < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_wraps() {
        // Just either side of the ±π seam are close together
        assert!(angle_between(PI - 0.01, -PI + 0.01) < 0.03);
        assert!((angle_between(0.0, PI / 2.0) - PI / 2.0).abs() < 1e-6);
    }
}
