//! Weapon catalog and the upgrade model
//!
//! Every weapon has a fixed base fire limit and a per-run `WeaponStats`
//! record. The "special value" is the one weapon-specific tunable:
//!
//! | Weapon        | Special value          |
//! |---------------|------------------------|
//! | Brick Gun     | projectile speed       |
//! | Bomb          | blast radius           |
//! | Ray           | beam half-width (rad)  |
//! | Shotgun       | pellet count           |
//! | Lego Launcher | bounce count           |
//! | Minigun       | scatter half-angle     |
//! | Plasma Cube   | cube size              |

use serde::{Deserialize, Serialize};

use super::body::Rgb;
use crate::consts::PLAYER_BASE_DAMAGE;

/// Weapon types, in weapon-bar slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponKind {
    #[default]
    BrickGun,
    Bomb,
    Ray,
    Shotgun,
    LegoLauncher,
    Minigun,
    PlasmaCube,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 7] = [
        WeaponKind::BrickGun,
        WeaponKind::Bomb,
        WeaponKind::Ray,
        WeaponKind::Shotgun,
        WeaponKind::LegoLauncher,
        WeaponKind::Minigun,
        WeaponKind::PlasmaCube,
    ];

    /// Weapon bound to a 1-based number key
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1..=7 => Some(Self::ALL[slot as usize - 1]),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::BrickGun => "Brick Gun",
            WeaponKind::Bomb => "Bomb",
            WeaponKind::Ray => "Ray",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::LegoLauncher => "Lego Launcher",
            WeaponKind::Minigun => "Minigun",
            WeaponKind::PlasmaCube => "Plasma Cube",
        }
    }

    /// Minimum milliseconds between shots before upgrades.
    /// The ray is continuous and has no discrete limit.
    pub fn base_fire_limit_ms(self) -> Option<f64> {
        match self {
            WeaponKind::Ray => None,
            WeaponKind::Minigun => Some(80.0),
            WeaponKind::PlasmaCube => Some(600.0),
            WeaponKind::BrickGun
            | WeaponKind::Bomb
            | WeaponKind::Shotgun
            | WeaponKind::LegoLauncher => Some(250.0),
        }
    }

    /// Starting special value
    pub fn base_special(self) -> f32 {
        match self {
            WeaponKind::BrickGun => 15.0,
            WeaponKind::Bomb => 120.0,
            WeaponKind::Ray => 0.08,
            WeaponKind::Shotgun => 5.0,
            WeaponKind::LegoLauncher => 4.0,
            WeaponKind::Minigun => 0.1,
            WeaponKind::PlasmaCube => 40.0,
        }
    }

    /// Multiplier applied to the special value by one mastery level.
    /// Minigun scatter shrinks: tighter spread is the upgrade.
    pub fn special_growth(self) -> f32 {
        match self {
            WeaponKind::Minigun => 0.8,
            _ => 1.25,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            WeaponKind::BrickGun => Rgb::BRICK_RED,
            WeaponKind::Bomb => Rgb::BOMB_SLATE,
            WeaponKind::Ray => Rgb::RAY_CYAN,
            WeaponKind::Shotgun => Rgb::SHOTGUN_BLUE,
            WeaponKind::LegoLauncher => Rgb::LEGO_GREEN,
            WeaponKind::Minigun => Rgb::MINIGUN_AMBER,
            WeaponKind::PlasmaCube => Rgb::PLASMA_VIOLET,
        }
    }
}

/// Per-weapon mastery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub level: u32,
    pub damage_bonus: f32,
    pub fire_rate_bonus: f32,
    pub special: f32,
}

impl WeaponStats {
    pub fn base(kind: WeaponKind) -> Self {
        Self {
            level: 1,
            damage_bonus: 1.0,
            fire_rate_bonus: 1.0,
            special: kind.base_special(),
        }
    }

    /// Cost of the next mastery level
    pub fn upgrade_cost(&self) -> u64 {
        300 + 200 * self.level as u64
    }

    /// Apply one mastery level
    pub fn level_up(&mut self, kind: WeaponKind) {
        self.level += 1;
        self.damage_bonus += 0.5;
        self.fire_rate_bonus += 0.2;
        self.special *= kind.special_growth();
    }

    /// Special value as a whole count (pellets, bounces)
    #[inline]
    pub fn special_count(&self) -> u32 {
        self.special.floor().max(0.0) as u32
    }
}

/// Global multipliers, resource caps and the per-weapon mastery table.
///
/// Owned by the player entity; the shop writes through the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrades {
    pub damage_mult: f32,
    pub fire_rate_mult: f32,
    pub speed_mult: f32,
    pub energy_max: f32,
    pub health_max: f32,
    pub shield_max: f32,
    /// Shield points regained per tick once regen kicks in
    pub shield_regen_rate: f32,
    weapons: [WeaponStats; 7],
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            damage_mult: 1.0,
            fire_rate_mult: 1.0,
            speed_mult: 1.0,
            energy_max: 100.0,
            health_max: 100.0,
            shield_max: 50.0,
            shield_regen_rate: 0.1,
            weapons: WeaponKind::ALL.map(WeaponStats::base),
        }
    }
}

impl Upgrades {
    #[inline]
    pub fn weapon(&self, kind: WeaponKind) -> &WeaponStats {
        &self.weapons[kind.index()]
    }

    #[inline]
    pub fn weapon_mut(&mut self, kind: WeaponKind) -> &mut WeaponStats {
        &mut self.weapons[kind.index()]
    }

    /// Effective minimum gap between shots of `kind`, or `None` if unlimited
    pub fn fire_limit_ms(&self, kind: WeaponKind) -> Option<f64> {
        let stats = self.weapon(kind);
        kind.base_fire_limit_ms()
            .map(|base| base / self.fire_rate_mult as f64 / stats.fire_rate_bonus as f64)
    }

    /// Damage of one player hit with `kind` before per-weapon scaling
    pub fn shot_damage(&self, kind: WeaponKind, double_damage: bool) -> f32 {
        let boost = if double_damage { 2.0 } else { 1.0 };
        PLAYER_BASE_DAMAGE * self.damage_mult * self.weapon(kind).damage_bonus * boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_map_in_order() {
        assert_eq!(WeaponKind::from_slot(1), Some(WeaponKind::BrickGun));
        assert_eq!(WeaponKind::from_slot(3), Some(WeaponKind::Ray));
        assert_eq!(WeaponKind::from_slot(7), Some(WeaponKind::PlasmaCube));
        assert_eq!(WeaponKind::from_slot(0), None);
        assert_eq!(WeaponKind::from_slot(8), None);
    }

    #[test]
    fn test_fire_limit_scales_with_both_bonuses() {
        let mut up = Upgrades::default();
        assert_eq!(up.fire_limit_ms(WeaponKind::BrickGun), Some(250.0));
        assert_eq!(up.fire_limit_ms(WeaponKind::Minigun), Some(80.0));
        assert_eq!(up.fire_limit_ms(WeaponKind::Ray), None);

        up.fire_rate_mult = 2.0;
        up.weapon_mut(WeaponKind::BrickGun).fire_rate_bonus = 1.25;
        let limit = up.fire_limit_ms(WeaponKind::BrickGun).unwrap();
        assert!((limit - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_shot_damage() {
        let mut up = Upgrades::default();
        assert_eq!(up.shot_damage(WeaponKind::BrickGun, false), 25.0);
        assert_eq!(up.shot_damage(WeaponKind::BrickGun, true), 50.0);
        up.damage_mult = 1.3;
        up.weapon_mut(WeaponKind::BrickGun).damage_bonus = 1.5;
        assert!((up.shot_damage(WeaponKind::BrickGun, false) - 48.75).abs() < 1e-4);
    }

    #[test]
    fn test_level_up_grows_special_except_minigun() {
        let mut shotgun = WeaponStats::base(WeaponKind::Shotgun);
        shotgun.level_up(WeaponKind::Shotgun);
        assert_eq!(shotgun.level, 2);
        assert_eq!(shotgun.special_count(), 6);
        assert!((shotgun.damage_bonus - 1.5).abs() < 1e-6);

        let mut minigun = WeaponStats::base(WeaponKind::Minigun);
        minigun.level_up(WeaponKind::Minigun);
        assert!(minigun.special < WeaponKind::Minigun.base_special());
        assert!(minigun.fire_rate_bonus > 1.0);
    }

    #[test]
    fn test_upgrade_cost_grows() {
        let mut stats = WeaponStats::base(WeaponKind::Bomb);
        assert_eq!(stats.upgrade_cost(), 500);
        stats.level_up(WeaponKind::Bomb);
        assert_eq!(stats.upgrade_cost(), 700);
    }
}
