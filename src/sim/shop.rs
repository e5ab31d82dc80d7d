//! Between-wave shop
//!
//! Purchases are transactional: either the full cost is deducted and the
//! delta applied to the player's upgrades in the same call, or nothing
//! changes at all.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use super::weapons::{Upgrades, WeaponKind};

/// Global upgrades on sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlobalUpgrade {
    Damage,
    FireRate,
    Energy,
    Health,
    Speed,
    Shield,
    ShieldRegen,
}

impl GlobalUpgrade {
    pub const ALL: [GlobalUpgrade; 7] = [
        GlobalUpgrade::Damage,
        GlobalUpgrade::FireRate,
        GlobalUpgrade::Energy,
        GlobalUpgrade::Health,
        GlobalUpgrade::Speed,
        GlobalUpgrade::Shield,
        GlobalUpgrade::ShieldRegen,
    ];

    pub fn cost(self) -> u64 {
        match self {
            GlobalUpgrade::Damage => 250,
            GlobalUpgrade::FireRate => 350,
            GlobalUpgrade::Energy => 200,
            GlobalUpgrade::Health => 300,
            GlobalUpgrade::Speed => 300,
            GlobalUpgrade::Shield => 300,
            GlobalUpgrade::ShieldRegen => 250,
        }
    }

    /// Amount added to the targeted stat
    pub fn delta(self) -> f32 {
        match self {
            GlobalUpgrade::Damage => 0.3,
            GlobalUpgrade::FireRate => 0.3,
            GlobalUpgrade::Energy => 60.0,
            GlobalUpgrade::Health => 60.0,
            GlobalUpgrade::Speed => 0.15,
            GlobalUpgrade::Shield => 25.0,
            GlobalUpgrade::ShieldRegen => 0.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalUpgrade::Damage => "Damage",
            GlobalUpgrade::FireRate => "Fire Rate",
            GlobalUpgrade::Energy => "Max Energy",
            GlobalUpgrade::Health => "Max Health",
            GlobalUpgrade::Speed => "Speed",
            GlobalUpgrade::Shield => "Max Shield",
            GlobalUpgrade::ShieldRegen => "Shield Regen",
        }
    }

    fn stat_mut(self, upgrades: &mut Upgrades) -> &mut f32 {
        match self {
            GlobalUpgrade::Damage => &mut upgrades.damage_mult,
            GlobalUpgrade::FireRate => &mut upgrades.fire_rate_mult,
            GlobalUpgrade::Energy => &mut upgrades.energy_max,
            GlobalUpgrade::Health => &mut upgrades.health_max,
            GlobalUpgrade::Speed => &mut upgrades.speed_mult,
            GlobalUpgrade::Shield => &mut upgrades.shield_max,
            GlobalUpgrade::ShieldRegen => &mut upgrades.shield_regen_rate,
        }
    }
}

/// Result of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Bought { cost: u64 },
    InsufficientScore { cost: u64 },
    ShopClosed,
}

/// Deduct `cost` if affordable; the caller applies the delta on success
fn charge(state: &mut GameState, cost: u64) -> PurchaseOutcome {
    if !state.wave.is_shop_open() {
        return PurchaseOutcome::ShopClosed;
    }
    if state.score < cost {
        return PurchaseOutcome::InsufficientScore { cost };
    }
    state.score -= cost;
    PurchaseOutcome::Bought { cost }
}

/// Buy one level of a global upgrade
pub fn buy_global(state: &mut GameState, upgrade: GlobalUpgrade) -> PurchaseOutcome {
    let outcome = charge(state, upgrade.cost());
    if !matches!(outcome, PurchaseOutcome::Bought { .. }) {
        return outcome;
    }

    let player = &mut state.player;
    *upgrade.stat_mut(&mut player.upgrades) += upgrade.delta();

    // Capacity upgrades refill the pool they enlarge
    match upgrade {
        GlobalUpgrade::Energy => player.energy = player.upgrades.energy_max,
        GlobalUpgrade::Health => player.health = player.upgrades.health_max,
        GlobalUpgrade::Shield => player.shield = player.upgrades.shield_max,
        _ => {}
    }

    log::info!("Bought {} for {}", upgrade.as_str(), upgrade.cost());
    outcome
}

/// Buy the next mastery level of one weapon
pub fn buy_weapon(state: &mut GameState, kind: WeaponKind) -> PurchaseOutcome {
    let cost = state.player.upgrades.weapon(kind).upgrade_cost();
    let outcome = charge(state, cost);
    if !matches!(outcome, PurchaseOutcome::Bought { .. }) {
        return outcome;
    }

    let stats = state.player.upgrades.weapon_mut(kind);
    stats.level_up(kind);
    log::info!("{} upgraded to level {} for {}", kind.as_str(), stats.level, cost);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn shop_state(score: u64) -> GameState {
        let mut s = GameState::new(3, Tuning::default());
        s.wave.phase = GamePhase::Shop;
        s.score = score;
        s
    }

    #[test]
    fn test_insufficient_score_changes_nothing() {
        let mut s = shop_state(100);
        let before = s.player.upgrades.clone();
        assert_eq!(
            buy_global(&mut s, GlobalUpgrade::Damage),
            PurchaseOutcome::InsufficientScore { cost: 250 }
        );
        assert_eq!(s.score, 100);
        assert_eq!(s.player.upgrades, before);

        assert_eq!(
            buy_weapon(&mut s, WeaponKind::Bomb),
            PurchaseOutcome::InsufficientScore { cost: 500 }
        );
        assert_eq!(s.player.upgrades, before);
    }

    #[test]
    fn test_purchase_deducts_exact_cost() {
        for upgrade in GlobalUpgrade::ALL {
            let mut s = shop_state(1000);
            let before = *upgrade.stat_mut(&mut s.player.upgrades.clone());
            assert_eq!(
                buy_global(&mut s, upgrade),
                PurchaseOutcome::Bought { cost: upgrade.cost() }
            );
            assert_eq!(s.score, 1000 - upgrade.cost());
            let after = *upgrade.stat_mut(&mut s.player.upgrades);
            assert!((after - before - upgrade.delta()).abs() < 1e-5, "{upgrade:?}");
        }
    }

    #[test]
    fn test_capacity_upgrade_refills() {
        let mut s = shop_state(1000);
        s.player.health = 10.0;
        buy_global(&mut s, GlobalUpgrade::Health);
        assert_eq!(s.player.upgrades.health_max, 160.0);
        assert_eq!(s.player.health, 160.0);
    }

    #[test]
    fn test_upgrade_visible_to_live_player() {
        let mut s = shop_state(1000);
        buy_global(&mut s, GlobalUpgrade::Damage);
        assert!((s.player.upgrades.shot_damage(WeaponKind::BrickGun, false) - 32.5).abs() < 1e-4);
    }

    #[test]
    fn test_weapon_mastery() {
        let mut s = shop_state(2000);
        assert_eq!(
            buy_weapon(&mut s, WeaponKind::Shotgun),
            PurchaseOutcome::Bought { cost: 500 }
        );
        assert_eq!(
            buy_weapon(&mut s, WeaponKind::Shotgun),
            PurchaseOutcome::Bought { cost: 700 }
        );
        assert_eq!(s.score, 800);
        let stats = s.player.upgrades.weapon(WeaponKind::Shotgun);
        assert_eq!(stats.level, 3);
        assert!((stats.damage_bonus - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_closed_shop_rejects() {
        let mut s = shop_state(5000);
        s.wave.phase = GamePhase::Playing;
        assert_eq!(
            buy_global(&mut s, GlobalUpgrade::Speed),
            PurchaseOutcome::ShopClosed
        );
        assert_eq!(s.score, 5000);
    }
}
