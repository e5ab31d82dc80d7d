//! Collision and damage resolution
//!
//! All tests are axis-aligned box overlaps. Resolution order per tick is
//! fixed so that no damage is applied twice:
//! 1. player projectiles vs enemies, enemy projectiles vs player
//! 2. enemy body contact vs player (continuous, every overlapping tick)
//! 3. power-up pickup

use glam::Vec2;
use rand::Rng;

use super::particles::spawn_burst;
use super::player::{apply_damage, apply_power_up};
use super::projectiles::BOMB_POWER;
use super::state::{GameEvent, GameState};
use super::weapons::WeaponKind;
use crate::consts::EXPLOSION_DAMAGE;

/// Radius and power of the small splash a piercing projectile may cause
const SPLASH_RADIUS: f32 = 10.0;
const SPLASH_POWER: f32 = 0.1;

/// Run every collision pass for this tick, in order
pub fn resolve_collisions(state: &mut GameState) {
    resolve_projectile_hits(state);
    resolve_contact_damage(state);
    resolve_pickups(state);
}

/// Pass 1: projectile hits on enemies and on the player
fn resolve_projectile_hits(state: &mut GameState) {
    let GameState {
        projectiles,
        enemies,
        player,
        rng,
        events,
        tuning,
        clock_ms,
        ..
    } = &mut *state;
    let splash_chance = tuning.plasma_splash_chance;
    let now = *clock_ms;
    let mut blasts: Vec<(Vec2, f32, f32)> = Vec::new();
    let bomb_radius = player.upgrades.weapon(WeaponKind::Bomb).special;

    projectiles.retain(|proj| {
        if proj.from_enemy() {
            if proj.body.overlaps(&player.body) {
                let lost = apply_damage(player, proj.damage, now);
                log::debug!("Player hit for {} ({} health lost)", proj.damage, lost);
                events.push(GameEvent::PlayerHit { damage: proj.damage });
                return false;
            }
            return true;
        }

        for enemy in enemies.iter_mut() {
            if enemy.is_dead() || !proj.body.overlaps(&enemy.body) {
                continue;
            }
            enemy.health -= proj.damage;

            if proj.piercing {
                if rng.random::<f32>() < splash_chance {
                    blasts.push((proj.body.center(), SPLASH_RADIUS, SPLASH_POWER));
                }
            } else if proj.bounces.is_none() {
                if proj.weapon() == Some(WeaponKind::Bomb) {
                    blasts.push((proj.body.center(), bomb_radius, BOMB_POWER));
                }
                // Terminal hit: first enemy only
                return false;
            }
        }
        true
    });

    for (pos, radius, power) in blasts {
        explode_at(state, pos, radius, power);
    }
}

/// Pass 2: continuous contact damage from overlapping enemies
fn resolve_contact_damage(state: &mut GameState) {
    let now = state.clock_ms;
    let player = &mut state.player;
    for enemy in state.enemies.iter() {
        if !enemy.is_dead() && enemy.body.overlaps(&player.body) {
            apply_damage(player, enemy.kind.contact_damage(), now);
        }
    }
}

/// Pass 3: pick up overlapping power-ups
fn resolve_pickups(state: &mut GameState) {
    let GameState {
        power_ups,
        player,
        events,
        tuning,
        ..
    } = &mut *state;

    power_ups.retain(|power_up| {
        if power_up.body.overlaps(&player.body) {
            apply_power_up(player, power_up.kind, tuning);
            log::debug!("Collected power-up {:?}", power_up.kind);
            events.push(GameEvent::PowerUpCollected(power_up.kind));
            false
        } else {
            true
        }
    });
}

/// Area damage: every enemy whose center is strictly within `radius` of
/// `pos` takes `200 × damage_mult × power` once. Always throws debris.
pub fn explode_at(state: &mut GameState, pos: Vec2, radius: f32, power: f32) {
    spawn_burst(&mut state.particles, &mut state.rng, pos);

    let damage = EXPLOSION_DAMAGE * state.player.upgrades.damage_mult * power;
    for enemy in state.enemies.iter_mut() {
        if enemy.body.center().distance(pos) < radius {
            enemy.health -= damage;
        }
    }
    state.events.push(GameEvent::Explosion { pos, radius });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EXPLOSION_PARTICLES;
    use crate::sim::body::{Body, Rgb};
    use crate::sim::pool::EntityId;
    use crate::sim::state::{Enemy, EnemyKind, PowerUp, PowerUpKind, Projectile, Shooter};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut s = GameState::new(5, Tuning::default());
        // Park the player far from the action
        s.player.body.pos = Vec2::new(0.0, 0.0);
        s
    }

    fn add_enemy(s: &mut GameState, center: Vec2, health: f32) -> EntityId {
        s.enemies
            .spawn(|id| Enemy {
                id,
                kind: EnemyKind::Crawler,
                body: Body::centered(center, Vec2::new(35.0, 40.0), Rgb(0)),
                health,
                max_health: health,
                boss: None,
            })
            .unwrap()
    }

    fn add_projectile(s: &mut GameState, shooter: Shooter, center: Vec2, piercing: bool, bounces: Option<u32>) {
        s.projectiles.spawn(|id| Projectile {
            id,
            shooter,
            body: Body::centered(center, Vec2::new(10.0, 10.0), Rgb(0)),
            damage: 25.0,
            life: 100,
            bounces,
            piercing,
        });
    }

    #[test]
    fn test_plain_projectile_removed_on_first_hit() {
        let mut s = state();
        let at = Vec2::new(600.0, 400.0);
        add_enemy(&mut s, at, 70.0);
        add_enemy(&mut s, at, 70.0);
        add_projectile(&mut s, Shooter::Player(WeaponKind::BrickGun), at, false, None);

        resolve_collisions(&mut s);
        assert!(s.projectiles.is_empty());
        let total: f32 = s.enemies.iter().map(|e| e.health).sum();
        // Only one of the two stacked enemies was hit
        assert_eq!(total, 70.0 + 45.0);
    }

    #[test]
    fn test_piercing_projectile_survives_hits() {
        let mut s = state();
        s.tuning.plasma_splash_chance = 0.0;
        let at = Vec2::new(600.0, 400.0);
        add_enemy(&mut s, at, 100.0);
        add_enemy(&mut s, at, 100.0);
        add_projectile(&mut s, Shooter::Player(WeaponKind::PlasmaCube), at, true, None);

        resolve_collisions(&mut s);
        assert_eq!(s.projectiles.len(), 1);
        assert!(s.enemies.iter().all(|e| e.health == 75.0));
    }

    #[test]
    fn test_bouncing_projectile_survives_hits() {
        let mut s = state();
        let at = Vec2::new(600.0, 400.0);
        add_enemy(&mut s, at, 100.0);
        add_projectile(&mut s, Shooter::Player(WeaponKind::LegoLauncher), at, false, Some(3));
        resolve_collisions(&mut s);
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(s.enemies.get(0).unwrap().health, 75.0);
    }

    #[test]
    fn test_enemy_shot_hits_player_through_shield() {
        let mut s = state();
        s.player.shield = 10.0;
        let center = s.player.body.center();
        add_projectile(&mut s, Shooter::Enemy, center, false, None);
        resolve_collisions(&mut s);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.player.shield, 0.0);
        assert_eq!(s.player.health, 85.0);
        assert!(s.events.contains(&GameEvent::PlayerHit { damage: 25.0 }));
    }

    #[test]
    fn test_enemy_shots_ignore_enemies() {
        let mut s = state();
        let at = Vec2::new(600.0, 400.0);
        add_enemy(&mut s, at, 100.0);
        add_projectile(&mut s, Shooter::Enemy, at, false, None);
        resolve_collisions(&mut s);
        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(s.enemies.get(0).unwrap().health, 100.0);
    }

    #[test]
    fn test_contact_damage_every_tick() {
        let mut s = state();
        s.player.shield = 0.0;
        let center = s.player.body.center();
        add_enemy(&mut s, center, 100.0);
        for _ in 0..10 {
            resolve_collisions(&mut s);
        }
        assert!((s.player.health - (100.0 - 6.0)).abs() < 1e-3);
    }

    #[test]
    fn test_pickup_applies_and_removes() {
        let mut s = state();
        s.player.shield = 0.0;
        let center = s.player.body.center();
        s.power_ups.spawn(|id| PowerUp {
            id,
            kind: PowerUpKind::ShieldRefill,
            body: Body::centered(center, Vec2::splat(20.0), Rgb(0)),
            life: 600,
        });
        resolve_collisions(&mut s);
        assert!(s.power_ups.is_empty());
        assert_eq!(s.player.shield, s.player.upgrades.shield_max);
        assert!(s.events.contains(&GameEvent::PowerUpCollected(PowerUpKind::ShieldRefill)));
    }

    #[test]
    fn test_explosion_radius_is_strict() {
        let mut s = state();
        let origin = Vec2::new(600.0, 300.0);
        let inside = add_enemy(&mut s, origin + Vec2::new(49.0, 0.0), 1000.0);
        let edge = add_enemy(&mut s, origin + Vec2::new(50.0, 0.0), 1000.0);
        let outside = add_enemy(&mut s, origin + Vec2::new(0.0, 80.0), 1000.0);
        s.player.upgrades.damage_mult = 1.5;

        explode_at(&mut s, origin, 50.0, 2.0);

        assert!((s.enemies.find(inside).unwrap().health - 400.0).abs() < 1e-3);
        assert_eq!(s.enemies.find(edge).unwrap().health, 1000.0);
        assert_eq!(s.enemies.find(outside).unwrap().health, 1000.0);
        assert_eq!(s.particles.len(), EXPLOSION_PARTICLES);
    }

    #[test]
    fn test_bomb_contact_detonates() {
        let mut s = state();
        let at = Vec2::new(600.0, 400.0);
        let target = add_enemy(&mut s, at, 1000.0);
        let bystander = add_enemy(&mut s, at + Vec2::new(60.0, 0.0), 1000.0);
        add_projectile(&mut s, Shooter::Player(WeaponKind::Bomb), at, false, None);
        resolve_collisions(&mut s);
        assert!(s.projectiles.is_empty());
        // Direct hit plus blast
        assert!((s.enemies.find(target).unwrap().health - (1000.0 - 25.0 - 240.0)).abs() < 1e-3);
        assert!((s.enemies.find(bystander).unwrap().health - 760.0).abs() < 1e-3);
    }
}
