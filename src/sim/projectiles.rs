//! Projectile subsystem
//!
//! Firing patterns per weapon, the continuous ray, projectile flight and
//! ground interaction (bomb detonation, lego bounces).

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Rgb};
use super::collision::explode_at;
use super::pool::Pool;
use super::state::{GameEvent, GameState, PowerUpKind, Projectile, RayBeam, Shooter};
use super::weapons::WeaponKind;
use crate::consts::BOUNCE_RESTITUTION;
use crate::{angle_between, direction};

/// Result of a fire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// Projectiles spawned (or ray ticks applied)
    Fired(usize),
    /// Held weapon is still inside its fire-rate window
    RateLimited,
    /// Not enough energy to sustain the ray this tick
    NoEnergy,
}

/// Bomb blast strength relative to a plain explosion
pub(crate) const BOMB_POWER: f32 = 1.2;
/// Ray damage per tick before multipliers
const RAY_TICK_DAMAGE: f32 = 3.0;
/// Angular gap between shotgun pellets
const PELLET_SPREAD: f32 = 0.15;
/// Projectiles this far outside the arena are dropped
const OFFSCREEN_MARGIN: f32 = 200.0;

/// Everything needed to put one projectile in flight
struct Shot {
    shooter: Shooter,
    center: Vec2,
    vel: Vec2,
    size: Vec2,
    color: Rgb,
    damage: f32,
    life: i32,
    bounces: Option<u32>,
    piercing: bool,
}

fn launch(pool: &mut Pool<Projectile>, shot: Shot) -> bool {
    pool.spawn(|id| Projectile {
        id,
        shooter: shot.shooter,
        body: Body::centered(shot.center, shot.size, shot.color).with_vel(shot.vel),
        damage: shot.damage,
        life: shot.life,
        bounces: shot.bounces,
        piercing: shot.piercing,
    })
    .is_some()
}

/// Aim direction from the player's center toward the pointer,
/// or straight ahead along the facing direction if no pointer was seen yet.
pub fn aim_angle(state: &GameState) -> f32 {
    let player = &state.player;
    match state.pointer {
        Some(pointer) => {
            let d = pointer - player.body.center();
            d.y.atan2(d.x)
        }
        None if player.facing_right => 0.0,
        None => std::f32::consts::PI,
    }
}

/// Attempt one shot with the held weapon. The ray is delegated to `fire_ray`.
pub fn try_fire(state: &mut GameState) -> FireOutcome {
    let kind = state.player.weapon;
    let now = state.clock_ms;
    let player = &state.player;
    if let (Some(limit), Some(last)) = (
        player.upgrades.fire_limit_ms(kind),
        player.last_shot_ms[kind.index()],
    ) {
        if now - last < limit {
            return FireOutcome::RateLimited;
        }
    }

    let angle = aim_angle(state);
    let center = state.player.body.center();
    let double = state.player.has_power_up(PowerUpKind::DoubleDamage);
    let damage = state.player.upgrades.shot_damage(kind, double);
    let stats = *state.player.upgrades.weapon(kind);
    let shooter = Shooter::Player(kind);
    let color = kind.color();

    let mut shots = Vec::with_capacity(1);
    match kind {
        WeaponKind::BrickGun => shots.push(Shot {
            shooter,
            center,
            vel: direction(angle) * stats.special,
            size: Vec2::new(15.0, 10.0),
            color,
            damage,
            life: 100,
            bounces: None,
            piercing: false,
        }),
        WeaponKind::Bomb => shots.push(Shot {
            shooter,
            center,
            // Lobbed: extra upward kick
            vel: direction(angle) * 10.0 - Vec2::new(0.0, 5.0),
            size: Vec2::new(20.0, 20.0),
            color,
            damage: damage * 4.0,
            life: 120,
            bounces: None,
            piercing: false,
        }),
        WeaponKind::Shotgun => {
            let pellets = stats.special_count();
            let mid = (pellets as f32 - 1.0) / 2.0;
            for i in 0..pellets {
                let spread = angle + (i as f32 - mid) * PELLET_SPREAD;
                shots.push(Shot {
                    shooter,
                    center,
                    vel: direction(spread) * 12.0,
                    size: Vec2::new(12.0, 12.0),
                    color,
                    damage: damage * 0.7,
                    life: 45,
                    bounces: None,
                    piercing: false,
                });
            }
        }
        WeaponKind::LegoLauncher => shots.push(Shot {
            shooter,
            center,
            vel: direction(angle) * 10.0,
            size: Vec2::new(25.0, 15.0),
            color,
            damage: damage * 1.5,
            life: 300,
            bounces: Some(stats.special_count()),
            piercing: false,
        }),
        WeaponKind::Minigun => {
            let scatter = stats.special.abs();
            let jitter = if scatter > 0.0 {
                state.rng.random_range(-scatter..=scatter)
            } else {
                0.0
            };
            shots.push(Shot {
                shooter,
                center,
                vel: direction(angle + jitter) * 18.0,
                size: Vec2::new(10.0, 8.0),
                color,
                damage: damage * 0.5,
                life: 80,
                bounces: None,
                piercing: false,
            });
        }
        WeaponKind::PlasmaCube => shots.push(Shot {
            shooter,
            center,
            vel: direction(angle) * 4.0,
            size: Vec2::splat(stats.special),
            color,
            damage: damage * 0.2,
            life: 400,
            bounces: None,
            piercing: true,
        }),
        WeaponKind::Ray => return fire_ray(state),
    }

    let fired = shots
        .into_iter()
        .filter(|shot| shot.size.min_element() > 0.0)
        .map(|shot| launch(&mut state.projectiles, shot))
        .filter(|spawned| *spawned)
        .count();

    state.player.last_shot_ms[kind.index()] = Some(now);
    state.events.push(GameEvent::WeaponFired(kind));
    FireOutcome::Fired(fired)
}

/// Hold the ray for one tick: drains energy, damages every enemy whose center
/// lies within the beam's angular half-width.
pub fn fire_ray(state: &mut GameState) -> FireOutcome {
    let stats = *state.player.upgrades.weapon(WeaponKind::Ray);
    let cost = state.tuning.ray_cost(stats.level);
    if state.player.energy < cost {
        state.ray = None;
        return FireOutcome::NoEnergy;
    }
    state.player.energy -= cost;

    let angle = aim_angle(state);
    let origin = state.player.body.center();
    let double = state.player.has_power_up(PowerUpKind::DoubleDamage);
    let boost = if double { 2.0 } else { 1.0 };
    let damage = RAY_TICK_DAMAGE * state.player.upgrades.damage_mult * stats.damage_bonus * boost;
    let half_width = stats.special;

    let mut hits = 0;
    for enemy in state.enemies.iter_mut() {
        let to_enemy = enemy.body.center() - origin;
        let enemy_angle = to_enemy.y.atan2(to_enemy.x);
        if angle_between(angle, enemy_angle) < half_width {
            enemy.health -= damage;
            hits += 1;
        }
    }

    if state.ray.is_none() {
        state.events.push(GameEvent::WeaponFired(WeaponKind::Ray));
    }
    state.ray = Some(RayBeam {
        origin,
        angle,
        half_width,
    });
    FireOutcome::Fired(hits)
}

/// Fire one enemy projectile from `origin` toward `angle`
pub fn fire_enemy_shot(state: &mut GameState, origin: Vec2, angle: f32, speed: f32, damage: f32) {
    launch(
        &mut state.projectiles,
        Shot {
            shooter: Shooter::Enemy,
            center: origin,
            vel: direction(angle) * speed,
            size: Vec2::splat(16.0),
            color: Rgb::BOSS_SHOT,
            damage,
            life: 240,
            bounces: None,
            piercing: false,
        },
    );
}

/// Move every projectile one tick, age it, and resolve ground contact.
///
/// Bombs detonate on the ground or when their fuse runs out. Bouncing
/// projectiles reflect with restitution until out of bounces.
pub fn advance_projectiles(state: &mut GameState) {
    let gravity = state.tuning.gravity;
    let ground_y = state.ground_y();
    let arena_width = state.tuning.arena_width;
    let mut detonations: Vec<Vec2> = Vec::new();

    state.projectiles.retain(|proj| {
        proj.body.integrate();
        proj.life -= 1;

        match proj.shooter {
            Shooter::Player(WeaponKind::Bomb) => {
                proj.body.vel.y += gravity * 0.5;
                if proj.body.below_ground(ground_y) || proj.life <= 0 {
                    detonations.push(proj.body.center());
                    return false;
                }
            }
            Shooter::Player(WeaponKind::LegoLauncher) => {
                proj.body.vel.y += gravity * 0.4;
                if proj.body.below_ground(ground_y) {
                    match proj.bounces {
                        Some(left) if left > 0 => {
                            proj.body.vel.y *= -BOUNCE_RESTITUTION;
                            proj.body.rest_on_ground(ground_y);
                            proj.bounces = Some(left - 1);
                        }
                        _ => return false,
                    }
                }
            }
            Shooter::Enemy => {
                if proj.body.below_ground(ground_y) {
                    return false;
                }
            }
            Shooter::Player(_) => {}
        }

        let x = proj.body.pos.x;
        let offscreen = x < -OFFSCREEN_MARGIN || x > arena_width + OFFSCREEN_MARGIN;
        proj.life > 0 && !offscreen
    });

    if !detonations.is_empty() {
        let radius = state.player.upgrades.weapon(WeaponKind::Bomb).special;
        for pos in detonations {
            explode_at(state, pos, radius, BOMB_POWER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::sim::state::{Enemy, EnemyKind};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(11, Tuning::default())
    }

    fn add_enemy(state: &mut GameState, center: Vec2, health: f32) {
        state.enemies.spawn(|id| Enemy {
            id,
            kind: EnemyKind::Crawler,
            body: Body::centered(center, Vec2::new(35.0, 40.0), Rgb(0)),
            health,
            max_health: health,
            boss: None,
        });
    }

    #[test]
    fn test_default_aim_follows_facing() {
        let mut s = state();
        assert_eq!(aim_angle(&s), 0.0);
        s.player.facing_right = false;
        assert_eq!(aim_angle(&s), std::f32::consts::PI);
        s.pointer = Some(s.player.body.center() + Vec2::new(0.0, 10.0));
        assert!((aim_angle(&s) - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_rate_limit_blocks_second_shot() {
        let mut s = state();
        assert_eq!(try_fire(&mut s), FireOutcome::Fired(1));
        s.clock_ms += TICK_MS;
        assert_eq!(try_fire(&mut s), FireOutcome::RateLimited);
        assert_eq!(s.projectiles.len(), 1);

        s.clock_ms = 250.0;
        assert_eq!(try_fire(&mut s), FireOutcome::Fired(1));
        assert_eq!(s.projectiles.len(), 2);
    }

    #[test]
    fn test_rate_limit_is_per_weapon() {
        let mut s = state();
        assert!(matches!(try_fire(&mut s), FireOutcome::Fired(_)));
        s.player.weapon = WeaponKind::Shotgun;
        assert_eq!(try_fire(&mut s), FireOutcome::Fired(5));
    }

    #[test]
    fn test_shotgun_fan_is_symmetric() {
        let mut s = state();
        s.player.weapon = WeaponKind::Shotgun;
        try_fire(&mut s);
        let ys: f32 = s.projectiles.iter().map(|p| p.body.vel.y).sum();
        assert!(ys.abs() < 1e-4);
        assert!(s.projectiles.iter().all(|p| (p.damage - 17.5).abs() < 1e-4));
    }

    #[test]
    fn test_minigun_scatter_bounded() {
        let mut s = state();
        s.player.weapon = WeaponKind::Minigun;
        let scatter = s.player.upgrades.weapon(WeaponKind::Minigun).special;
        for i in 0..50 {
            s.clock_ms = i as f64 * 100.0;
            try_fire(&mut s);
        }
        assert_eq!(s.projectiles.len(), 50);
        for p in s.projectiles.iter() {
            let a = p.body.vel.y.atan2(p.body.vel.x);
            assert!(a.abs() <= scatter + 1e-5);
        }
    }

    #[test]
    fn test_plasma_is_piercing_and_sized() {
        let mut s = state();
        s.player.weapon = WeaponKind::PlasmaCube;
        try_fire(&mut s);
        let p = s.projectiles.get(0).unwrap();
        assert!(p.piercing);
        assert_eq!(p.body.size, Vec2::splat(40.0));
    }

    #[test]
    fn test_ray_consumes_energy_and_hits_sector() {
        let mut s = state();
        s.player.weapon = WeaponKind::Ray;
        let origin = s.player.body.center();
        add_enemy(&mut s, origin + Vec2::new(300.0, 0.0), 100.0);
        add_enemy(&mut s, origin + Vec2::new(0.0, 300.0), 100.0);

        let before = s.player.energy;
        assert_eq!(try_fire(&mut s), FireOutcome::Fired(1));
        assert!(s.player.energy < before);
        assert_eq!(s.enemies.get(0).unwrap().health, 97.0);
        assert_eq!(s.enemies.get(1).unwrap().health, 100.0);
        assert!(s.ray.is_some());

        // Ray is not rate limited
        assert_eq!(try_fire(&mut s), FireOutcome::Fired(1));
    }

    #[test]
    fn test_ray_suppressed_without_energy() {
        let mut s = state();
        s.player.weapon = WeaponKind::Ray;
        s.player.energy = 0.1;
        assert_eq!(try_fire(&mut s), FireOutcome::NoEnergy);
        assert_eq!(s.player.energy, 0.1);
        assert!(s.ray.is_none());
    }

    #[test]
    fn test_lego_bounces_then_dies() {
        let mut s = state();
        let ground = s.ground_y();
        launch(
            &mut s.projectiles,
            Shot {
                shooter: Shooter::Player(WeaponKind::LegoLauncher),
                center: Vec2::new(300.0, ground - 10.0),
                vel: Vec2::new(0.0, 10.0),
                size: Vec2::new(25.0, 15.0),
                color: Rgb(0),
                damage: 1.0,
                life: 300,
                bounces: Some(1),
                piercing: false,
            },
        );

        advance_projectiles(&mut s);
        let p = s.projectiles.get(0).unwrap();
        assert_eq!(p.bounces, Some(0));
        assert!(p.body.vel.y < 0.0);
        assert!((p.body.vel.y + (10.0 + 0.2) * 0.7).abs() < 1e-4);
        assert_eq!(p.body.bottom(), ground);

        // Force the next ground contact
        s.projectiles.get_mut(0).unwrap().body.vel.y = 10.0;
        advance_projectiles(&mut s);
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_bomb_detonates_on_ground() {
        let mut s = state();
        let ground = s.ground_y();
        add_enemy(&mut s, Vec2::new(500.0, ground - 20.0), 1000.0);
        launch(
            &mut s.projectiles,
            Shot {
                shooter: Shooter::Player(WeaponKind::Bomb),
                center: Vec2::new(500.0, ground - 5.0),
                vel: Vec2::new(0.0, 10.0),
                size: Vec2::new(20.0, 20.0),
                color: Rgb(0),
                damage: 100.0,
                life: 120,
                bounces: None,
                piercing: false,
            },
        );
        advance_projectiles(&mut s);
        assert!(s.projectiles.is_empty());
        // 200 * damage_mult(1) * 1.2
        assert!((s.enemies.get(0).unwrap().health - 760.0).abs() < 1e-3);
        assert!(!s.particles.is_empty());
    }

    #[test]
    fn test_lifetime_expires() {
        let mut s = state();
        // Straight up, so it never leaves the arena sideways
        s.pointer = Some(s.player.body.center() - Vec2::new(0.0, 100.0));
        try_fire(&mut s);
        for _ in 0..99 {
            advance_projectiles(&mut s);
        }
        assert_eq!(s.projectiles.len(), 1);
        advance_projectiles(&mut s);
        assert!(s.projectiles.is_empty());
    }
}
