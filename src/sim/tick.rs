//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::enemies::{advance_enemies, maybe_spawn, resolve_deaths};
use super::particles::advance_particles;
use super::player::{check_game_over, update_player};
use super::power_ups::advance_power_ups;
use super::projectiles::{advance_projectiles, try_fire};
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::{ensure_boss, handle_pause};
use super::weapons::WeaponKind;
use crate::consts::TICK_MS;

/// Input commands for a single tick (deterministic).
///
/// Everything is level state ("currently held"); the core edge-detects jump
/// and pause itself.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Fire held
    pub fire: bool,
    /// Number key 1..=7
    pub weapon_select: Option<u8>,
    /// Pause toggle
    pub pause: bool,
    /// Pointer position in arena coordinates, if it moved
    pub aim: Option<Vec2>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut input = input.clone();
    if input.idle_mode {
        drive_idle(state, &mut input);
    }

    handle_pause(state, input.pause);
    if let Some(aim) = input.aim {
        state.pointer = Some(aim);
    }

    if !state.wave.is_live() {
        state.ray = None;
        // Keep debris settling while shopping
        if state.wave.phase == GamePhase::Shop && !state.wave.paused {
            advance_particles(state);
        }
        return;
    }

    if let Some(kind) = input.weapon_select.and_then(WeaponKind::from_slot) {
        if kind != state.player.weapon {
            state.player.weapon = kind;
            state.ray = None;
            log::debug!("Switched to {}", kind.as_str());
            state.events.push(GameEvent::WeaponSwitched(kind));
        }
    }

    state.time_ticks += 1;
    state.clock_ms += TICK_MS;

    update_player(state, &input);

    if input.fire {
        if state.player.weapon != WeaponKind::Ray {
            state.ray = None;
        }
        try_fire(state);
    } else {
        state.ray = None;
    }

    ensure_boss(state);
    maybe_spawn(state);
    advance_enemies(state);
    advance_projectiles(state);
    resolve_collisions(state);
    resolve_deaths(state);
    advance_power_ups(state);
    advance_particles(state);

    state.player.clamp_resources();
    check_game_over(state);
}

/// Weapons the demo rotates through (the ray would starve its energy)
const IDLE_ROTATION: [u8; 6] = [1, 2, 4, 5, 6, 7];
/// Ticks between demo weapon swaps
const IDLE_SWAP_TICKS: u64 = 600;

/// Demo AI: shoot the nearest enemy, back away from contact, grab pickups
fn drive_idle(state: &GameState, input: &mut TickInput) {
    let player = &state.player;
    let me = player.body.center();

    let slot = (state.time_ticks / IDLE_SWAP_TICKS) as usize % IDLE_ROTATION.len();
    input.weapon_select = Some(IDLE_ROTATION[slot]);

    let nearest = state.enemies.iter().min_by(|a, b| {
        let dist_a = a.body.center().distance_squared(me);
        let dist_b = b.body.center().distance_squared(me);
        dist_a
            .partial_cmp(&dist_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    input.move_left = false;
    input.move_right = false;
    input.fire = false;

    if let Some(enemy) = nearest {
        let target = enemy.body.center();
        input.aim = Some(target);
        input.fire = true;

        let dx = target.x - me.x;
        if dx.abs() < 180.0 {
            // Back off toward open ground
            let away_right = dx < 0.0;
            let room_right = me.x < state.tuning.arena_width - 80.0;
            let room_left = me.x > 80.0;
            if (away_right && room_right) || !room_left {
                input.move_right = true;
            } else {
                input.move_left = true;
            }
            input.jump = dx.abs() < 70.0 && !player.airborne;
        } else {
            input.jump = false;
        }
    } else if let Some(pickup) = state.power_ups.iter().next() {
        let dx = pickup.body.center().x - me.x;
        input.move_right = dx > 5.0;
        input.move_left = dx < -5.0;
        input.jump = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(12345, Tuning::default())
    }

    #[test]
    fn test_tick_advances_clock_only_when_live() {
        let mut s = state();
        tick(&mut s, &TickInput::default());
        assert_eq!(s.time_ticks, 1);
        assert!((s.clock_ms - TICK_MS).abs() < 1e-9);

        s.wave.phase = GamePhase::Shop;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.time_ticks, 1);
    }

    #[test]
    fn test_tick_pause() {
        let mut s = state();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause);
        assert!(s.wave.paused);
        let frozen = s.player.body.pos;

        // Held pause keeps the game frozen
        for _ in 0..10 {
            tick(&mut s, &pause);
        }
        assert!(s.wave.paused);
        assert_eq!(s.player.body.pos, frozen);
        assert_eq!(s.time_ticks, 0);

        tick(&mut s, &TickInput::default());
        tick(&mut s, &pause);
        assert!(!s.wave.paused);
    }

    #[test]
    fn test_weapon_select_and_switch_event() {
        let mut s = state();
        let pick = TickInput {
            weapon_select: Some(4),
            ..Default::default()
        };
        tick(&mut s, &pick);
        assert_eq!(s.player.weapon, WeaponKind::Shotgun);
        tick(&mut s, &pick);
        let switches = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::WeaponSwitched(_)))
            .count();
        assert_eq!(switches, 1);

        // Out-of-range slots are ignored
        tick(
            &mut s,
            &TickInput {
                weapon_select: Some(9),
                ..Default::default()
            },
        );
        assert_eq!(s.player.weapon, WeaponKind::Shotgun);
    }

    #[test]
    fn test_ray_cleared_when_released() {
        let mut s = state();
        let hold = TickInput {
            fire: true,
            weapon_select: Some(3),
            ..Default::default()
        };
        tick(&mut s, &hold);
        assert!(s.ray.is_some());
        tick(&mut s, &TickInput::default());
        assert!(s.ray.is_none());
    }

    #[test]
    fn test_boss_fight_spawns_boss_on_tick() {
        let mut s = state();
        s.tuning.spawn_rate_base = 0.0;
        s.tuning.spawn_rate_per_level = 0.0;
        s.wave.level = 5;
        s.wave.phase = GamePhase::BossFight;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies.get(0).unwrap().kind, EnemyKind::Boss);
        assert!(s.events.contains(&GameEvent::BossSpawned { level: 5 }));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = state();
        let mut state2 = state();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        assert_eq!(state1.player.health, state2.player.health);
    }

    #[test]
    fn test_idle_mode_fights_back() {
        let mut s = state();
        s.tuning.spawn_rate_base = 0.05;
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3600 {
            tick(&mut s, &input);
        }
        assert!(s.score > 0);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (
            any::<[bool; 5]>(),
            proptest::option::of(0u8..9),
            proptest::option::of((0.0f32..1280.0, 0.0f32..720.0)),
        )
            .prop_map(|(b, slot, aim)| TickInput {
                move_left: b[0],
                move_right: b[1],
                jump: b[2],
                fire: b[3],
                pause: b[4],
                weapon_select: slot,
                aim: aim.map(|(x, y)| Vec2::new(x, y)),
                idle_mode: false,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_resources_stay_clamped(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(arb_input(), 1..400),
        ) {
            let mut tuning = Tuning::default();
            tuning.spawn_rate_base = 0.2;
            let mut s = GameState::new(seed, tuning);
            for input in &inputs {
                tick(&mut s, input);
                let p = &s.player;
                let up = &p.upgrades;
                prop_assert!(p.health >= 0.0 && p.health <= up.health_max);
                prop_assert!(p.shield >= 0.0 && p.shield <= up.shield_max);
                prop_assert!(p.energy >= 0.0 && p.energy <= up.energy_max);
                prop_assert!((0.0..=100.0).contains(&p.health_pct()));
            }
        }

        #[test]
        fn prop_fire_rate_never_exceeded(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(arb_input(), 1..400),
        ) {
            let mut s = GameState::new(seed, Tuning::default());
            let mut last_fired: [Option<f64>; 7] = [None; 7];
            for input in &inputs {
                tick(&mut s, input);
                for event in s.drain_events() {
                    if let GameEvent::WeaponFired(kind) = event {
                        let Some(limit) = s.player.upgrades.fire_limit_ms(kind) else {
                            continue;
                        };
                        if let Some(last) = last_fired[kind.index()] {
                            prop_assert!(s.clock_ms - last >= limit);
                        }
                        last_fired[kind.index()] = Some(s.clock_ms);
                    }
                }
            }
        }
    }
}
