//! Player controller
//!
//! Turns held intents into arcade physics, regenerates energy and shield,
//! counts down timed power-ups and owns the damage intake rule.

use super::state::{ActivePowerUp, GameEvent, GamePhase, GameState, Player, PowerUpKind};
use super::tick::TickInput;
use crate::consts::MOVE_DAMPING;
use crate::tuning::Tuning;

/// Advance player physics and resources by one live tick
pub fn update_player(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    let ground_y = tuning.ground_y();
    let arena_width = tuning.arena_width;
    let now = state.clock_ms;
    let player = &mut state.player;

    // Horizontal: set directly from intent, damp when idle
    let move_speed = tuning.player_speed * player.upgrades.speed_mult;
    if input.move_left && !input.move_right {
        player.body.vel.x = -move_speed;
        player.facing_right = false;
    } else if input.move_right && !input.move_left {
        player.body.vel.x = move_speed;
        player.facing_right = true;
    } else {
        player.body.vel.x *= MOVE_DAMPING;
    }

    // Jump fires on the rising edge only, and never mid-air
    let jump_pressed = input.jump && !player.jump_held;
    player.jump_held = input.jump;
    if jump_pressed && !player.airborne {
        player.body.vel.y = tuning.jump_impulse;
        player.airborne = true;
    }

    player.body.vel.y += tuning.gravity;
    player.body.integrate();

    if player.body.below_ground(ground_y) {
        player.body.rest_on_ground(ground_y);
        player.body.vel.y = 0.0;
        player.airborne = false;
    }
    let max_x = (arena_width - player.body.size.x).max(0.0);
    player.body.pos.x = player.body.pos.x.clamp(0.0, max_x);

    regenerate(player, tuning, now);
    tick_power_up(player);
    player.clamp_resources();
}

/// Energy every tick; shield only after the post-hit cooldown
fn regenerate(player: &mut Player, tuning: &Tuning, now_ms: f64) {
    let energy_rate = if player.has_power_up(PowerUpKind::InfiniteEnergy) {
        tuning.infinite_energy_regen
    } else {
        tuning.energy_regen
    };
    player.energy = (player.energy + energy_rate).min(player.upgrades.energy_max);

    let cooled_down = player
        .last_hit_ms
        .is_none_or(|hit| now_ms - hit >= tuning.shield_regen_delay_ms);
    if cooled_down {
        player.shield =
            (player.shield + player.upgrades.shield_regen_rate).min(player.upgrades.shield_max);
    }
}

fn tick_power_up(player: &mut Player) {
    if let Some(active) = &mut player.power_up {
        active.ticks_left = active.ticks_left.saturating_sub(1);
        if active.ticks_left == 0 {
            log::debug!("Power-up {:?} expired", active.kind);
            player.power_up = None;
        }
    }
}

/// Apply incoming damage: shield absorbs first, overflow carries 1:1 into health.
///
/// Returns the health actually lost.
pub fn apply_damage(player: &mut Player, amount: f32, now_ms: f64) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    player.last_hit_ms = Some(now_ms);

    let shield_after = player.shield - amount;
    let overflow = (-shield_after).max(0.0);
    player.shield = shield_after.max(0.0);

    let before = player.health;
    player.health = (player.health - overflow).max(0.0);
    before - player.health
}

/// Apply a picked-up power-up's effect
pub fn apply_power_up(player: &mut Player, kind: PowerUpKind, tuning: &Tuning) {
    match kind {
        PowerUpKind::Heal => {
            player.health = (player.health + tuning.heal_amount).min(player.upgrades.health_max);
        }
        PowerUpKind::ShieldRefill => {
            player.shield = player.upgrades.shield_max;
        }
        PowerUpKind::DoubleDamage | PowerUpKind::InfiniteEnergy => {
            player.power_up = Some(ActivePowerUp {
                kind,
                ticks_left: tuning.power_up_ticks,
            });
        }
    }
}

/// Transition to game over the first time health reaches zero
pub fn check_game_over(state: &mut GameState) -> bool {
    if state.player.is_alive() || state.wave.phase == GamePhase::GameOver {
        return false;
    }
    state.player.health = 0.0;
    state.wave.phase = GamePhase::GameOver;
    state.ray = None;
    log::info!(
        "Game over on level {} with score {}",
        state.wave.level,
        state.score
    );
    state.events.push(GameEvent::GameOver { score: state.score });
    true
}
