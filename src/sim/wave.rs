//! Wave/shop state machine
//!
//! ```text
//! Playing --timer out--> Shop --confirm--> Playing (level + 1)
//!    |                     ^
//!    +--timer out, boss level--> BossFight --boss dies--+
//! ```
//!
//! `paused` is orthogonal and freezes everything including the countdown.

use super::enemies::spawn_boss;
use super::state::{GameEvent, GamePhase, GameState, WaveState};
use crate::tuning::Tuning;

/// Phase change caused by the one-second countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTransition {
    /// Timer hit zero on a boss level; the next live tick spawns the boss
    BossFight,
    /// Timer hit zero on a regular level
    ShopOpened,
}

/// One real second elapsed. Touches only the wave fields.
pub fn countdown_second(wave: &mut WaveState, tuning: &Tuning) -> Option<WaveTransition> {
    if !wave.is_live() || wave.phase != GamePhase::Playing {
        // Boss fights hold the timer at zero
        return None;
    }
    if wave.time_left > 1 {
        wave.time_left -= 1;
        return None;
    }

    wave.time_left = 0;
    if tuning.is_boss_level(wave.level) {
        wave.phase = GamePhase::BossFight;
        Some(WaveTransition::BossFight)
    } else {
        enter_shop(wave, tuning);
        Some(WaveTransition::ShopOpened)
    }
}

/// Log and raise the event for a countdown transition
pub fn announce(state: &mut GameState, transition: WaveTransition) {
    let level = state.wave.level;
    match transition {
        WaveTransition::BossFight => log::info!("Level {} timer expired, boss incoming", level),
        WaveTransition::ShopOpened => {
            log::info!("Level {} cleared, shop open", level);
            state.events.push(GameEvent::ShopOpened { level });
        }
    }
}

fn enter_shop(wave: &mut WaveState, tuning: &Tuning) {
    wave.phase = GamePhase::Shop;
    wave.time_left = tuning.level_duration_secs;
    wave.boss = None;
}

/// Open the shop from inside the tick (boss defeated)
pub fn open_shop(state: &mut GameState) {
    enter_shop(&mut state.wave, &state.tuning);
    state.ray = None;
    announce(state, WaveTransition::ShopOpened);
}

/// Spawn the boss once the fight has begun and none is alive
pub fn ensure_boss(state: &mut GameState) {
    if state.wave.phase == GamePhase::BossFight && state.wave.boss.is_none() {
        spawn_boss(state);
    }
}

/// Leave the shop and start the next level on a cleared arena.
///
/// Returns false if the shop was not open.
pub fn next_level(state: &mut GameState) -> bool {
    if !state.wave.is_shop_open() {
        return false;
    }

    state.wave.level += 1;
    state.wave.phase = GamePhase::Playing;
    state.wave.time_left = state.tuning.level_duration_secs;
    state.wave.boss = None;

    state.enemies.clear();
    state.projectiles.clear();
    state.power_ups.clear();
    state.ray = None;

    let player = &mut state.player;
    player.body.pos.x = (state.tuning.arena_width - player.body.size.x) / 2.0;
    player.body.vel.x = 0.0;

    let level = state.wave.level;
    log::info!("Level {} started", level);
    state.events.push(GameEvent::LevelStarted { level });
    true
}

/// Edge-detected pause toggle. Returns true if the pause state flipped.
pub fn handle_pause(state: &mut GameState, pressed: bool) -> bool {
    let edge = pressed && !state.pause_held;
    state.pause_held = pressed;
    if !edge || state.wave.phase == GamePhase::GameOver {
        return false;
    }

    state.wave.paused = !state.wave.paused;
    let paused = state.wave.paused;
    log::info!("{}", if paused { "Paused" } else { "Resumed" });
    state.events.push(GameEvent::PauseToggled { paused });
    true
}
