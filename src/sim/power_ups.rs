//! Power-up drops lying on the field

use glam::Vec2;
use rand::Rng;

use super::body::Body;
use super::pool::EntityId;
use super::state::{GameState, PowerUp, PowerUpKind};

const POWER_UP_SIZE: f32 = 25.0;

/// Drop a power-up of a random kind centered at `pos`
pub fn drop_random(state: &mut GameState, pos: Vec2) -> Option<EntityId> {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    drop_power_up(state, pos, kind)
}

pub fn drop_power_up(state: &mut GameState, pos: Vec2, kind: PowerUpKind) -> Option<EntityId> {
    let life = state.tuning.power_up_lifetime_ticks;
    let id = state.power_ups.spawn(|id| PowerUp {
        id,
        kind,
        body: Body::centered(pos, Vec2::splat(POWER_UP_SIZE), kind.color()),
        life,
    });
    log::debug!("Dropped {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
    id
}

/// Fall to the ground and expire
pub fn advance_power_ups(state: &mut GameState) {
    let gravity = state.tuning.gravity;
    let ground_y = state.ground_y();

    state.power_ups.retain(|p| {
        p.body.vel.y += gravity;
        p.body.integrate();
        if p.body.below_ground(ground_y) {
            p.body.rest_on_ground(ground_y);
            p.body.vel = Vec2::ZERO;
        }
        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_power_up_lands_and_expires() {
        let mut state = GameState::new(9, Tuning::default());
        drop_power_up(&mut state, Vec2::new(200.0, 100.0), PowerUpKind::Heal);
        let ground_y = state.ground_y();

        for _ in 0..state.tuning.power_up_lifetime_ticks - 1 {
            advance_power_ups(&mut state);
        }
        let landed = state.power_ups.get(0).unwrap();
        assert_eq!(landed.body.bottom(), ground_y);
        assert_eq!(landed.body.vel, Vec2::ZERO);

        advance_power_ups(&mut state);
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_random_drop_uses_closed_set() {
        let mut state = GameState::new(9, Tuning::default());
        for _ in 0..50 {
            drop_random(&mut state, Vec2::new(100.0, 100.0));
        }
        assert_eq!(state.power_ups.len(), 50);
        assert!(
            state
                .power_ups
                .iter()
                .all(|p| PowerUpKind::ALL.contains(&p.kind))
        );
    }
}
