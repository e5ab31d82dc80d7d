//! Cosmetic debris
//!
//! Particles never affect gameplay. The pool is bounded by the quality
//! setting and evicts the oldest entry when full.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::{Body, Rgb};
use super::pool::Pool;
use super::state::{GameState, Particle};
use crate::consts::EXPLOSION_PARTICLES;

const PARTICLE_LIFE: u32 = 60;
const SCATTER_SPEED: f32 = 7.5;
const GRAVITY_SCALE: f32 = 0.3;
const GROUND_BOUNCE: f32 = -0.4;
const GROUND_FRICTION: f32 = 0.8;

/// Throw a burst of debris around `pos`
pub fn spawn_burst(particles: &mut Pool<Particle>, rng: &mut Pcg32, pos: Vec2) {
    for _ in 0..EXPLOSION_PARTICLES {
        let vel = Vec2::new(
            rng.random_range(-SCATTER_SPEED..SCATTER_SPEED),
            rng.random_range(-SCATTER_SPEED..SCATTER_SPEED),
        );
        let size = rng.random_range(8.0..16.0);
        let color = Rgb::DEBRIS[rng.random_range(0..Rgb::DEBRIS.len())];
        let rotation = rng.random_range(0.0..std::f32::consts::TAU);
        let rotation_vel = rng.random_range(-0.1..0.1);

        particles.spawn(|_| Particle {
            body: Body::centered(pos, Vec2::splat(size), color).with_vel(vel),
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            rotation,
            rotation_vel,
        });
    }
}

/// Age, spin and drop every particle; bounce softly off the ground
pub fn advance_particles(state: &mut GameState) {
    let gravity = state.tuning.gravity * GRAVITY_SCALE;
    let ground_y = state.ground_y();

    state.particles.retain(|p| {
        p.body.vel.y += gravity;
        p.body.integrate();
        p.rotation += p.rotation_vel;

        if p.body.below_ground(ground_y) {
            p.body.rest_on_ground(ground_y);
            p.body.vel.y *= GROUND_BOUNCE;
            p.body.vel.x *= GROUND_FRICTION;
        }

        p.life = p.life.saturating_sub(1);
        p.life > 0
    });
}
