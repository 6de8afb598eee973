//! Integrator: explicit Euler steps, ground detection and culling

use super::state::{Meteor, StormState};
use crate::consts::*;

/// Advance every live meteor by `dt`.
///
/// Meteors below the ground line are removed from the live set and returned
/// for impact resolution; meteors that drift past the side margins are
/// dropped silently.
pub fn step_meteors(state: &mut StormState, dt: f32) -> Vec<Meteor> {
    let ground = state.viewport.ground_line();
    let viewport = state.viewport;
    let mut landed = Vec::new();

    state.meteors.retain_mut(|meteor| {
        meteor.pos += meteor.vel * dt;
        meteor.rotation += meteor.rotation_speed * dt;
        meteor.vel.y += METEOR_GRAVITY * dt;

        if meteor.pos.y > ground {
            landed.push(meteor.clone());
            false
        } else if viewport.in_horizontal_bounds(meteor.pos.x) {
            meteor.trail.record(meteor.pos);
            true
        } else {
            false
        }
    });

    landed
}

/// Advance every live particle by `dt` and drop the expired ones.
/// Life decays by a fixed amount per tick regardless of `dt`.
pub fn step_particles(state: &mut StormState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += PARTICLE_GRAVITY * dt;
        particle.life -= particle.decay;
    }
    state.particles.retain(|p| p.life > 0.0);
}
