//! Impact resolution: counters, tier changes and particle bursts

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::event::SimEvent;
use super::state::{Meteor, Particle, ParticleKind, StormState};
use crate::consts::*;

/// Number of burst particles for a meteor of the given size
pub fn burst_count(size: f32) -> usize {
    (size / BURST_SIZE_DIVISOR).floor() as usize + BURST_BASE_COUNT
}

/// Resolve a meteor hitting the ground.
///
/// Updates the session counters, queues the impact (and any tier change)
/// and spawns the burst and debris particles at the ground line.
/// `time_secs` fixes the colour of rainbow bursts.
pub fn resolve_impact(
    state: &mut StormState,
    meteor: &Meteor,
    time_secs: f64,
    events: &mut Vec<SimEvent>,
) {
    let ground_y = state.viewport.ground_line();

    if let Some(tier) = state.stats.record_impact(meteor.size) {
        log::info!(
            "Destruction tier reached {} (power {})",
            tier,
            state.stats.impact_power()
        );
        events.push(SimEvent::TierChanged { tier });
    }

    events.push(SimEvent::Impact {
        x: meteor.pos.x,
        ground_y,
        size: meteor.size,
        kind: meteor.kind,
    });

    let origin = Vec2::new(meteor.pos.x, ground_y);
    spawn_burst(state, origin, meteor, time_secs);
    spawn_debris(state, origin, meteor.size);

    log::debug!(
        "Impact #{} at x={:.0} size={:.1}, {} particles live",
        state.stats.meteor_count(),
        meteor.pos.x,
        meteor.size,
        state.particles.len()
    );
}

/// Radial burst in the meteor's colour, evenly spaced with some jitter
fn spawn_burst(state: &mut StormState, origin: Vec2, meteor: &Meteor, time_secs: f64) {
    let count = burst_count(meteor.size);
    let color = meteor.kind.color(time_secs);
    let rng = &mut state.rng;

    state.particles.reserve(count);
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32 + rng.random::<f32>() * BURST_ANGLE_JITTER;
        let speed = BURST_MIN_SPEED + rng.random::<f32>() * (BURST_MAX_SPEED - BURST_MIN_SPEED);
        let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - BURST_UPWARD_BIAS);

        state.particles.push(Particle {
            pos: origin,
            vel,
            size: 2.0 + rng.random::<f32>() * 4.0,
            color,
            life: 1.0,
            decay: BURST_MIN_DECAY + rng.random::<f32>() * (BURST_MAX_DECAY - BURST_MIN_DECAY),
            kind: ParticleKind::Impact,
        });
    }
}

/// Ground debris kicked up around the impact point
fn spawn_debris(state: &mut StormState, origin: Vec2, size: f32) {
    let rng = &mut state.rng;

    state.particles.reserve(DEBRIS_COUNT);
    for _ in 0..DEBRIS_COUNT {
        let x = origin.x + (rng.random::<f32>() - 0.5) * size;
        let vx = (rng.random::<f32>() - 0.5) * 2.0 * DEBRIS_MAX_VX;
        let vy = -rng.random::<f32>() * DEBRIS_MAX_RISE;

        state.particles.push(Particle {
            pos: Vec2::new(x, origin.y),
            vel: Vec2::new(vx, vy),
            size: 1.0 + rng.random::<f32>() * 3.0,
            color: DEBRIS_COLOR,
            life: 1.0,
            decay: DEBRIS_DECAY,
            kind: ParticleKind::Debris,
        });
    }
}
