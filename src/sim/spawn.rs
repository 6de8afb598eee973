//! Meteor spawner

use glam::Vec2;
use rand::Rng;

use super::state::{Meteor, StormState};
use crate::Settings;
use crate::consts::*;

/// Probability that a meteor spawns on a given tick
pub fn spawn_probability(intensity: u32) -> f32 {
    intensity as f32 * SPAWN_RATE_PER_INTENSITY
}

/// Roll once and spawn at most one meteor. Returns true if one was created.
///
/// `time_secs` drives the shared horizontal sway so concurrently falling
/// meteors drift together.
pub fn maybe_spawn(state: &mut StormState, settings: &Settings, time_secs: f64) -> bool {
    if !state.active {
        return false;
    }
    if state.rng.random::<f32>() >= spawn_probability(settings.intensity) {
        return false;
    }
    let meteor = create_meteor(state, settings, time_secs);
    state.meteors.push(meteor);
    true
}

/// Build a meteor just above the visible area
pub fn create_meteor(state: &mut StormState, settings: &Settings, time_secs: f64) -> Meteor {
    let rng = &mut state.rng;
    let width = state.viewport.width;

    let base_size = METEOR_BASE_SIZE + settings.meteor_size as f32 * METEOR_SIZE_STEP;
    let size = base_size + rng.random::<f32>() * base_size;

    let x = rng.random::<f32>() * (width + 2.0 * SIDE_MARGIN) - SIDE_MARGIN;
    let sway = time_secs.sin() as f32 * METEOR_SWAY;
    let vx = (rng.random::<f32>() - 0.5) * 2.0 * METEOR_MAX_VX + sway;
    let vy = METEOR_MIN_VY + rng.random::<f32>() * (METEOR_MAX_VY - METEOR_MIN_VY);

    let mut meteor = Meteor::new(Vec2::new(x, SPAWN_Y), Vec2::new(vx, vy), size, settings.meteor_kind);
    meteor.rotation_speed = (rng.random::<f32>() - 0.5) * 2.0 * METEOR_MAX_SPIN;
    meteor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{MeteorKind, Viewport};

    fn active_state(seed: u64) -> StormState {
        let mut state = StormState::new(seed, Viewport::new(1000.0, 700.0));
        state.active = true;
        state
    }

    #[test]
    fn test_inactive_never_spawns() {
        let mut state = StormState::new(1, Viewport::new(1000.0, 700.0));
        let settings = Settings {
            intensity: 10,
            ..Default::default()
        };
        for _ in 0..1000 {
            assert!(!maybe_spawn(&mut state, &settings, 0.0));
        }
        assert!(state.meteors.is_empty());
    }

    #[test]
    fn test_at_most_one_per_call() {
        let mut state = active_state(7);
        let settings = Settings {
            intensity: 10,
            ..Default::default()
        };
        for i in 0..500 {
            let before = state.meteors.len();
            maybe_spawn(&mut state, &settings, 0.0);
            assert!(state.meteors.len() - before <= 1, "call {i} spawned more than one");
        }
    }

    #[test]
    fn test_spawn_rate_scales_with_intensity() {
        let trials = 20_000;
        for (intensity, expected) in [(5, 0.1), (10, 0.2)] {
            let mut state = active_state(42);
            let settings = Settings {
                intensity,
                ..Default::default()
            };
            for _ in 0..trials {
                maybe_spawn(&mut state, &settings, 0.0);
            }
            let rate = state.meteors.len() as f32 / trials as f32;
            assert!(
                (rate - expected).abs() < 0.015,
                "intensity {intensity}: rate {rate} vs {expected}"
            );
        }
    }

    #[test]
    fn test_created_meteor_ranges() {
        let mut state = active_state(3);
        let settings = Settings {
            meteor_size: 3,
            meteor_kind: MeteorKind::Ice,
            ..Default::default()
        };
        for _ in 0..500 {
            let m = create_meteor(&mut state, &settings, 0.0);
            // baseSize = 10 + 3 * 5 = 25
            assert!(m.size >= 25.0 && m.size < 50.0);
            assert!(m.pos.x >= -100.0 && m.pos.x < 1100.0);
            assert_eq!(m.pos.y, SPAWN_Y);
            // sin(0) = 0, no sway
            assert!(m.vel.x >= -100.0 && m.vel.x <= 100.0);
            assert!(m.vel.y >= 200.0 && m.vel.y < 500.0);
            assert!(m.rotation_speed.abs() <= 2.5);
            assert_eq!(m.rotation, 0.0);
            assert_eq!(m.kind, MeteorKind::Ice);
            assert!(m.trail.is_empty());
        }
    }

    #[test]
    fn test_sway_shifts_horizontal_velocity() {
        let settings = Settings::default();
        let quarter_turn = std::f64::consts::FRAC_PI_2;
        let mut a = active_state(11);
        let mut b = active_state(11);
        let still = create_meteor(&mut a, &settings, 0.0);
        let swayed = create_meteor(&mut b, &settings, quarter_turn);
        assert!((swayed.vel.x - still.vel.x - METEOR_SWAY).abs() < 1e-3);
    }
}
