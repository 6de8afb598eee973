//! Simulation driver
//!
//! One tick runs to completion: spawn, integrate meteors, integrate
//! particles, then resolve the impacts found this tick. Control calls
//! (start/stop/reset/settings) take effect at the next tick boundary.

use serde::Serialize;

use super::event::SimEvent;
use super::impact::resolve_impact;
use super::integrate::{step_meteors, step_particles};
use super::spawn::maybe_spawn;
use super::state::{Meteor, MeteorKind, Particle, SessionStats, StormState, Viewport};
use crate::Settings;

/// Per-tick inputs from outside the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Wall-clock time in seconds. Drives the spawn sway and rainbow colour;
    /// tests pass fixed values for reproducible runs.
    pub time_secs: f64,
}

/// Serializable summary of the running storm
#[derive(Debug, Clone, Serialize)]
pub struct StormSnapshot {
    pub active: bool,
    pub meteor_count: u32,
    pub impact_power: u64,
    pub destruction_level: &'static str,
    pub live_meteors: usize,
    pub live_particles: usize,
    pub time_ticks: u64,
    pub settings: Settings,
}

/// The meteor storm: state, settings and the pending event queue
pub struct Simulation {
    state: StormState,
    settings: Settings,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self::with_settings(seed, viewport, Settings::default())
    }

    pub fn with_settings(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        Self {
            state: StormState::new(seed, viewport),
            settings: settings.clamped(),
            events: Vec::new(),
        }
    }

    /// Advance the storm by `dt` seconds.
    ///
    /// Returns any events queued by control calls since the last tick,
    /// followed by the events produced by this tick.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.events);
        self.state.time_ticks += 1;

        maybe_spawn(&mut self.state, &self.settings, input.time_secs);
        let landed = step_meteors(&mut self.state, dt);
        step_particles(&mut self.state, dt);

        for meteor in &landed {
            resolve_impact(&mut self.state, meteor, input.time_secs, &mut events);
        }

        events
    }

    /// Enable the spawner
    pub fn start(&mut self) {
        if self.state.active {
            return;
        }
        self.state.active = true;
        log::info!("Meteor shower started");
        self.events.push(SimEvent::SessionStarted);
    }

    /// Disable the spawner; live meteors keep falling and can still impact
    pub fn stop(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.active = false;
        log::info!("Meteor shower stopped");
        self.events.push(SimEvent::SessionStopped);
    }

    /// Clear all entities and counters without changing the active flag
    pub fn reset(&mut self) {
        self.state.clear();
        log::info!("Storm reset");
        self.events.push(SimEvent::SessionReset);
    }

    /// Flip the sound flag
    pub fn toggle_sound(&mut self) {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        log::info!(
            "Sound {}",
            if self.settings.sound_enabled { "on" } else { "off" }
        );
        self.events.push(SimEvent::SoundToggled {
            enabled: self.settings.sound_enabled,
        });
    }

    pub fn set_meteor_kind(&mut self, kind: MeteorKind) {
        if self.settings.meteor_kind == kind {
            return;
        }
        self.settings.meteor_kind = kind;
        self.events.push(SimEvent::MeteorKindChanged { kind });
    }

    pub fn set_intensity(&mut self, level: u32) {
        self.settings.set_intensity(level);
    }

    pub fn set_meteor_size(&mut self, level: u32) {
        self.settings.set_meteor_size(level);
    }

    /// Replace all settings at once
    pub fn configure(&mut self, settings: Settings) {
        let settings = settings.clamped();
        if settings.meteor_kind != self.settings.meteor_kind {
            self.events.push(SimEvent::MeteorKindChanged {
                kind: settings.meteor_kind,
            });
        }
        if settings.sound_enabled != self.settings.sound_enabled {
            self.events.push(SimEvent::SoundToggled {
                enabled: settings.sound_enabled,
            });
        }
        self.settings = settings;
    }

    /// Track a new viewport size (window resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Add a meteor to the live set directly
    pub fn inject_meteor(&mut self, meteor: Meteor) {
        self.state.meteors.push(meteor);
    }

    /// Take the events queued by control calls
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stats(&self) -> SessionStats {
        self.state.stats
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.state.meteors
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn state(&self) -> &StormState {
        &self.state
    }

    pub fn snapshot(&self) -> StormSnapshot {
        let stats = self.state.stats;
        StormSnapshot {
            active: self.state.active,
            meteor_count: stats.meteor_count(),
            impact_power: stats.impact_power(),
            destruction_level: stats.tier().label(),
            live_meteors: self.state.meteors.len(),
            live_particles: self.state.particles.len(),
            time_ticks: self.state.time_ticks,
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::{DestructionTier, ParticleKind};

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> Simulation {
        Simulation::new(12345, Viewport::new(800.0, 600.0))
    }

    fn meteor_at(y: f32, vy: f32, size: f32) -> Meteor {
        Meteor::new(Vec2::new(400.0, y), Vec2::new(0.0, vy), size, MeteorKind::Normal)
    }

    #[test]
    fn test_start_stop_transitions() {
        let mut sim = sim();
        assert!(!sim.is_active());

        sim.start();
        sim.start();
        assert!(sim.is_active());
        assert_eq!(sim.drain_events(), vec![SimEvent::SessionStarted]);

        sim.stop();
        sim.stop();
        assert!(!sim.is_active());
        assert_eq!(sim.drain_events(), vec![SimEvent::SessionStopped]);
    }

    #[test]
    fn test_end_to_end_single_impact() {
        let mut sim = sim();
        sim.set_intensity(1);
        sim.start();
        // Ground line is 480
        sim.inject_meteor(meteor_at(479.0, 250.0, 45.0));

        let events = sim.tick(&TickInput::default(), 0.1);

        let stats = sim.stats();
        assert_eq!(stats.meteor_count(), 1);
        assert_eq!(stats.impact_power(), 45);
        assert_eq!(stats.destruction_index(), 0);
        assert_eq!(events[0], SimEvent::SessionStarted);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Impact { size, .. } if *size == 45.0)));

        let fresh: Vec<_> = sim
            .particles()
            .iter()
            .filter(|p| p.life == 1.0)
            .collect();
        assert_eq!(fresh.len(), 45);
        assert_eq!(
            fresh.iter().filter(|p| p.kind == ParticleKind::Impact).count(),
            25
        );
        // Any meteor left alive was spawned this tick, high above the ground
        assert!(sim.meteors().iter().all(|m| m.pos.y < 0.0));
    }

    #[test]
    fn test_new_particles_not_stepped_same_tick() {
        let mut sim = sim();
        sim.inject_meteor(meteor_at(479.0, 250.0, 30.0));
        sim.tick(&TickInput::default(), 0.1);

        assert_eq!(sim.particles().len(), 40);
        for p in sim.particles() {
            assert_eq!(p.life, 1.0);
            assert_eq!(p.pos.y, 480.0);
        }
    }

    #[test]
    fn test_stop_keeps_falling_meteors() {
        let mut sim = sim();
        sim.start();
        sim.inject_meteor(meteor_at(-50.0, 200.0, 20.0));
        sim.stop();

        let mut impacted = false;
        for _ in 0..600 {
            let events = sim.tick(&TickInput::default(), DT);
            if events.iter().any(|e| matches!(e, SimEvent::Impact { .. })) {
                impacted = true;
                break;
            }
        }
        assert!(impacted);
        assert_eq!(sim.stats().meteor_count(), 1);
        assert!(sim.meteors().is_empty());
    }

    #[test]
    fn test_reset_clears_everything_but_active_flag() {
        let mut sim = sim();
        sim.set_intensity(10);
        sim.start();
        for _ in 0..2000 {
            sim.tick(&TickInput::default(), DT);
        }
        assert!(sim.stats().meteor_count() > 0);

        sim.reset();
        assert!(sim.is_active());
        assert!(sim.meteors().is_empty());
        assert!(sim.particles().is_empty());
        assert_eq!(sim.stats(), SessionStats::default());
        assert_eq!(sim.stats().tier(), DestructionTier::Calm);
        assert_eq!(sim.drain_events().last(), Some(&SimEvent::SessionReset));

        sim.stop();
        sim.reset();
        assert!(!sim.is_active());
    }

    #[test]
    fn test_idle_storm_spawns_nothing() {
        let mut sim = sim();
        sim.set_intensity(10);
        for _ in 0..1000 {
            sim.tick(&TickInput::default(), DT);
        }
        assert!(sim.meteors().is_empty());
        assert_eq!(sim.stats().meteor_count(), 0);
    }

    #[test]
    fn test_settings_changes_queue_events() {
        let mut sim = sim();
        sim.set_meteor_kind(MeteorKind::Fire);
        sim.set_meteor_kind(MeteorKind::Fire);
        sim.toggle_sound();
        assert_eq!(
            sim.drain_events(),
            vec![
                SimEvent::MeteorKindChanged {
                    kind: MeteorKind::Fire
                },
                SimEvent::SoundToggled { enabled: false },
            ]
        );

        sim.configure(Settings {
            meteor_kind: MeteorKind::Fire,
            intensity: 50,
            meteor_size: 0,
            sound_enabled: false,
        });
        assert!(sim.drain_events().is_empty());
        assert_eq!(sim.settings().intensity, 10);
        assert_eq!(sim.settings().meteor_size, 1);
    }

    #[test]
    fn test_spawned_meteors_use_configured_kind() {
        let mut sim = sim();
        sim.set_meteor_kind(MeteorKind::Electric);
        sim.set_intensity(10);
        sim.start();
        for _ in 0..200 {
            sim.tick(&TickInput::default(), DT);
        }
        assert!(!sim.meteors().is_empty());
        assert!(sim.meteors().iter().all(|m| m.kind == MeteorKind::Electric));
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut sim = Simulation::new(99999, Viewport::new(1024.0, 768.0));
            sim.set_intensity(8);
            sim.start();
            for i in 0..3000 {
                let input = TickInput {
                    time_secs: i as f64 * DT as f64,
                };
                sim.tick(&input, DT);
            }
            sim
        };
        let a = run();
        let b = run();
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.meteors().len(), b.meteors().len());
        assert_eq!(a.particles().len(), b.particles().len());
        for (ma, mb) in a.meteors().iter().zip(b.meteors()) {
            assert_eq!(ma.pos, mb.pos);
        }
    }

    #[test]
    fn test_snapshot_json() {
        let mut sim = sim();
        sim.start();
        sim.inject_meteor(meteor_at(479.0, 250.0, 150.0));
        sim.tick(&TickInput::default(), 0.1);

        let json = serde_json::to_value(sim.snapshot()).unwrap();
        assert_eq!(json["active"], true);
        assert_eq!(json["meteor_count"], 1);
        assert_eq!(json["impact_power"], 150);
        assert_eq!(json["destruction_level"], "LIGHT");
        assert_eq!(json["settings"]["meteor_kind"], "normal");
    }
}
