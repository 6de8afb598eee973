//! Presentation boundary
//!
//! The simulation only emits `SimEvent`s. `route_events` turns them into
//! calls on a `PresentationSink` (canvas, overlays, labels) and cues on the
//! `SoundBoard`. Audio is only triggered from here, never from rendering.

use crate::audio::{SoundBoard, SoundCue};
use crate::sim::{DestructionTier, Meteor, Particle, SimEvent, Simulation};

/// Everything the storm needs from the page
pub trait PresentationSink {
    /// Draw one frame of meteors and particles
    fn render_frame(&mut self, meteors: &[Meteor], particles: &[Particle], time_secs: f64);
    /// Self-expiring flash centred on (x, y)
    fn show_flash(&mut self, x: f32, y: f32, size: f32);
    /// Self-expiring shock wave centred on (x, y)
    fn show_shock_wave(&mut self, x: f32, y: f32, size: f32);
    /// Self-expiring banner
    fn show_notification(&mut self, title: &str, text: &str);
    /// Refresh the counter labels
    fn update_counters(&mut self, meteor_count: u32, impact_power: u64, tier: DestructionTier);
    /// Drop all pending flashes and shock waves
    fn clear_effects(&mut self);
    /// Session indicator (sound visualizer)
    fn set_session_active(&mut self, _active: bool) {}
    /// Mute button icon
    fn set_sound_enabled(&mut self, _enabled: bool) {}
}

/// Apply a batch of simulation events.
///
/// `storm` is the simulation after the batch was produced. Its sound setting
/// gates every cue in the batch, and counter labels are refreshed once from
/// its stats if any event changed them.
pub fn route_events(
    events: &[SimEvent],
    storm: &Simulation,
    sink: &mut impl PresentationSink,
    sound: &mut SoundBoard,
) {
    sound.set_enabled(storm.settings().sound_enabled);
    let mut counters_dirty = false;

    for event in events {
        match *event {
            SimEvent::SessionStarted => {
                sound.dispatch(SoundCue::Start);
                sink.show_notification("Meteor Shower Started", "Meteor fall simulation started");
                sink.set_session_active(true);
            }
            SimEvent::SessionStopped => {
                sink.show_notification("Stopped", "Meteor fall stopped");
                sink.set_session_active(false);
            }
            SimEvent::SessionReset => {
                sink.clear_effects();
                sink.show_notification("Reset", "All effects cleared");
                counters_dirty = true;
            }
            SimEvent::MeteorKindChanged { kind } => {
                let text = format!("Switched to {}", kind.display_name());
                sink.show_notification("Meteor Type Changed", &text);
            }
            SimEvent::Impact {
                x, ground_y, size, ..
            } => {
                sink.show_flash(x, ground_y, size);
                sink.show_shock_wave(x, ground_y, size);
                sound.dispatch(SoundCue::Impact { intensity: size });
                counters_dirty = true;
            }
            SimEvent::TierChanged { tier } => {
                let text = format!("{tier} level reached!");
                sink.show_notification("Destruction Level Up", &text);
            }
            SimEvent::SoundToggled { enabled } => {
                sink.set_sound_enabled(enabled);
            }
        }
    }

    if counters_dirty {
        let stats = storm.stats();
        sink.update_counters(stats.meteor_count(), stats.impact_power(), stats.tier());
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::Settings;
    use crate::audio::tests::RecordingSink;
    use crate::sim::{MeteorKind, TickInput, Viewport};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Flash(f32, f32, f32),
        ShockWave(f32, f32, f32),
        Notification(String),
        Counters(u32, u64, DestructionTier),
        ClearEffects,
        Active(bool),
        Sound(bool),
    }

    #[derive(Default)]
    struct RecordingPresenter {
        calls: Vec<Call>,
        frames: usize,
    }

    impl PresentationSink for RecordingPresenter {
        fn render_frame(&mut self, _meteors: &[Meteor], _particles: &[Particle], _time: f64) {
            self.frames += 1;
        }
        fn show_flash(&mut self, x: f32, y: f32, size: f32) {
            self.calls.push(Call::Flash(x, y, size));
        }
        fn show_shock_wave(&mut self, x: f32, y: f32, size: f32) {
            self.calls.push(Call::ShockWave(x, y, size));
        }
        fn show_notification(&mut self, title: &str, _text: &str) {
            self.calls.push(Call::Notification(title.to_string()));
        }
        fn update_counters(&mut self, count: u32, power: u64, tier: DestructionTier) {
            self.calls.push(Call::Counters(count, power, tier));
        }
        fn clear_effects(&mut self) {
            self.calls.push(Call::ClearEffects);
        }
        fn set_session_active(&mut self, active: bool) {
            self.calls.push(Call::Active(active));
        }
        fn set_sound_enabled(&mut self, enabled: bool) {
            self.calls.push(Call::Sound(enabled));
        }
    }

    fn board() -> (SoundBoard, RecordingSink) {
        let sink = RecordingSink::default();
        (SoundBoard::new(Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_impact_routes_effects_sound_and_counters() {
        let mut sim = Simulation::new(1, Viewport::new(800.0, 600.0));
        sim.start();
        sim.inject_meteor(Meteor::new(
            Vec2::new(200.0, 479.0),
            Vec2::new(0.0, 250.0),
            30.0,
            MeteorKind::Ice,
        ));
        let events = sim.tick(&TickInput::default(), 0.1);

        let mut presenter = RecordingPresenter::default();
        let (mut sound, sink) = board();
        route_events(&events, &sim, &mut presenter, &mut sound);

        assert_eq!(
            presenter.calls,
            vec![
                Call::Notification("Meteor Shower Started".into()),
                Call::Active(true),
                Call::Flash(200.0, 480.0, 30.0),
                Call::ShockWave(200.0, 480.0, 30.0),
                Call::Counters(1, 30, DestructionTier::Calm),
            ]
        );
        assert_eq!(
            *sink.played.borrow(),
            vec![SoundCue::Start, SoundCue::Impact { intensity: 30.0 }]
        );
    }

    #[test]
    fn test_mute_toggle_silences_later_cues() {
        let mut sim = Simulation::new(1, Viewport::new(800.0, 600.0));
        sim.toggle_sound();
        sim.start();
        let events = sim.drain_events();

        let mut presenter = RecordingPresenter::default();
        let (mut sound, sink) = board();
        route_events(&events, &sim, &mut presenter, &mut sound);

        assert!(!sound.is_enabled());
        assert!(sink.played.borrow().is_empty());
        assert_eq!(presenter.calls[0], Call::Sound(false));
    }

    #[test]
    fn test_session_built_muted_plays_nothing() {
        let settings = Settings {
            sound_enabled: false,
            ..Settings::default()
        };
        let mut sim = Simulation::with_settings(1, Viewport::new(800.0, 600.0), settings);
        sim.start();
        sim.inject_meteor(Meteor::new(
            Vec2::new(200.0, 479.0),
            Vec2::new(0.0, 250.0),
            30.0,
            MeteorKind::Fire,
        ));
        let events = sim.tick(&TickInput::default(), 0.1);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Impact { .. })));

        let mut presenter = RecordingPresenter::default();
        let (mut sound, sink) = board();
        route_events(&events, &sim, &mut presenter, &mut sound);

        assert!(!sound.is_enabled());
        assert!(sink.played.borrow().is_empty());
        assert_eq!(*sink.mutes.borrow(), vec![true]);
    }

    #[test]
    fn test_unmute_restores_cues() {
        let mut sim = Simulation::new(1, Viewport::new(800.0, 600.0));
        let (mut sound, sink) = board();
        let mut presenter = RecordingPresenter::default();

        sim.toggle_sound();
        let events = sim.drain_events();
        route_events(&events, &sim, &mut presenter, &mut sound);
        sim.toggle_sound();
        sim.start();
        let events = sim.drain_events();
        route_events(&events, &sim, &mut presenter, &mut sound);

        assert_eq!(*sink.mutes.borrow(), vec![true, false]);
        assert_eq!(*sink.played.borrow(), vec![SoundCue::Start]);
        assert_eq!(presenter.calls.last(), Some(&Call::Active(true)));
    }

    #[test]
    fn test_reset_and_tier_notifications() {
        let (mut sound, _sink) = board();
        let mut presenter = RecordingPresenter::default();
        let events = [
            SimEvent::TierChanged {
                tier: DestructionTier::Heavy,
            },
            SimEvent::SessionReset,
        ];
        let sim = Simulation::new(1, Viewport::new(800.0, 600.0));
        route_events(&events, &sim, &mut presenter, &mut sound);

        assert_eq!(
            presenter.calls,
            vec![
                Call::Notification("Destruction Level Up".into()),
                Call::ClearEffects,
                Call::Notification("Reset".into()),
                Call::Counters(0, 0, DestructionTier::Calm),
            ]
        );
    }
}
