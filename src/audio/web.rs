//! Web Audio synthesis
//!
//! Procedurally generated cues - no external files needed.

use rand::Rng;
use web_sys::{
    AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
};

use super::{AudioSink, SoundCue};
use crate::StormError;

/// Master output level
const MASTER_GAIN: f32 = 0.3;
/// Length of the impact noise burst (seconds)
const NOISE_SECS: f32 = 0.3;

/// Audio output backed by a browser `AudioContext`
pub struct WebAudio {
    ctx: AudioContext,
    master: GainNode,
}

impl WebAudio {
    /// Create the context and master gain (may fail outside a secure context)
    pub fn new() -> Result<Self, StormError> {
        let ctx = AudioContext::new().map_err(|e| StormError::Audio(format!("{e:?}")))?;
        let master = ctx
            .create_gain()
            .map_err(|e| StormError::Audio(format!("{e:?}")))?;
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| StormError::Audio(format!("{e:?}")))?;
        master
            .gain()
            .set_value_at_time(MASTER_GAIN, ctx.current_time())
            .ok();
        Ok(Self { ctx, master })
    }

    /// Create an oscillator feeding the master gain through its own envelope
    fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = self.ctx.create_oscillator().ok()?;
        let gain = self.ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&self.master).ok()?;

        Some((osc, gain))
    }

    /// Start - rising sine sweep
    fn play_start(&self) {
        let Some((osc, gain)) = self.create_osc(220.0, OscillatorType::Sine) else {
            return;
        };
        let t = self.ctx.current_time();

        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(440.0, t + 1.0)
            .ok();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.3, t + 0.1).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 1.0)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.0).ok();
    }

    /// Impact - bass drop plus band-passed noise crack
    fn play_impact(&self, intensity: f32) {
        let t = self.ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(60.0 + intensity, OscillatorType::Sine) {
            osc.frequency().set_value_at_time(60.0 + intensity, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        self.play_noise(intensity, t);
    }

    fn play_noise(&self, intensity: f32, t: f64) -> Option<()> {
        let rate = self.ctx.sample_rate();
        let len = (rate * NOISE_SECS) as u32;
        let buffer = self.ctx.create_buffer(1, len, rate).ok()?;
        let mut rng = rand::rng();
        let mut samples: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = self.ctx.create_buffer_source().ok()?;
        let filter = self.ctx.create_biquad_filter().ok()?;
        let gain = self.ctx.create_gain().ok()?;

        source.set_buffer(Some(&buffer));
        source.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&self.master).ok()?;

        filter.set_type(BiquadFilterType::Bandpass);
        filter
            .frequency()
            .set_value_at_time(1000.0 + intensity * 100.0, t)
            .ok();
        filter.q().set_value_at_time(5.0, t).ok();

        gain.gain().set_value_at_time(0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + NOISE_SECS as f64)
            .ok();

        source.start().ok();
        source.stop_with_when(t + NOISE_SECS as f64).ok();
        Some(())
    }
}

impl AudioSink for WebAudio {
    fn play(&self, cue: SoundCue) {
        // Resume context if suspended (browsers require user gesture)
        if self.ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }

        match cue {
            SoundCue::Start => self.play_start(),
            SoundCue::Impact { intensity } => self.play_impact(intensity),
        }
    }

    fn resume(&self) {
        let _ = self.ctx.resume();
    }

    fn set_muted(&self, muted: bool) {
        let level = if muted { 0.0 } else { MASTER_GAIN };
        self.master
            .gain()
            .set_value_at_time(level, self.ctx.current_time())
            .ok();
    }
}
