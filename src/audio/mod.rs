//! Sound cues
//!
//! Cues are dispatched through a `SoundBoard`, the single place where muting
//! is enforced. The board may have no sink at all (audio unavailable), in
//! which case every cue is a silent no-op.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Meteor shower started
    Start,
    /// Meteor hit the ground; intensity is the meteor size
    Impact { intensity: f32 },
}

/// Something that can synthesize cues
pub trait AudioSink {
    fn play(&self, cue: SoundCue);

    /// Wake a suspended output (browsers need a user gesture first)
    fn resume(&self) {}

    /// Silence or restore the output, including cues already playing
    fn set_muted(&self, _muted: bool) {}
}

/// Routes cues to an optional sink, honouring the mute flag
pub struct SoundBoard {
    sink: Option<Box<dyn AudioSink>>,
    enabled: bool,
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::silent()
    }
}

impl SoundBoard {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            enabled: true,
        }
    }

    /// A board with no audio output
    pub fn silent() -> Self {
        Self {
            sink: None,
            enabled: true,
        }
    }

    pub fn has_output(&self) -> bool {
        self.sink.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Follow the session's sound setting. The sink is only told when the
    /// setting actually changes.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if let Some(sink) = &self.sink {
            sink.set_muted(!enabled);
        }
    }

    /// Play a cue. Returns true if it reached a sink.
    pub fn dispatch(&self, cue: SoundCue) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(sink) = &self.sink else {
            return false;
        };
        if cue == SoundCue::Start {
            sink.resume();
        }
        sink.play(cue);
        true
    }
}
