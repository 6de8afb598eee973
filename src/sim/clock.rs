//! Frame clock: turns animation-frame timestamps into simulation steps

use crate::consts::{MAX_FRAME_DT, NOMINAL_DT};

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous frame.
    ///
    /// The first frame yields the nominal 60 Hz step. Steps are clamped to
    /// `[0, MAX_FRAME_DT]` so a throttled background tab resumes smoothly.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => NOMINAL_DT,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }
}
