//! Meteor Storm - falling meteors, impact bursts and a destruction meter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, integration, impacts, session counters)
//! - `present`: Routing of simulation events to presentation and audio
//! - `overlay`: Self-expiring screen overlays (flash, shock wave, notification)
//! - `audio`: Sound cues with a single mute gate
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: User-adjustable storm settings

pub mod audio;
pub mod error;
pub mod overlay;
pub mod present;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::StormError;
pub use settings::Settings;

/// Storm configuration constants
pub mod consts {
    /// Nominal frame step used for the very first frame (60 Hz)
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;
    /// Longest step a single frame may advance the simulation by
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Distance from the viewport bottom to the ground line (pixels)
    pub const GROUND_OFFSET: f32 = 120.0;
    /// Horizontal margin outside the viewport where meteors spawn and are culled
    pub const SIDE_MARGIN: f32 = 100.0;
    /// Spawn height (above the visible area)
    pub const SPAWN_Y: f32 = -50.0;

    /// Meteor gravity (pixels/s²)
    pub const METEOR_GRAVITY: f32 = 300.0;
    /// Particle gravity (pixels/s²) - stronger than meteors for a snappier fall
    pub const PARTICLE_GRAVITY: f32 = 500.0;

    /// Spawn probability per tick per unit of intensity
    pub const SPAWN_RATE_PER_INTENSITY: f32 = 0.02;
    /// Base meteor size before the size setting is applied
    pub const METEOR_BASE_SIZE: f32 = 10.0;
    /// Base size added per step of the size setting
    pub const METEOR_SIZE_STEP: f32 = 5.0;
    /// Maximum horizontal spawn speed (either direction)
    pub const METEOR_MAX_VX: f32 = 100.0;
    /// Amplitude of the time-varying horizontal sway
    pub const METEOR_SWAY: f32 = 100.0;
    /// Downward spawn speed range
    pub const METEOR_MIN_VY: f32 = 200.0;
    pub const METEOR_MAX_VY: f32 = 500.0;
    /// Maximum spin speed (radians/s, either direction)
    pub const METEOR_MAX_SPIN: f32 = 2.5;
    /// Number of recent positions kept for the meteor trail
    pub const TRAIL_LENGTH: usize = 10;

    /// Impact power per destruction tier
    pub const POWER_PER_TIER: u64 = 100;

    /// Impact burst: particles = size / BURST_SIZE_DIVISOR + BURST_BASE_COUNT
    pub const BURST_SIZE_DIVISOR: f32 = 3.0;
    pub const BURST_BASE_COUNT: usize = 10;
    /// Random angular jitter added to each burst direction (radians)
    pub const BURST_ANGLE_JITTER: f32 = 0.5;
    pub const BURST_MIN_SPEED: f32 = 100.0;
    pub const BURST_MAX_SPEED: f32 = 300.0;
    /// Upward kick applied to every burst particle
    pub const BURST_UPWARD_BIAS: f32 = 100.0;
    pub const BURST_MIN_DECAY: f32 = 0.01;
    pub const BURST_MAX_DECAY: f32 = 0.02;

    /// Debris particles per impact
    pub const DEBRIS_COUNT: usize = 20;
    pub const DEBRIS_MAX_VX: f32 = 150.0;
    pub const DEBRIS_MAX_RISE: f32 = 200.0;
    pub const DEBRIS_DECAY: f32 = 0.005;
    /// Debris colour (#8b4513)
    pub const DEBRIS_COLOR: [f32; 3] = [139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0];

    /// Overlay lifetimes (milliseconds)
    pub const FLASH_MS: f64 = 800.0;
    pub const SHOCK_WAVE_MS: f64 = 1500.0;
    pub const NOTIFICATION_REVEAL_MS: f64 = 100.0;
    pub const NOTIFICATION_DISMISS_MS: f64 = 3000.0;
    pub const NOTIFICATION_REMOVE_MS: f64 = 3500.0;

    /// Settings bounds
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 10;
}

/// Convert screen pixels (origin top-left, y down) to normalized device coordinates
#[inline]
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    (x / width * 2.0 - 1.0, 1.0 - y / height * 2.0)
}
