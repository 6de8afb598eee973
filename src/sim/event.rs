//! Events emitted by the simulation for the presentation layer

use serde::Serialize;

use super::state::{DestructionTier, MeteorKind};

/// Something the presentation or audio layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SimEvent {
    /// Spawner enabled
    SessionStarted,
    /// Spawner disabled (live entities keep falling)
    SessionStopped,
    /// Entities and counters cleared
    SessionReset,
    /// New meteors will use a different kind
    MeteorKindChanged { kind: MeteorKind },
    /// A meteor hit the ground
    Impact {
        x: f32,
        ground_y: f32,
        size: f32,
        kind: MeteorKind,
    },
    /// Cumulative power crossed into a higher tier
    TierChanged { tier: DestructionTier },
    /// Sound cues were muted or unmuted
    SoundToggled { enabled: bool },
}
