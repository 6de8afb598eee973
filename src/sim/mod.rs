//! Deterministic simulation module
//!
//! All storm logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Seeded RNG only
//! - Wall-clock time only through `TickInput`
//! - Side effects reported as `SimEvent`s

pub mod clock;
pub mod event;
pub mod impact;
pub mod integrate;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use event::SimEvent;
pub use state::{
    DestructionTier, Meteor, MeteorKind, Particle, ParticleKind, SessionStats, StormState, Trail,
    Viewport,
};
pub use tick::{Simulation, StormSnapshot, TickInput};
