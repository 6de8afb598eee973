//! Storm state and entity types
//!
//! Meteors and particles are plain data; all behaviour lives in the
//! spawn/integrate/impact systems.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::StormError;
use crate::consts::*;

/// Meteor flavour. Only affects colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeteorKind {
    #[default]
    Normal,
    Fire,
    Ice,
    Electric,
    Plasma,
    Rainbow,
}

impl MeteorKind {
    pub const ALL: [MeteorKind; 6] = [
        MeteorKind::Normal,
        MeteorKind::Fire,
        MeteorKind::Ice,
        MeteorKind::Electric,
        MeteorKind::Plasma,
        MeteorKind::Rainbow,
    ];

    /// Value used by the type select control
    pub fn as_str(&self) -> &'static str {
        match self {
            MeteorKind::Normal => "normal",
            MeteorKind::Fire => "fire",
            MeteorKind::Ice => "ice",
            MeteorKind::Electric => "electric",
            MeteorKind::Plasma => "plasma",
            MeteorKind::Rainbow => "rainbow",
        }
    }

    /// Human-readable name for notifications
    pub fn display_name(&self) -> &'static str {
        match self {
            MeteorKind::Normal => "Normal Meteor",
            MeteorKind::Fire => "Fire Meteor",
            MeteorKind::Ice => "Ice Meteor",
            MeteorKind::Electric => "Electric Meteor",
            MeteorKind::Plasma => "Plasma Meteor",
            MeteorKind::Rainbow => "Rainbow Meteor",
        }
    }

    /// RGB colour (0-1). Rainbow cycles with wall-clock time.
    pub fn color(&self, time_secs: f64) -> [f32; 3] {
        let rgb = |r: u8, g: u8, b: u8| [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
        match self {
            MeteorKind::Normal => rgb(255, 107, 53),
            MeteorKind::Fire => rgb(255, 0, 0),
            MeteorKind::Ice => rgb(173, 216, 230),
            MeteorKind::Electric => rgb(255, 255, 0),
            MeteorKind::Plasma => rgb(128, 0, 255),
            MeteorKind::Rainbow => {
                let ms = time_secs * 1000.0;
                let channel = |k: f64| ((ms * k).sin() * 127.0 + 128.0).floor() as f32 / 255.0;
                [channel(0.01), channel(0.013), channel(0.017)]
            }
        }
    }
}

impl FromStr for MeteorKind {
    type Err = StormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        MeteorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| StormError::UnknownMeteorKind(s.to_string()))
    }
}

/// Bounded history of recent positions, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Append a position, evicting the oldest once full
    pub fn record(&mut self, pos: Vec2) {
        if self.points.len() == TRAIL_LENGTH {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

/// A falling meteor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub rotation: f32,
    /// Spin in radians/sec
    pub rotation_speed: f32,
    pub kind: MeteorKind,
    #[serde(skip)]
    pub trail: Trail,
}

impl Meteor {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, kind: MeteorKind) -> Self {
        Self {
            pos,
            vel,
            size,
            rotation: 0.0,
            rotation_speed: 0.0,
            kind,
            trail: Trail::new(),
        }
    }
}

/// Particle subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Glowing burst, coloured by the meteor
    Impact,
    /// Brown ground scatter
    Debris,
}

/// A decorative particle spawned by an impact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: [f32; 3],
    /// 0-1, decreases by `decay` each tick
    pub life: f32,
    pub decay: f32,
    pub kind: ParticleKind,
}

/// Destruction level, driven purely by cumulative impact power
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DestructionTier {
    #[default]
    Calm,
    Light,
    Moderate,
    Heavy,
    Extreme,
    Apocalyptic,
}

impl DestructionTier {
    pub const ALL: [DestructionTier; 6] = [
        DestructionTier::Calm,
        DestructionTier::Light,
        DestructionTier::Moderate,
        DestructionTier::Heavy,
        DestructionTier::Extreme,
        DestructionTier::Apocalyptic,
    ];

    /// Tier for a cumulative power: min(power / 100, 5)
    pub fn from_power(power: u64) -> Self {
        let index = (power / POWER_PER_TIER).min(Self::ALL.len() as u64 - 1);
        Self::ALL[index as usize]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            DestructionTier::Calm => "CALM",
            DestructionTier::Light => "LIGHT",
            DestructionTier::Moderate => "MODERATE",
            DestructionTier::Heavy => "HEAVY",
            DestructionTier::Extreme => "EXTREME",
            DestructionTier::Apocalyptic => "APOCALYPTIC",
        }
    }
}

impl fmt::Display for DestructionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cumulative session counters, cleared only by reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    meteor_count: u32,
    impact_power: u64,
    tier: DestructionTier,
}

impl SessionStats {
    /// Count one impact of the given size.
    /// Returns the new tier if it went up.
    pub fn record_impact(&mut self, size: f32) -> Option<DestructionTier> {
        self.meteor_count += 1;
        self.impact_power += size.max(0.0).floor() as u64;

        let tier = DestructionTier::from_power(self.impact_power);
        if tier > self.tier {
            self.tier = tier;
            Some(tier)
        } else {
            None
        }
    }

    pub fn meteor_count(&self) -> u32 {
        self.meteor_count
    }

    pub fn impact_power(&self) -> u64 {
        self.impact_power
    }

    pub fn tier(&self) -> DestructionTier {
        self.tier
    }

    pub fn destruction_index(&self) -> usize {
        self.tier.index()
    }
}

/// Visible area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The y coordinate at which meteors hit the ground
    pub fn ground_line(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Whether x lies inside the horizontal cull margin
    pub fn in_horizontal_bounds(&self, x: f32) -> bool {
        x > -SIDE_MARGIN && x < self.width + SIDE_MARGIN
    }
}

/// Everything the simulation mutates each tick
#[derive(Debug, Clone)]
pub struct StormState {
    pub seed: u64,
    pub rng: Pcg32,
    /// Whether the spawner runs
    pub active: bool,
    pub meteors: Vec<Meteor>,
    pub particles: Vec<Particle>,
    pub stats: SessionStats,
    pub viewport: Viewport,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl StormState {
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            active: false,
            meteors: Vec::new(),
            particles: Vec::new(),
            stats: SessionStats::default(),
            viewport,
            time_ticks: 0,
        }
    }

    /// Drop all live entities and zero the counters
    pub fn clear(&mut self) {
        self.meteors.clear();
        self.particles.clear();
        self.stats = SessionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_keeps_newest_ten() {
        let mut trail = Trail::new();
        for i in 0..15 {
            trail.record(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), TRAIL_LENGTH);
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs.first(), Some(&5.0));
        assert_eq!(xs.last(), Some(&14.0));
    }

    #[test]
    fn test_tier_from_power() {
        assert_eq!(DestructionTier::from_power(0), DestructionTier::Calm);
        assert_eq!(DestructionTier::from_power(99), DestructionTier::Calm);
        assert_eq!(DestructionTier::from_power(100), DestructionTier::Light);
        assert_eq!(DestructionTier::from_power(450), DestructionTier::Extreme);
        assert_eq!(DestructionTier::from_power(500), DestructionTier::Apocalyptic);
        assert_eq!(DestructionTier::from_power(50_000), DestructionTier::Apocalyptic);
    }

    #[test]
    fn test_record_impact_reports_tier_up_once() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.record_impact(60.9), None);
        assert_eq!(stats.impact_power, 60);
        assert_eq!(stats.record_impact(45.0), Some(DestructionTier::Light));
        assert_eq!(stats.record_impact(10.0), None);
        assert_eq!(stats.meteor_count, 3);
        assert_eq!(stats.impact_power, 115);
        assert_eq!(stats.destruction_index(), 1);
    }

    #[test]
    fn test_record_impact_can_skip_tiers() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.record_impact(320.0), Some(DestructionTier::Heavy));
    }

    #[test]
    fn test_meteor_kind_parse() {
        assert_eq!("plasma".parse::<MeteorKind>(), Ok(MeteorKind::Plasma));
        assert_eq!(" Fire ".parse::<MeteorKind>(), Ok(MeteorKind::Fire));
        assert!(matches!(
            "lava".parse::<MeteorKind>(),
            Err(StormError::UnknownMeteorKind(_))
        ));
    }

    #[test]
    fn test_rainbow_color_depends_on_time() {
        let a = MeteorKind::Rainbow.color(0.0);
        let b = MeteorKind::Rainbow.color(0.25);
        assert_ne!(a, b);
        // sin(0) * 127 + 128 = 128 for every channel at t = 0
        assert!(a.iter().all(|c| (*c - 128.0 / 255.0).abs() < 1e-6));
        assert_eq!(MeteorKind::Fire.color(0.0), MeteorKind::Fire.color(9.0));
    }

    #[test]
    fn test_ground_line_and_bounds() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.ground_line(), 480.0);
        assert!(vp.in_horizontal_bounds(-99.0));
        assert!(!vp.in_horizontal_bounds(-100.0));
        assert!(vp.in_horizontal_bounds(899.0));
        assert!(!vp.in_horizontal_bounds(900.0));
    }
}
