//! Scene tessellation: meteors, particles and ground in screen pixels

use std::f32::consts::TAU;

use glam::Vec2;

use super::shapes::{circle, polyline, radial_gradient, rect};
use super::vertex::{Vertex, colors};
use crate::sim::{Meteor, Particle, ParticleKind, Viewport};

const METEOR_SEGMENTS: u32 = 24;
const PARTICLE_SEGMENTS: u32 = 8;

/// Build the full frame: ground, then meteors, then particles on top
pub fn build_scene(
    meteors: &[Meteor],
    particles: &[Particle],
    viewport: Viewport,
    time_secs: f64,
) -> Vec<Vertex> {
    let mut vertices = ground_vertices(viewport);
    for meteor in meteors {
        vertices.extend(meteor_vertices(meteor, time_secs));
    }
    for particle in particles {
        vertices.extend(particle_vertices(particle));
    }
    vertices
}

/// Ground band from the ground line to the bottom edge, with a lit rim
pub fn ground_vertices(viewport: Viewport) -> Vec<Vertex> {
    let top = viewport.ground_line();
    let mut vertices = rect(
        Vec2::new(0.0, top),
        Vec2::new(viewport.width, viewport.height),
        colors::GROUND,
    );
    vertices.extend(rect(
        Vec2::new(0.0, top),
        Vec2::new(viewport.width, top + 2.0),
        colors::GROUND_EDGE,
    ));
    vertices
}

/// Trail, glow, core and three surface spots
pub fn meteor_vertices(meteor: &Meteor, time_secs: f64) -> Vec<Vertex> {
    let rgb = meteor.kind.color(time_secs);
    let size = meteor.size;
    let mut vertices = Vec::new();

    let trail: Vec<Vec2> = meteor.trail.iter().copied().collect();
    vertices.extend(polyline(&trail, size * 0.3, colors::with_alpha(rgb, 0.3)));

    vertices.extend(radial_gradient(
        meteor.pos,
        size * 1.5,
        colors::with_alpha(rgb, 0.8),
        colors::with_alpha(rgb, 0.0),
        METEOR_SEGMENTS,
    ));
    vertices.extend(circle(
        meteor.pos,
        size * 0.6,
        colors::with_alpha(rgb, 1.0),
        METEOR_SEGMENTS,
    ));

    let spot = colors::with_alpha([rgb[0] * 0.6, rgb[1] * 0.6, rgb[2] * 0.6], 1.0);
    for i in 0..3 {
        let angle = meteor.rotation + i as f32 / 3.0 * TAU;
        let offset = Vec2::from_angle(angle) * size * 0.3;
        vertices.extend(circle(meteor.pos + offset, size * 0.1, spot, PARTICLE_SEGMENTS));
    }

    vertices
}

/// Disc faded by remaining life; impact particles get a halo
pub fn particle_vertices(particle: &Particle) -> Vec<Vertex> {
    let alpha = particle.life.clamp(0.0, 1.0);
    let mut vertices = Vec::new();

    if particle.kind == ParticleKind::Impact {
        vertices.extend(radial_gradient(
            particle.pos,
            particle.size * 2.5,
            colors::with_alpha(particle.color, alpha * 0.5),
            colors::with_alpha(particle.color, 0.0),
            PARTICLE_SEGMENTS,
        ));
    }
    vertices.extend(circle(
        particle.pos,
        particle.size,
        colors::with_alpha(particle.color, alpha),
        PARTICLE_SEGMENTS,
    ));

    vertices
}
