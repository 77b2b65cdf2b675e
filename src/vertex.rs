//! Flat vertex output for renderers.
//!
//! Each live particle becomes one [`ParticleVertex`] of 12 floats:
//!
//! | floats | attribute | value |
//! |--------|-----------|-------|
//! | 0..3   | position  | world position |
//! | 3..6   | color     | linear RGB |
//! | 6..9   | normal    | always `(0, 1, 0)` |
//! | 9..11  | texcoord  | always `(0.5, 0.5)` |
//! | 11     | size      | point size in pixels |
//!
//! The buffer belongs to the caller. [`fill_buffer`] only writes whole
//! vertices inside the slice it is given and never allocates.

use crate::particle::Particle;
use bytemuck::{Pod, Zeroable};

/// Floats written per particle.
pub const FLOATS_PER_PARTICLE: usize = 12;

/// Normal written for every particle.
pub const UP_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Texture coordinate written for every particle.
pub const CENTER_TEX_COORDS: [f32; 2] = [0.5, 0.5];

/// One particle as laid out in the vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub size: f32,
}

impl From<&Particle> for ParticleVertex {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position().to_array(),
            color: p.color().to_array(),
            normal: UP_NORMAL,
            tex_coords: CENTER_TEX_COORDS,
            size: p.size(),
        }
    }
}

/// Location, component count, and float offset of one vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: usize,
    pub offset: usize,
}

/// Attribute layout of [`ParticleVertex`], in float units.
#[rustfmt::skip]
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 5] = [
    VertexAttribute { location: 0, components: 3, offset: 0 },
    VertexAttribute { location: 1, components: 3, offset: 3 },
    VertexAttribute { location: 2, components: 3, offset: 6 },
    VertexAttribute { location: 3, components: 2, offset: 9 },
    VertexAttribute { location: 4, components: 1, offset: 11 },
];

/// Write `particles` into `buffer` from offset 0 and return how many were written.
///
/// If `buffer` is too short for every particle, only the whole vertices that
/// fit are written. Nothing past `count * FLOATS_PER_PARTICLE` is touched.
pub fn fill_buffer(particles: &[Particle], buffer: &mut [f32]) -> usize {
    let count = particles.len().min(buffer.len() / FLOATS_PER_PARTICLE);
    let vertices: &mut [ParticleVertex] =
        bytemuck::cast_slice_mut(&mut buffer[..count * FLOATS_PER_PARTICLE]);

    for (vertex, particle) in vertices.iter_mut().zip(particles) {
        *vertex = ParticleVertex::from(particle);
    }

    count
}
