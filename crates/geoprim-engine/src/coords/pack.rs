//! Packing between `Vec3` lists and flat `f32` buffers.

use glam::Vec3;

/// Components per packed position.
pub const COMPONENTS: usize = 3;

/// Packs positions into a new flat buffer.
pub fn pack(points: &[Vec3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * COMPONENTS);
    pack_into(points, &mut out);
    out
}

/// Appends packed positions to `out`.
pub fn pack_into(points: &[Vec3], out: &mut Vec<f32>) {
    out.reserve(points.len() * COMPONENTS);
    for p in points {
        out.extend_from_slice(&[p.x, p.y, p.z]);
    }
}

/// Iterates positions of a packed buffer. A trailing partial triple is ignored.
pub fn unpack(packed: &[f32]) -> impl Iterator<Item = Vec3> + '_ {
    packed
        .chunks_exact(COMPONENTS)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
}

/// Number of whole positions in a packed buffer.
#[inline]
pub fn point_count(packed: &[f32]) -> usize {
    packed.len() / COMPONENTS
}
