use crate::coords::pack::{self, COMPONENTS};
use crate::host::ScenePositionProjector;

/// Re-projects a packed position buffer through the host's scene projector.
///
/// Output has the same length as the input's whole points; one allocation.
pub fn project_2d<P>(points: &[f32], projector: &P) -> Vec<f32>
where
    P: ScenePositionProjector + ?Sized,
{
    let mut out = Vec::with_capacity(pack::point_count(points) * COMPONENTS);
    for p in pack::unpack(points) {
        let q = projector.project(p);
        out.extend_from_slice(&[q.x, q.y, q.z]);
    }
    out
}
