use glam::Vec3;

use crate::error::GeometryError;

/// Relative tolerance below which a polygon's signed area counts as zero.
const DEGENERATE_AREA_EPSILON: f64 = 1e-9;

/// Planar centroid of a simple polygon.
///
/// Uses the signed-area weighted formula on x/y; winding may be either
/// direction. The z coordinate is the mean z of the points, which is the plane
/// height for points on a constant-z plane.
///
/// Accumulates in `f64` so large coordinates do not cancel out.
pub fn polygon_centroid(points: &[Vec3]) -> Result<Vec3, GeometryError> {
    if points.len() < 3 {
        return Err(GeometryError::TooFewPoints { count: points.len() });
    }

    let mut twice_area = 0.0f64;
    let mut magnitude = 0.0f64;
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    let mut z_sum = 0.0f64;

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let (px, py) = (p.x as f64, p.y as f64);
        let (qx, qy) = (q.x as f64, q.y as f64);

        let cross = px * qy - qx * py;
        twice_area += cross;
        magnitude += cross.abs();
        cx += (px + qx) * cross;
        cy += (py + qy) * cross;
        z_sum += p.z as f64;
    }

    if magnitude == 0.0 || twice_area.abs() <= magnitude * DEGENERATE_AREA_EPSILON {
        return Err(GeometryError::DegeneratePolygon);
    }

    // 6A = 3 * (2A)
    let scale = 1.0 / (3.0 * twice_area);
    Ok(Vec3::new(
        (cx * scale) as f32,
        (cy * scale) as f32,
        (z_sum / points.len() as f64) as f32,
    ))
}

/// Largest distance from `center` to any of `points`.
///
/// Strict `>` keeps the first farthest point on ties. Empty input yields 0.
pub fn find_radius(center: Vec3, points: &[Vec3]) -> f32 {
    let mut farthest = 0.0f32;
    for p in points {
        let distance = center.distance(*p);
        if distance > farthest {
            farthest = distance;
        }
    }
    farthest
}
