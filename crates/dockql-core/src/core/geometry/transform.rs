use super::GeometryError;
use nalgebra::{Point3, Rotation3, Unit, Vector3};

const MIN_AXIS_NORM: f64 = 1e-12;

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

pub fn translate(points: &[Point3<f64>], shift: &Vector3<f64>) -> Vec<Point3<f64>> {
    points.iter().map(|p| p + shift).collect()
}

/// Rotates points by `angle` radians about `axis`, pivoting on `origin`.
/// When no origin is given the points rotate about their own centroid.
pub fn rotate_about_axis(
    points: &[Point3<f64>],
    axis: &Vector3<f64>,
    angle: f64,
    origin: Option<Point3<f64>>,
) -> Result<Vec<Point3<f64>>, GeometryError> {
    let axis = Unit::try_new(*axis, MIN_AXIS_NORM)
        .ok_or(GeometryError::InvalidAxis { norm: axis.norm() })?;

    if points.is_empty() {
        return Ok(Vec::new());
    }
    let pivot = match origin {
        Some(p) => p,
        None => centroid(points).ok_or(GeometryError::EmptyPointSet)?,
    };

    let rotation = Rotation3::from_axis_angle(&axis, angle);
    Ok(points
        .iter()
        .map(|p| pivot + rotation * (p - pivot))
        .collect())
}

/// Root-mean-square deviation between two paired coordinate sets, without
/// fitting.
pub fn rmsd(left: &[Point3<f64>], right: &[Point3<f64>]) -> Result<f64, GeometryError> {
    if left.len() != right.len() {
        return Err(GeometryError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    if left.is_empty() {
        return Err(GeometryError::EmptyPointSet);
    }
    let squared_dist_sum: f64 = left
        .iter()
        .zip(right.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Ok((squared_dist_sum / left.len() as f64).sqrt())
}
