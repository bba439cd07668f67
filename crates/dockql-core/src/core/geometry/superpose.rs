use super::{GeometryError, RigidTransform, transform};
use nalgebra::{Matrix3, Point3, Rotation3, Translation3};

/// The result of a rigid-body superposition.
///
/// `transform` maps the moving set onto the fixed set; `rmsd` is the
/// residual deviation after applying it.
#[derive(Debug, Clone)]
pub struct Superposition {
    /// The optimal rigid motion from the moving frame to the fixed frame.
    pub transform: RigidTransform,
    /// Root-mean-square deviation after the fit, in Angstroms.
    pub rmsd: f64,
}

impl Superposition {
    /// Applies the fitted motion to an arbitrary coordinate set.
    pub fn apply(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.transform * p).collect()
    }
}

/// Computes the rigid transform that best superposes `moving` onto `fixed`
/// in the least-squares sense (Kabsch).
///
/// Both sets are centered, the cross-covariance matrix is decomposed by
/// SVD, and the sign of the last singular vector is flipped whenever the
/// raw solution would be a reflection, so the returned rotation is always
/// proper (determinant +1) even for mirror-image correspondences.
///
/// # Errors
///
/// Returns [`GeometryError::DimensionMismatch`] when the sets differ in
/// length and [`GeometryError::InsufficientOverlap`] when fewer than 3
/// pairs are available; with 1 or 2 pairs the rotation is underdetermined.
/// Three or more pairs that happen to be collinear are accepted: the spin
/// about their common line is undetermined, but every solution reaches the
/// same minimal residual and the returned rotation is still proper.
pub fn superpose(
    moving: &[Point3<f64>],
    fixed: &[Point3<f64>],
) -> Result<Superposition, GeometryError> {
    if moving.len() != fixed.len() {
        return Err(GeometryError::DimensionMismatch {
            left: moving.len(),
            right: fixed.len(),
        });
    }
    if moving.len() < 3 {
        return Err(GeometryError::InsufficientOverlap {
            points: moving.len(),
        });
    }

    let moving_centroid_sum: nalgebra::Vector3<f64> = moving.iter().map(|p| p.coords).sum();
    let moving_centroid = Point3::from(moving_centroid_sum / moving.len() as f64);
    let fixed_centroid_sum: nalgebra::Vector3<f64> = fixed.iter().map(|p| p.coords).sum();
    let fixed_centroid = Point3::from(fixed_centroid_sum / fixed.len() as f64);

    let centered_moving: Vec<_> = moving.iter().map(|p| p - moving_centroid).collect();
    let centered_fixed: Vec<_> = fixed.iter().map(|p| p - fixed_centroid).collect();

    let h = centered_moving
        .iter()
        .zip(centered_fixed.iter())
        .fold(Matrix3::zeros(), |acc, (m, f)| acc + f * m.transpose());

    let svd = h.svd(true, true);
    let u = svd.u.unwrap();
    let v_t = svd.v_t.unwrap();

    let d = (u * v_t.transpose()).determinant();
    let mut correction = Matrix3::identity();
    if d < 0.0 {
        correction[(2, 2)] = -1.0;
    }

    let rotation_matrix = u * correction * v_t;
    let rotation = Rotation3::from_matrix(&rotation_matrix);
    let translation = fixed_centroid.coords - rotation * moving_centroid.coords;

    let fit = RigidTransform::from_parts(Translation3::from(translation), rotation);
    let fitted: Vec<_> = moving.iter().map(|p| fit * p).collect();
    let rmsd = transform::rmsd(&fitted, fixed)?;

    Ok(Superposition {
        transform: fit,
        rmsd,
    })
}
