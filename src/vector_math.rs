//! # Vector and matrix primitives
//!
//! Small helpers on top of [`nalgebra`] used by the frame converters, the element
//! converters and the collision estimator:
//!
//! - 3-vector algebra (dot, cross, magnitude, normalization, hypotenuse, angle between),
//! - elementary rotations about the principal axes and about an arbitrary axis,
//! - a Cholesky factorization that reports *which* pivot failed.
//!
//! Angles are in **degrees** at the public surface, except [`rotation_matrix`] which
//! takes radians like the rest of the internal trigonometry.

use nalgebra::{Cholesky, Matrix3, Rotation3, SMatrix, Unit, Vector3};

use crate::{
    constants::{Degree, Radian},
    orbis_errors::OrbisError,
};

/// Principal axis of a Cartesian frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

/// Euclidean norm of `v`.
pub fn magnitude(v: &Vector3<f64>) -> f64 {
    v.norm()
}

/// Unit vector pointing along `v`.
///
/// Errors
/// ------
/// * [`OrbisError::DegenerateVector`] if `v` has zero magnitude.
pub fn normalize(v: &Vector3<f64>) -> Result<Vector3<f64>, OrbisError> {
    let norm = v.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(OrbisError::DegenerateVector(format!(
            "cannot normalize vector {:?} of magnitude {norm}",
            v.as_slice()
        )));
    }
    Ok(v / norm)
}

/// Hypotenuse of the right triangle whose legs are `a` and `b`: `sqrt(|a|² + |b|²)`.
pub fn hypotenuse(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.norm().hypot(b.norm())
}

/// Angle between two vectors, in degrees.
///
/// `arccos` alone cannot tell which way round the angle is measured, so both the
/// principal value θ ∈ [0°, 180°] and its complement `360° − θ` are returned; the
/// caller picks one from its own orientation information.
///
/// Errors
/// ------
/// * [`OrbisError::DegenerateVector`] if either vector has zero magnitude.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Result<(Degree, Degree), OrbisError> {
    let ua = normalize(a)?;
    let ub = normalize(b)?;
    let theta = ua.dot(&ub).clamp(-1.0, 1.0).acos().to_degrees();
    Ok((theta, 360.0 - theta))
}

/// Right-handed rotation matrix of `alpha` radians about a principal axis.
///
/// The rotation is **active**: `x' = R · x` turns the vector counter-clockwise when
/// looking down the axis toward the origin. `R.transpose()` is the inverse rotation.
pub fn rotation_matrix(axis: Axis, alpha: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&axis.unit(), alpha).into_inner()
}

/// Rotate `v` by `angle` degrees about a principal axis.
pub fn rotate_about_axis(v: &Vector3<f64>, axis: Axis, angle: Degree) -> Vector3<f64> {
    rotation_matrix(axis, angle.to_radians()) * v
}

/// Rotate `v` by `angle` degrees about an arbitrary `axis`.
///
/// Errors
/// ------
/// * [`OrbisError::DegenerateVector`] if `axis` has zero magnitude.
pub fn rotate_about(
    v: &Vector3<f64>,
    axis: &Vector3<f64>,
    angle: Degree,
) -> Result<Vector3<f64>, OrbisError> {
    let unit_axis = Unit::new_unchecked(normalize(axis)?);
    Ok(Rotation3::from_axis_angle(&unit_axis, angle.to_radians()).transform_vector(v))
}

/// Cholesky factorization of a symmetric positive-definite matrix.
///
/// Returns the lower-triangular `L` such that `L · Lᵀ = m`. Only the lower triangle
/// of `m` is read by the factorization; symmetry is a precondition.
///
/// Errors
/// ------
/// * [`OrbisError::NotPositiveDefinite`] with the index and value of the first
///   non-positive pivot. No partially filled factor is ever returned.
pub fn cholesky<const D: usize>(
    m: &SMatrix<f64, D, D>,
) -> Result<SMatrix<f64, D, D>, OrbisError> {
    match Cholesky::new(*m) {
        Some(chol) => Ok(chol.l()),
        None => Err(failing_pivot(m)),
    }
}

/// First non-positive pivot, from the leading principal minors:
/// `pivot_j = det(m[..=j, ..=j]) / det(m[..j, ..j])`.
fn failing_pivot<const D: usize>(m: &SMatrix<f64, D, D>) -> OrbisError {
    let mut previous = 1.0;
    for j in 0..D {
        let minor = m.view((0, 0), (j + 1, j + 1)).clone_owned().determinant();
        let value = minor / previous;
        if !(value > 0.0 && value.is_finite()) {
            return OrbisError::NotPositiveDefinite { pivot: j, value };
        }
        previous = minor;
    }
    // rounding made the factorization fail on a pivot the minors still see as positive
    OrbisError::NotPositiveDefinite {
        pivot: D.saturating_sub(1),
        value: 0.0,
    }
}

pub fn scale_matrix(m: &Matrix3<f64>, s: f64) -> Matrix3<f64> {
    m * s
}

pub fn transform(m: &Matrix3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    m * v
}
