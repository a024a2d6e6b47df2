//! # Monte-Carlo collision probability
//!
//! Probability that two objects pass within a hard-body radius of each other, given
//! their relative position at closest approach and the 3×3 position covariances of
//! both objects.
//!
//! ## Sampling scheme
//!
//! Both covariances are scaled by `sigma_scale` and Cholesky-factored, `C = L Lᵀ`.
//! For each trial two independent standard-normal 3-vectors `z_a`, `z_b` are drawn and
//!
//! ```text
//! A = relative_position + L_a z_a
//! B = L_b z_b
//! hit  ⇔  |A − B| ≤ hard_body_radius
//! ```
//!
//! The estimate is `hits / sample_count`. The generator is a [`StdRng`] seeded from the
//! caller's seed on every call, so a given query and seed always give the same result.

use log::debug;
use nalgebra::{Matrix3, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::{
    orbis_errors::OrbisError,
    vector_math::{cholesky, scale_matrix, transform},
};

/// Symmetric 3×3 position covariance (km²), in the RIC frame of its object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovarianceMatrix(Matrix3<f64>);

impl CovarianceMatrix {
    /// Wrap a matrix, rejecting asymmetric or non-finite input.
    ///
    /// Positive definiteness is only checked when the matrix is factored.
    pub fn new(m: Matrix3<f64>) -> Result<Self, OrbisError> {
        if m.iter().any(|x| !x.is_finite()) {
            return Err(OrbisError::InvalidParameter(
                "covariance entries must be finite".into(),
            ));
        }
        let scale = m.abs().max().max(f64::MIN_POSITIVE);
        if (m - m.transpose()).abs().max() > 1e-12 * scale {
            return Err(OrbisError::InvalidParameter(
                "covariance matrix must be symmetric".into(),
            ));
        }
        Ok(CovarianceMatrix(m))
    }

    /// Diagonal covariance from the three variances (km²).
    pub fn diagonal(radial: f64, in_track: f64, cross_track: f64) -> Self {
        CovarianceMatrix(Matrix3::from_diagonal(&Vector3::new(
            radial,
            in_track,
            cross_track,
        )))
    }

    pub fn scaled(&self, s: f64) -> Self {
        CovarianceMatrix(scale_matrix(&self.0, s))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }
}

/// Conjunction to evaluate.
///
/// * `relative_position`: position of object A relative to object B (km).
/// * `hard_body_radius`: combined radius of both objects (km), `≥ 0`.
/// * `sigma_scale`: factor applied to both covariances, `≥ 0`.
/// * `sample_count`: number of Monte-Carlo trials, `> 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionQuery {
    pub relative_position: Vector3<f64>,
    pub covariance_a: CovarianceMatrix,
    pub covariance_b: CovarianceMatrix,
    pub hard_body_radius: f64,
    pub sigma_scale: f64,
    pub sample_count: usize,
}

impl CollisionQuery {
    fn validate(&self) -> Result<(), OrbisError> {
        if self.sample_count == 0 {
            return Err(OrbisError::InvalidCollisionQuery(
                "sample_count must be > 0".into(),
            ));
        }
        if !(self.hard_body_radius >= 0.0) {
            return Err(OrbisError::InvalidCollisionQuery(format!(
                "hard_body_radius must be >= 0, got {}",
                self.hard_body_radius
            )));
        }
        if !(self.sigma_scale >= 0.0) {
            return Err(OrbisError::InvalidCollisionQuery(format!(
                "sigma_scale must be >= 0, got {}",
                self.sigma_scale
            )));
        }
        if self.relative_position.iter().any(|x| !x.is_finite()) {
            return Err(OrbisError::InvalidCollisionQuery(
                "relative_position must be finite".into(),
            ));
        }
        Ok(())
    }
}

fn standard_normal_vector(rng: &mut StdRng) -> Vector3<f64> {
    Vector3::new(
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
        rng.sample(StandardNormal),
    )
}

/// Monte-Carlo estimate of the probability of collision, in `[0, 1]`.
///
/// Errors
/// ------
/// * [`OrbisError::InvalidCollisionQuery`] if `sample_count == 0` or the radius or the
///   sigma scale is negative.
/// * [`OrbisError::NotPositiveDefinite`] if either scaled covariance cannot be factored.
pub fn collision_probability(query: &CollisionQuery, seed: u64) -> Result<f64, OrbisError> {
    query.validate()?;

    let l_a = cholesky(query.covariance_a.scaled(query.sigma_scale).matrix())?;
    let l_b = cholesky(query.covariance_b.scaled(query.sigma_scale).matrix())?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut hits = 0usize;

    for _ in 0..query.sample_count {
        let z_a = standard_normal_vector(&mut rng);
        let z_b = standard_normal_vector(&mut rng);

        let a = query.relative_position + transform(&l_a, &z_a);
        let b = transform(&l_b, &z_b);

        if (a - b).norm() <= query.hard_body_radius {
            hits += 1;
        }
    }

    let probability = hits as f64 / query.sample_count as f64;
    debug!(
        "Collision probability {probability:e} ({hits} hits / {} samples, seed {seed})",
        query.sample_count
    );
    Ok(probability)
}

#[cfg(test)]
mod collision_test {
    use super::*;

    fn query(
        relative_position: Vector3<f64>,
        var_a: f64,
        var_b: f64,
        hard_body_radius: f64,
        sample_count: usize,
    ) -> CollisionQuery {
        CollisionQuery {
            relative_position,
            covariance_a: CovarianceMatrix::diagonal(var_a, var_a, var_a),
            covariance_b: CovarianceMatrix::diagonal(var_b, var_b, var_b),
            hard_body_radius,
            sigma_scale: 1.0,
            sample_count,
        }
    }

    #[test]
    fn test_certain_and_impossible_events() {
        let overlap = query(Vector3::zeros(), 1e-6, 1e-6, 10.0, 1_000);
        assert_eq!(collision_probability(&overlap, 7).unwrap(), 1.0);

        let far = query(Vector3::new(1e5, 0.0, 0.0), 1.0, 1.0, 1.0, 1_000);
        assert_eq!(collision_probability(&far, 7).unwrap(), 0.0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let q = query(Vector3::new(0.0, 1.0, 0.0), 4.0, 1.0, 2.0, 5_000);
        let p1 = collision_probability(&q, 42).unwrap();
        let p2 = collision_probability(&q, 42).unwrap();
        assert_eq!(p1, p2);
        assert!(p1 > 0.0 && p1 < 1.0);
    }

    #[test]
    fn test_invalid_queries() {
        let base = query(Vector3::zeros(), 1.0, 1.0, 1.0, 100);

        let q = CollisionQuery { sample_count: 0, ..base };
        assert!(matches!(
            collision_probability(&q, 0),
            Err(OrbisError::InvalidCollisionQuery(_))
        ));
        let q = CollisionQuery { hard_body_radius: -1.0, ..base };
        assert!(matches!(
            collision_probability(&q, 0),
            Err(OrbisError::InvalidCollisionQuery(_))
        ));
        let q = CollisionQuery { sigma_scale: -0.5, ..base };
        assert!(matches!(
            collision_probability(&q, 0),
            Err(OrbisError::InvalidCollisionQuery(_))
        ));
    }

    #[test]
    fn test_not_positive_definite_covariance() {
        let singular = CovarianceMatrix::diagonal(1.0, 0.0, 1.0);
        let q = CollisionQuery {
            covariance_b: singular,
            ..query(Vector3::zeros(), 1.0, 1.0, 1.0, 100)
        };
        assert!(matches!(
            collision_probability(&q, 0),
            Err(OrbisError::NotPositiveDefinite { pivot: 1, .. })
        ));

        // a zero sigma scale collapses both covariances
        let q = CollisionQuery {
            sigma_scale: 0.0,
            ..query(Vector3::zeros(), 1.0, 1.0, 1.0, 100)
        };
        assert!(matches!(
            collision_probability(&q, 0),
            Err(OrbisError::NotPositiveDefinite { pivot: 0, .. })
        ));
    }

    #[test]
    fn test_covariance_constructor() {
        let sym = Matrix3::new(4.0, 1.0, 0.5, 1.0, 3.0, 0.2, 0.5, 0.2, 2.0);
        assert!(CovarianceMatrix::new(sym).is_ok());

        let asym = Matrix3::new(4.0, 1.0, 0.5, 0.0, 3.0, 0.2, 0.5, 0.2, 2.0);
        assert!(matches!(
            CovarianceMatrix::new(asym),
            Err(OrbisError::InvalidParameter(_))
        ));

        let scaled = CovarianceMatrix::diagonal(1.0, 2.0, 3.0).scaled(2.0);
        assert_eq!(scaled.matrix()[(2, 2)], 6.0);
    }
}
