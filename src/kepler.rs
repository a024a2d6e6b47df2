//! # Kepler's equation and anomaly conversions
//!
//! Elliptic relations between the true anomaly ν, the eccentric anomaly E and the
//! mean anomaly M (all in radians here):
//!
//! ```text
//! tan(E/2) = sqrt((1 − e)/(1 + e)) · tan(ν/2)
//! M        = E − e sin E
//! ```
//!
//! Kepler's equation is inverted with the plain fixed point `E ← M + e sin E`,
//! either until the step drops below a tolerance ([`solve_kepler`]) or for a fixed
//! number of rounds ([`solve_kepler_fixed`]). The fixed point contracts with rate
//! `e |cos E|`, so highly eccentric orbits need many iterations.

use log::{trace, warn};
use std::f64::consts::PI;

use crate::{
    constants::{Radian, DPI},
    orbis_errors::OrbisError,
};

/// Principal value of an angle in `[0, 2π)`.
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Signed difference `a − b` reduced to `[-π, π]`.
pub fn angle_diff(a: Radian, b: Radian) -> Radian {
    let mut diff = principal_angle(a) - principal_angle(b);
    if diff > PI {
        diff -= DPI;
    } else if diff < -PI {
        diff += DPI;
    }
    diff
}

fn check_elliptic(e: f64) -> Result<(), OrbisError> {
    if (0.0..1.0).contains(&e) {
        Ok(())
    } else {
        Err(OrbisError::InvalidEccentricity(e))
    }
}

/// Eccentric anomaly from the true anomaly, quadrant-correct, in `[0, 2π)`.
pub fn true_to_eccentric(nu: Radian, e: f64) -> Radian {
    let (sin_nu, cos_nu) = nu.sin_cos();
    principal_angle(((1.0 - e * e).sqrt() * sin_nu).atan2(e + cos_nu))
}

/// True anomaly from the eccentric anomaly, in `[0, 2π)`.
pub fn eccentric_to_true(ecc_anom: Radian, e: f64) -> Radian {
    let (sin_e, cos_e) = ecc_anom.sin_cos();
    principal_angle(((1.0 - e * e).sqrt() * sin_e).atan2(cos_e - e))
}

/// Mean anomaly from the eccentric anomaly, in `[0, 2π)`.
pub fn eccentric_to_mean(ecc_anom: Radian, e: f64) -> Radian {
    principal_angle(ecc_anom - e * ecc_anom.sin())
}

/// Solve `M = E − e sin E` by fixed-point iteration.
///
/// Arguments
/// ---------
/// * `mean_anom`: mean anomaly M (rad), any value.
/// * `e`: eccentricity, must lie in `[0, 1)`.
/// * `tolerance`: stop when `|E_{k+1} − E_k| < tolerance`.
/// * `max_iterations`: iteration cap.
///
/// Return
/// ------
/// * The eccentric anomaly E in `[0, 2π)`.
///
/// Errors
/// ------
/// * [`OrbisError::InvalidEccentricity`] if `e ∉ [0, 1)`.
/// * [`OrbisError::NonConvergence`] if the cap is reached first.
pub fn solve_kepler(
    mean_anom: Radian,
    e: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Radian, OrbisError> {
    check_elliptic(e)?;

    let m = principal_angle(mean_anom);
    let mut ecc_anom = m;
    let mut last_step = f64::INFINITY;

    for k in 1..=max_iterations {
        let next = m + e * ecc_anom.sin();
        last_step = (next - ecc_anom).abs();
        ecc_anom = next;
        if last_step < tolerance {
            trace!("Kepler equation solved in {k} iterations (M = {m:.12}, e = {e:.6})");
            return Ok(principal_angle(ecc_anom));
        }
    }

    warn!(
        "Kepler equation did not converge after {max_iterations} iterations (M = {m:.12}, e = {e:.6}, step = {last_step:e})"
    );
    Err(OrbisError::NonConvergence {
        iterations: max_iterations,
        last_step,
    })
}

/// Run exactly `iterations` rounds of `E ← M + e sin E`, starting from `E = M`.
///
/// No convergence test is made. The caller is responsible for passing `e ∈ [0, 1)`.
pub fn solve_kepler_fixed(mean_anom: Radian, e: f64, iterations: usize) -> Radian {
    let m = principal_angle(mean_anom);
    let mut ecc_anom = m;
    for _ in 0..iterations {
        ecc_anom = m + e * ecc_anom.sin();
    }
    principal_angle(ecc_anom)
}

/// True anomaly from the mean anomaly, through [`solve_kepler`].
pub fn mean_to_true(
    mean_anom: Radian,
    e: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Radian, OrbisError> {
    let ecc_anom = solve_kepler(mean_anom, e, tolerance, max_iterations)?;
    Ok(eccentric_to_true(ecc_anom, e))
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use crate::constants::{KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE};
    use approx::assert_relative_eq;

    #[test]
    fn test_principal_angle_and_diff() {
        assert_relative_eq!(principal_angle(-0.5), DPI - 0.5, epsilon = 1e-15);
        assert_relative_eq!(principal_angle(DPI + 1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(angle_diff(0.1, DPI - 0.1), 0.2, epsilon = 1e-14);
        assert_relative_eq!(angle_diff(DPI - 0.1, 0.1), -0.2, epsilon = 1e-14);
    }

    #[test]
    fn test_anomaly_conversions_circular() {
        for nu in [0.0, 0.3, 2.0, 4.5, 6.0] {
            assert_relative_eq!(true_to_eccentric(nu, 0.0), nu, epsilon = 1e-14);
            assert_relative_eq!(eccentric_to_mean(nu, 0.0), nu, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_true_eccentric_quadrants() {
        let e = 0.6;
        for nu in [0.2, 1.5, 2.8, 3.5, 4.9, 6.1] {
            let ecc = true_to_eccentric(nu, e);
            // E and ν share the same half-plane
            assert_eq!(ecc < PI, nu < PI);
            assert_relative_eq!(eccentric_to_true(ecc, e), nu, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_solve_kepler() {
        let e = 0.3;
        for m in [0.0, 0.5, 1.7, PI, 4.0, 6.2] {
            let ecc = solve_kepler(m, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS).unwrap();
            assert_relative_eq!(ecc - e * ecc.sin(), principal_angle(m), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_solve_kepler_round_trip_through_true_anomaly() {
        let e = 0.2205;
        let nu = 5.6977;
        let m = eccentric_to_mean(true_to_eccentric(nu, e), e);
        let back = mean_to_true(m, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS).unwrap();
        assert_relative_eq!(back, nu, epsilon = 1e-9);
    }

    #[test]
    fn test_solve_kepler_errors() {
        assert_eq!(
            solve_kepler(1.0, 1.0, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS),
            Err(OrbisError::InvalidEccentricity(1.0))
        );
        assert!(matches!(
            solve_kepler(1.0, -0.1, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS),
            Err(OrbisError::InvalidEccentricity(_))
        ));

        match solve_kepler(0.3, 0.95, 1e-14, 5) {
            Err(OrbisError::NonConvergence {
                iterations,
                last_step,
            }) => {
                assert_eq!(iterations, 5);
                assert!(last_step > 1e-14);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_solver_matches_converged_solver() {
        let e = 0.05;
        let m = 2.4;
        let fixed = solve_kepler_fixed(m, e, 50);
        let conv = solve_kepler(m, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS).unwrap();
        assert_relative_eq!(fixed, conv, epsilon = 1e-10);
    }
}
