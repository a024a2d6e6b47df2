//! # J2 secular propagation
//!
//! Mean-element model in which the Earth's oblateness makes the node regress and the
//! perigee rotate at constant rates, while the first derivative of the mean motion
//! `ṅ` (rev/day², as carried by two-line element sets) decays `a` and `e`.
//!
//! With `n0` the mean motion in rev/day and `Δt` in days:
//!
//! ```text
//! ȧ = −(2/3) · a · ṅ / n0
//! ė = −(2/3) · (1 − e) · ṅ / n0
//! Ω̇ = −2.064734896e14 · a^−3.5 · (1 − e²)^−2 · cos i              [deg/day]
//! ω̇ =  1.032367448e14 · a^−3.5 · (1 − e²)^−2 · (4 − 5 sin² i)     [deg/day]
//! M  = M0 + 360 · (n0 · Δt + ṅ/2 · Δt²)                             [deg]
//! ```
//!
//! The quadratic `ṅ` term is only meaningful while `ṅ · Δt²` stays small.

use hifitime::{Epoch, Unit};
use log::debug;
use std::f64::consts::PI;

use crate::{
    constants::{DPI, J2_PERIGEE_RATE_COEFF, J2_RAAN_RATE_COEFF, SECONDS_PER_DAY},
    kepler::{eccentric_to_mean, solve_kepler_fixed, true_to_eccentric},
    orbis_errors::OrbisError,
    orbit_type::keplerian_element::{principal_degrees, KeplerianElements},
    propagation::PropagationParams,
};

/// Propagate mean elements to `target` with J2 secular rates and mean-motion decay.
///
/// Arguments
/// -----------------
/// * `kep`: elements at their reference epoch.
/// * `mean_motion_dot`: `ṅ` in rev/day².
/// * `target`: epoch of the output elements.
/// * `params`: supplies μ and the number of Kepler iterations
///   (`j2_anomaly_iterations`, not convergence-checked).
///
/// Return
/// ----------
/// * Elements at `target`. The inclination is unchanged.
///
/// Errors
/// ----------
/// * [`OrbisError::InvalidSemiMajorAxis`] if `a ≤ 0`, on input or after the decay.
/// * [`OrbisError::InvalidEccentricity`] if `e ∉ [0, 1)`, on input or after the decay.
pub fn propagate_j2(
    kep: &KeplerianElements,
    mean_motion_dot: f64,
    target: &Epoch,
    params: &PropagationParams,
) -> Result<KeplerianElements, OrbisError> {
    kep.validate()?;

    let a0 = kep.semi_major_axis;
    let e0 = kep.eccentricity;
    let incl = kep.inclination.to_radians();
    let dt = (*target - kep.reference_epoch).to_unit(Unit::Day);

    // rev/day
    let n0 = kep.mean_motion(&params.earth) * SECONDS_PER_DAY / DPI;

    debug!(
        "J2 propagation over {dt:.6} days (n0 = {n0:.8} rev/day, ndot = {mean_motion_dot:e} rev/day²)"
    );

    let a_dot = -2.0 / 3.0 * a0 * mean_motion_dot / n0;
    let e_dot = -2.0 / 3.0 * (1.0 - e0) * mean_motion_dot / n0;

    let a = a0 + a_dot * dt;
    if !(a > 0.0) {
        return Err(OrbisError::InvalidSemiMajorAxis(a));
    }
    let e = e0 + e_dot * dt;
    if !(0.0..1.0).contains(&e) {
        return Err(OrbisError::InvalidEccentricity(e));
    }

    let secular = a0.powf(-3.5) / (1.0 - e0 * e0).powi(2);
    let raan_rate = J2_RAAN_RATE_COEFF * secular * incl.cos();
    let perigee_rate = J2_PERIGEE_RATE_COEFF * secular * (4.0 - 5.0 * incl.sin().powi(2));

    let ecc_anom0 = true_to_eccentric(kep.true_anomaly.to_radians(), e0);
    let m0 = eccentric_to_mean(ecc_anom0, e0).to_degrees();
    let mean_anom = m0 + 360.0 * (n0 * dt + mean_motion_dot / 2.0 * dt * dt);

    let ecc_anom = solve_kepler_fixed(mean_anom.to_radians(), e, params.j2_anomaly_iterations);
    let cos_e = ecc_anom.cos();
    let mut nu = ((cos_e - e) / (1.0 - e * cos_e)).clamp(-1.0, 1.0).acos();
    if ecc_anom > PI {
        nu = DPI - nu;
    }

    Ok(KeplerianElements {
        reference_epoch: *target,
        semi_major_axis: a,
        eccentricity: e,
        inclination: kep.inclination,
        ascending_node_longitude: principal_degrees(kep.ascending_node_longitude + raan_rate * dt),
        periapsis_argument: principal_degrees(kep.periapsis_argument + perigee_rate * dt),
        true_anomaly: principal_degrees(nu.to_degrees()),
    })
}
