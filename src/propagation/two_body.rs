use hifitime::Epoch;
use log::debug;

use crate::{
    kepler::{eccentric_to_mean, eccentric_to_true, solve_kepler, true_to_eccentric},
    orbis_errors::OrbisError,
    orbit_type::keplerian_element::{principal_degrees, KeplerianElements},
    propagation::PropagationParams,
};

/// Propagate elements to `target` under unperturbed two-body motion.
///
/// Only the true anomaly and the epoch change:
///
/// ```text
/// M(t) = M0 + n · Δt,   n = sqrt(μ / a³),   Δt in seconds (may be negative)
/// ```
///
/// then `M = E − e sin E` is solved with the tolerance and cap of `params`.
///
/// Errors
/// ------
/// * [`OrbisError::InvalidSemiMajorAxis`] / [`OrbisError::InvalidEccentricity`] on
///   out-of-domain elements (including `e ≥ 1`).
/// * [`OrbisError::NonConvergence`] if the Kepler solve hits `kepler_max_iterations`.
pub fn propagate_two_body(
    kep: &KeplerianElements,
    target: &Epoch,
    params: &PropagationParams,
) -> Result<KeplerianElements, OrbisError> {
    kep.validate()?;

    let dt = (*target - kep.reference_epoch).to_seconds();
    debug!(
        "Two-body propagation over {dt:.3} s (a = {:.3} km, e = {:.6})",
        kep.semi_major_axis, kep.eccentricity
    );

    let e = kep.eccentricity;
    let m0 = eccentric_to_mean(true_to_eccentric(kep.true_anomaly.to_radians(), e), e);
    let m = m0 + kep.mean_motion(&params.earth) * dt;

    let ecc_anom = solve_kepler(m, e, params.kepler_tolerance, params.kepler_max_iterations)?;

    Ok(KeplerianElements {
        reference_epoch: *target,
        true_anomaly: principal_degrees(eccentric_to_true(ecc_anom, e).to_degrees()),
        ..*kep
    })
}
