#![allow(dead_code)]

use approx::assert_relative_eq;
use hifitime::Epoch;
use nalgebra::Vector3;
use orbis::kepler::angle_diff;
use orbis::orbit_type::keplerian_element::KeplerianElements;
use orbis::ref_frame::state_vector::StateVector;

/// 1999-09-09T15:30:00Z
pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_hms(1999, 9, 9, 15, 30, 0)
}

/// Inclined, moderately eccentric ECI state used across the integration tests.
pub fn reference_state() -> StateVector {
    StateVector::eci(
        Vector3::new(8228.0, 389.0, 6888.0),
        Vector3::new(-0.7, 6.6, -0.6),
        reference_epoch(),
    )
}

/// Angle difference in degrees, wrapped into [-180, 180].
pub fn angle_gap(a: f64, b: f64) -> f64 {
    angle_diff(a.to_radians(), b.to_radians()).to_degrees()
}

pub fn assert_orbit_close(actual: &KeplerianElements, expected: &KeplerianElements, epsilon: f64) {
    assert_eq!(actual.reference_epoch, expected.reference_epoch);
    assert_relative_eq!(
        actual.semi_major_axis,
        expected.semi_major_axis,
        max_relative = epsilon
    );
    assert_relative_eq!(
        actual.eccentricity,
        expected.eccentricity,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.inclination, expected.inclination, epsilon = epsilon);
    assert!(
        angle_gap(
            actual.ascending_node_longitude,
            expected.ascending_node_longitude
        )
        .abs()
            < epsilon
    );
    assert!(angle_gap(actual.periapsis_argument, expected.periapsis_argument).abs() < epsilon);
    assert!(angle_gap(actual.true_anomaly, expected.true_anomaly).abs() < epsilon);
}

pub fn assert_state_close(actual: &StateVector, expected: &StateVector, max_relative: f64) {
    assert_eq!(actual.frame, expected.frame);
    assert_relative_eq!(
        actual.position,
        expected.position,
        max_relative = max_relative,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        actual.velocity,
        expected.velocity,
        max_relative = max_relative,
        epsilon = 1e-9
    );
}
