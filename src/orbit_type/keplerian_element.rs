//! # Keplerian orbital elements
//!
//! [`KeplerianElements`] is the classical element set `(a, e, i, Ω, ω, ν)` of a bound
//! geocentric orbit, together with its conversions to and from an ECI state vector.
//!
//! ## Units
//!
//! - Lengths: **km**
//! - Angles: **degrees**
//! - Epoch: [`hifitime::Epoch`]
//!
//! ## Degeneracies
//!
//! Classical elements are singular for circular and equatorial orbits. When building
//! elements from a state vector, with `tol = ELEMENT_DEGENERACY_TOL`:
//!
//! | case                           | Ω   | ω                         | ν                          |
//! |--------------------------------|-----|---------------------------|----------------------------|
//! | `e ≥ tol`, inclined            | node| from node to periapsis    | from periapsis             |
//! | `e ≥ tol`, equatorial          | 0   | longitude of periapsis    | from periapsis             |
//! | `e < tol`, inclined            | node| 0                         | argument of latitude       |
//! | `e < tol`, equatorial          | 0   | 0                         | true longitude             |
//!
//! The orbit is equatorial when `|ẑ × h| / |h| < tol`. For retrograde equatorial orbits
//! (`i = 180°`) the in-plane longitudes are measured in the direction of motion, i.e.
//! mirrored with respect to the ECI X-Y angle, so that [`KeplerianElements::to_state_vector`]
//! maps them back onto the same state.

use hifitime::Epoch;
use nalgebra::Vector3;
use std::fmt;

use crate::{
    constants::{Degree, Kilometer, Radian, DPI, ELEMENT_DEGENERACY_TOL},
    earth_model::EarthModel,
    kepler::{eccentric_to_mean, true_to_eccentric},
    orbis_errors::OrbisError,
    ref_frame::{
        state_vector::{CartesianFrame, StateVector},
        Frame,
    },
    vector_math::{rotation_matrix, Axis},
};

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `reference_epoch`: epoch at which the elements are valid.
/// * `semi_major_axis`: km, `> 0`.
/// * `eccentricity`: unitless, in `[0, 1)`.
/// * `inclination`: degrees, in `[0, 180]`.
/// * `ascending_node_longitude`: degrees (Ω), in `[0, 360)`.
/// * `periapsis_argument`: degrees (ω), in `[0, 360)`.
/// * `true_anomaly`: degrees (ν), in `[0, 360)`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct KeplerianElements {
    pub reference_epoch: Epoch,
    pub semi_major_axis: Kilometer,
    pub eccentricity: f64,
    pub inclination: Degree,
    pub ascending_node_longitude: Degree,
    pub periapsis_argument: Degree,
    pub true_anomaly: Degree,
}

/// Wrap an angle in degrees into `[0, 360)`.
pub(crate) fn principal_degrees(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid may round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// `acos` of a cosine clamped into `[-1, 1]`, in degrees.
fn acos_deg(cosine: f64) -> Degree {
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

impl KeplerianElements {
    /// Build a validated element set; the three angles are wrapped into `[0, 360)`.
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::InvalidSemiMajorAxis`] if `a ≤ 0`.
    /// * [`OrbisError::InvalidEccentricity`] if `e ∉ [0, 1)`.
    /// * [`OrbisError::InvalidParameter`] if `i ∉ [0°, 180°]` or an angle is not finite.
    pub fn new(
        reference_epoch: Epoch,
        semi_major_axis: Kilometer,
        eccentricity: f64,
        inclination: Degree,
        ascending_node_longitude: Degree,
        periapsis_argument: Degree,
        true_anomaly: Degree,
    ) -> Result<Self, OrbisError> {
        let kep = KeplerianElements {
            reference_epoch,
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node_longitude: principal_degrees(ascending_node_longitude),
            periapsis_argument: principal_degrees(periapsis_argument),
            true_anomaly: principal_degrees(true_anomaly),
        };
        kep.validate()?;
        Ok(kep)
    }

    /// Check the domain of `a`, `e` and `i`, and that every angle is finite.
    pub fn validate(&self) -> Result<(), OrbisError> {
        if !(self.semi_major_axis > 0.0 && self.semi_major_axis.is_finite()) {
            return Err(OrbisError::InvalidSemiMajorAxis(self.semi_major_axis));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbisError::InvalidEccentricity(self.eccentricity));
        }
        if !(0.0..=180.0).contains(&self.inclination) {
            return Err(OrbisError::InvalidParameter(format!(
                "inclination must lie in [0, 180] degrees, got {}",
                self.inclination
            )));
        }
        for (name, angle) in [
            ("ascending node longitude", self.ascending_node_longitude),
            ("argument of periapsis", self.periapsis_argument),
            ("true anomaly", self.true_anomaly),
        ] {
            if !angle.is_finite() {
                return Err(OrbisError::InvalidParameter(format!(
                    "{name} must be finite, got {angle}"
                )));
            }
        }
        Ok(())
    }

    /// Classical elements from an inertial state vector.
    ///
    /// Arguments
    /// ---------
    /// * `state`: position (km) and velocity (km/s), must be tagged [`CartesianFrame::Eci`].
    /// * `earth`: supplies the gravitational parameter μ.
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::FrameMismatch`] if the state is not inertial.
    /// * [`OrbisError::InvalidParameter`] if a component is NaN or infinite.
    /// * [`OrbisError::DegenerateVector`] if `r = 0` or the angular momentum vanishes.
    /// * [`OrbisError::UnboundOrbit`] if the specific energy is `≥ 0`.
    pub fn from_state_vector(state: &StateVector, earth: &EarthModel) -> Result<Self, OrbisError> {
        if state.frame != CartesianFrame::Eci {
            return Err(OrbisError::FrameMismatch {
                expected: Frame::Eci,
                found: state.frame.into(),
            });
        }
        Self::from_position_velocity(&state.position, &state.velocity, state.epoch, earth.mu)
    }

    /// Same as [`KeplerianElements::from_state_vector`] on raw ECI vectors.
    pub fn from_position_velocity(
        r: &Vector3<f64>,
        v: &Vector3<f64>,
        epoch: Epoch,
        mu: f64,
    ) -> Result<Self, OrbisError> {
        if !r.iter().chain(v.iter()).all(|x| x.is_finite()) {
            return Err(OrbisError::InvalidParameter(format!(
                "state vector must be finite, got r = {r:?}, v = {v:?}"
            )));
        }
        let r_norm = r.norm();
        if r_norm == 0.0 {
            return Err(OrbisError::DegenerateVector(
                "position vector has zero magnitude".into(),
            ));
        }
        let v2 = v.norm_squared();
        let rv = r.dot(v);

        let energy = v2 / 2.0 - mu / r_norm;
        if energy >= 0.0 {
            return Err(OrbisError::UnboundOrbit { energy });
        }
        let semi_major_axis = -mu / (2.0 * energy);

        let h = r.cross(v);
        let h_norm = h.norm();
        if h_norm == 0.0 {
            return Err(OrbisError::DegenerateVector(
                "angular momentum is zero (rectilinear motion)".into(),
            ));
        }

        let e_vec = (v2 / mu - 1.0 / r_norm) * r - (rv / mu) * v;
        let e = e_vec.norm();

        let inclination = acos_deg(h.z / h_norm);

        // node line n = ẑ × h
        let n = Vector3::new(-h.y, h.x, 0.0);
        let n_norm = n.norm();

        let circular = e < ELEMENT_DEGENERACY_TOL;
        let equatorial = n_norm / h_norm < ELEMENT_DEGENERACY_TOL;
        let retrograde = h.z < 0.0;

        let ascending_node_longitude = if equatorial {
            0.0
        } else {
            let raw = acos_deg(n.x / n_norm);
            if n.y < 0.0 {
                360.0 - raw
            } else {
                raw
            }
        };

        let periapsis_argument = if circular {
            0.0
        } else if equatorial {
            let lon = e_vec.y.atan2(e_vec.x).to_degrees();
            if retrograde {
                -lon
            } else {
                lon
            }
        } else {
            let raw = acos_deg(n.dot(&e_vec) / (n_norm * e));
            if e_vec.z < 0.0 {
                360.0 - raw
            } else {
                raw
            }
        };

        let true_anomaly = match (circular, equatorial) {
            (false, _) => {
                let raw = acos_deg(e_vec.dot(r) / (e * r_norm));
                if rv < 0.0 {
                    360.0 - raw
                } else {
                    raw
                }
            }
            (true, false) => {
                // argument of latitude
                let raw = acos_deg(n.dot(r) / (n_norm * r_norm));
                if r.z < 0.0 {
                    360.0 - raw
                } else {
                    raw
                }
            }
            (true, true) => {
                // true longitude
                let raw = acos_deg(r.x / r_norm);
                let lon = if r.y < 0.0 { 360.0 - raw } else { raw };
                if retrograde {
                    -lon
                } else {
                    lon
                }
            }
        };

        Ok(KeplerianElements {
            reference_epoch: epoch,
            semi_major_axis,
            eccentricity: e,
            inclination,
            ascending_node_longitude: principal_degrees(ascending_node_longitude),
            periapsis_argument: principal_degrees(periapsis_argument),
            true_anomaly: principal_degrees(true_anomaly),
        })
    }

    /// Inertial state vector at [`KeplerianElements::reference_epoch`].
    ///
    /// The perifocal position and velocity,
    ///
    /// ```text
    /// r_pf = ( a (cos E − e),  a sqrt(1 − e²) sin E, 0 )
    /// v_pf = sqrt(μ a) / r · ( −sin E,  sqrt(1 − e²) cos E, 0 )
    /// ```
    ///
    /// are rotated into ECI by `R_z(Ω) · R_x(i) · R_z(ω)`.
    ///
    /// Errors
    /// ------
    /// * Domain errors from [`KeplerianElements::validate`].
    pub fn to_state_vector(&self, earth: &EarthModel) -> Result<StateVector, OrbisError> {
        self.validate()?;

        let a = self.semi_major_axis;
        let e = self.eccentricity;
        let beta = (1.0 - e * e).sqrt();

        let ecc_anom = true_to_eccentric(self.true_anomaly.to_radians(), e);
        let (sin_e, cos_e) = ecc_anom.sin_cos();
        let r_norm = a * (1.0 - e * cos_e);

        let r_pf = Vector3::new(a * (cos_e - e), a * beta * sin_e, 0.0);
        let v_pf = (earth.mu * a).sqrt() / r_norm * Vector3::new(-sin_e, beta * cos_e, 0.0);

        let rot = rotation_matrix(Axis::Z, self.ascending_node_longitude.to_radians())
            * rotation_matrix(Axis::X, self.inclination.to_radians())
            * rotation_matrix(Axis::Z, self.periapsis_argument.to_radians());

        Ok(StateVector::eci(
            rot * r_pf,
            rot * v_pf,
            self.reference_epoch,
        ))
    }

    /// Mean motion `n = sqrt(μ / a³)` in rad/s.
    pub fn mean_motion(&self, earth: &EarthModel) -> f64 {
        (earth.mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Orbital period `2π / n` in seconds.
    pub fn period(&self, earth: &EarthModel) -> f64 {
        DPI / self.mean_motion(earth)
    }

    /// Mean anomaly at the reference epoch, in degrees `[0, 360)`.
    pub fn mean_anomaly(&self) -> Degree {
        let ecc_anom: Radian = true_to_eccentric(self.true_anomaly.to_radians(), self.eccentricity);
        principal_degrees(eccentric_to_mean(ecc_anom, self.eccentricity).to_degrees())
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keplerian Elements @ epoch: {}", self.reference_epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} km",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument
        )?;
        write!(
            f,
            "  ν   (true anomaly)          = {:.6}°",
            self.true_anomaly
        )
    }
}

#[cfg(test)]
pub(crate) mod test_keplerian_element {
    use super::*;
    use approx::assert_relative_eq;

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc_hms(1999, 9, 9, 15, 30, 0)
    }

    fn assert_state_close(a: &StateVector, b: &StateVector) {
        assert_relative_eq!(a.position, b.position, max_relative = 1e-6, epsilon = 1e-6);
        assert_relative_eq!(a.velocity, b.velocity, max_relative = 1e-6, epsilon = 1e-9);
        assert_eq!(a.epoch, b.epoch);
    }

    #[test]
    fn test_rv_to_kepler_reference_case() {
        let state = StateVector::eci(
            Vector3::new(8228.0, 389.0, 6888.0),
            Vector3::new(-0.7, 6.6, -0.6),
            epoch(),
        );
        let kep = KeplerianElements::from_state_vector(&state, &EarthModel::WGS84).unwrap();

        assert_relative_eq!(kep.semi_major_axis, 13360.642755150553, epsilon = 1e-6);
        assert_relative_eq!(kep.eccentricity, 0.22049791761487267, epsilon = 1e-9);
        assert_relative_eq!(kep.inclination, 39.93754927254844, epsilon = 1e-7);
        assert_relative_eq!(kep.ascending_node_longitude, 269.85555147445865, epsilon = 1e-7);
        assert_relative_eq!(kep.periapsis_argument, 125.72438209646339, epsilon = 1e-7);
        assert_relative_eq!(kep.true_anomaly, 326.46253404643056, epsilon = 1e-7);
        assert_eq!(kep.reference_epoch, epoch());

        let back = kep.to_state_vector(&EarthModel::WGS84).unwrap();
        assert_state_close(&back, &state);
    }

    #[test]
    fn test_rv_to_kepler_requires_eci() {
        let state = StateVector::ecef(
            Vector3::new(8228.0, 389.0, 6888.0),
            Vector3::new(-0.7, 6.6, -0.6),
            epoch(),
        );
        assert_eq!(
            KeplerianElements::from_state_vector(&state, &EarthModel::WGS84),
            Err(OrbisError::FrameMismatch {
                expected: Frame::Eci,
                found: Frame::Ecef
            })
        );
    }

    #[test]
    fn test_rv_to_kepler_invalid_inputs() {
        let earth = EarthModel::WGS84;
        let escape = StateVector::eci(
            Vector3::new(7000.0, 0.0, 0.0),
            Vector3::new(0.0, 11.0, 0.0),
            epoch(),
        );
        assert!(matches!(
            KeplerianElements::from_state_vector(&escape, &earth),
            Err(OrbisError::UnboundOrbit { .. })
        ));

        let radial = StateVector::eci(
            Vector3::new(7000.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            epoch(),
        );
        assert!(matches!(
            KeplerianElements::from_state_vector(&radial, &earth),
            Err(OrbisError::DegenerateVector(_))
        ));

        let origin = StateVector::eci(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), epoch());
        assert!(matches!(
            KeplerianElements::from_state_vector(&origin, &earth),
            Err(OrbisError::DegenerateVector(_))
        ));
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        let earth = EarthModel::WGS84;
        let nan_position = StateVector::eci(
            Vector3::new(f64::NAN, 0.0, 7000.0),
            Vector3::new(0.0, 7.5, 0.0),
            epoch(),
        );
        assert!(matches!(
            KeplerianElements::from_state_vector(&nan_position, &earth),
            Err(OrbisError::InvalidParameter(_))
        ));

        let infinite_velocity = StateVector::eci(
            Vector3::new(7000.0, 0.0, 0.0),
            Vector3::new(0.0, f64::INFINITY, 0.0),
            epoch(),
        );
        assert!(matches!(
            KeplerianElements::from_state_vector(&infinite_velocity, &earth),
            Err(OrbisError::InvalidParameter(_))
        ));

        assert!(matches!(
            KeplerianElements::new(epoch(), 7000.0, 0.1, 10.0, f64::NAN, 0.0, 0.0),
            Err(OrbisError::InvalidParameter(_))
        ));
        assert!(matches!(
            KeplerianElements::new(epoch(), 7000.0, 0.1, 10.0, 0.0, f64::INFINITY, 0.0),
            Err(OrbisError::InvalidParameter(_))
        ));
        assert!(matches!(
            KeplerianElements::new(epoch(), f64::INFINITY, 0.1, 10.0, 0.0, 0.0, 0.0),
            Err(OrbisError::InvalidSemiMajorAxis(_))
        ));

        // fields set directly are caught when the state is built
        let mut kep = KeplerianElements::new(epoch(), 7000.0, 0.1, 10.0, 0.0, 0.0, 0.0).unwrap();
        kep.true_anomaly = f64::NAN;
        assert!(matches!(
            kep.to_state_vector(&earth),
            Err(OrbisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_kepler_round_trip_generic() {
        let earth = EarthModel::WGS84;
        let kep =
            KeplerianElements::new(epoch(), 26_560.0, 0.35, 63.4, 123.0, 270.0, 45.0).unwrap();
        let state = kep.to_state_vector(&earth).unwrap();
        let back = KeplerianElements::from_state_vector(&state, &earth).unwrap();

        assert_relative_eq!(back.semi_major_axis, kep.semi_major_axis, max_relative = 1e-9);
        assert_relative_eq!(back.eccentricity, kep.eccentricity, epsilon = 1e-9);
        assert_relative_eq!(back.inclination, kep.inclination, epsilon = 1e-8);
        assert_relative_eq!(
            back.ascending_node_longitude,
            kep.ascending_node_longitude,
            epsilon = 1e-8
        );
        assert_relative_eq!(back.periapsis_argument, kep.periapsis_argument, epsilon = 1e-7);
        assert_relative_eq!(back.true_anomaly, kep.true_anomaly, epsilon = 1e-7);
    }

    #[test]
    fn test_degenerate_round_trips() {
        let earth = EarthModel::WGS84;
        let cases = [
            // circular inclined
            KeplerianElements::new(epoch(), 6_778.0, 0.0, 51.6, 30.0, 0.0, 100.0).unwrap(),
            // circular equatorial prograde
            KeplerianElements::new(epoch(), 42_164.0, 0.0, 0.0, 0.0, 0.0, 75.0).unwrap(),
            // circular equatorial retrograde
            KeplerianElements::new(epoch(), 8_000.0, 0.0, 180.0, 0.0, 0.0, 200.0).unwrap(),
            // elliptic equatorial prograde
            KeplerianElements::new(epoch(), 24_000.0, 0.7, 0.0, 0.0, 40.0, 10.0).unwrap(),
            // elliptic equatorial retrograde
            KeplerianElements::new(epoch(), 24_000.0, 0.3, 180.0, 0.0, 300.0, 250.0).unwrap(),
        ];

        for kep in cases {
            let state = kep.to_state_vector(&earth).unwrap();
            let back = KeplerianElements::from_state_vector(&state, &earth).unwrap();
            assert_relative_eq!(back.semi_major_axis, kep.semi_major_axis, max_relative = 1e-9);
            assert!(
                back.eccentricity < 1e-6 || (back.eccentricity - kep.eccentricity).abs() < 1e-9
            );
            assert_state_close(&back.to_state_vector(&earth).unwrap(), &state);
        }
    }

    #[test]
    fn test_circular_equatorial_uses_true_longitude() {
        let earth = EarthModel::WGS84;
        let r = 7_000.0_f64;
        let speed = (earth.mu / r).sqrt();

        let prograde = StateVector::eci(
            Vector3::new(0.0, -r, 0.0),
            Vector3::new(speed, 0.0, 0.0),
            epoch(),
        );
        let kep = KeplerianElements::from_state_vector(&prograde, &earth).unwrap();
        assert_relative_eq!(kep.inclination, 0.0, epsilon = 1e-9);
        assert_eq!(kep.ascending_node_longitude, 0.0);
        assert_eq!(kep.periapsis_argument, 0.0);
        assert_relative_eq!(kep.true_anomaly, 270.0, epsilon = 1e-9);

        let retrograde = StateVector::eci(
            Vector3::new(0.0, -r, 0.0),
            Vector3::new(-speed, 0.0, 0.0),
            epoch(),
        );
        let kep = KeplerianElements::from_state_vector(&retrograde, &earth).unwrap();
        assert_relative_eq!(kep.inclination, 180.0, epsilon = 1e-9);
        assert_relative_eq!(kep.true_anomaly, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_period_and_mean_anomaly() {
        let earth = EarthModel::WGS84;
        let geo = KeplerianElements::new(epoch(), 42_164.137, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        // one sidereal day
        assert_relative_eq!(geo.period(&earth), 86_164.1, epsilon = 1.0);

        let kep = KeplerianElements::new(epoch(), 10_000.0, 0.5, 10.0, 0.0, 0.0, 180.0).unwrap();
        assert_relative_eq!(kep.mean_anomaly(), 180.0, epsilon = 1e-9);
        let kep = KeplerianElements::new(epoch(), 10_000.0, 0.0, 10.0, 0.0, 0.0, 77.0).unwrap();
        assert_relative_eq!(kep.mean_anomaly(), 77.0, epsilon = 1e-9);
    }

    #[test]
    fn test_new_validation() {
        assert_eq!(
            KeplerianElements::new(epoch(), -1.0, 0.1, 10.0, 0.0, 0.0, 0.0),
            Err(OrbisError::InvalidSemiMajorAxis(-1.0))
        );
        assert_eq!(
            KeplerianElements::new(epoch(), 7000.0, 1.2, 10.0, 0.0, 0.0, 0.0),
            Err(OrbisError::InvalidEccentricity(1.2))
        );
        assert!(KeplerianElements::new(epoch(), 7000.0, 0.1, 181.0, 0.0, 0.0, 0.0).is_err());

        let kep = KeplerianElements::new(epoch(), 7000.0, 0.1, 10.0, -30.0, 400.0, 360.0).unwrap();
        assert_relative_eq!(kep.ascending_node_longitude, 330.0, epsilon = 1e-12);
        assert_relative_eq!(kep.periapsis_argument, 40.0, epsilon = 1e-12);
        assert_eq!(kep.true_anomaly, 0.0);
    }

    #[test]
    fn test_display() {
        let kep = KeplerianElements::new(epoch(), 7000.0, 0.1, 10.0, 20.0, 30.0, 40.0).unwrap();
        let output = format!("{kep}");
        assert!(output.contains("a   (semi-major axis)       = 7000.000000 km"));
        assert!(output.contains("ν   (true anomaly)          = 40.000000°"));
    }
}
