//! # Earth model
//!
//! [`EarthModel`] bundles the physical constants consumed as configuration by the
//! frame converters and the propagators: reference ellipsoid, gravitational parameter
//! and sidereal rotation rate. [`EarthModel::WGS84`] is the default everywhere.
//!
//! ## Example
//!
//! ```rust
//! use orbis::earth_model::EarthModel;
//!
//! let wgs84 = EarthModel::default();
//! assert_eq!(wgs84.semi_major_axis, 6378.137);
//! assert!((wgs84.semi_minor_axis() - 6356.752314245179).abs() < 1e-9);
//! ```

use crate::{
    constants::{
        Kilometer, EARTH_MU, EARTH_ROTATION_RATE, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS,
    },
    orbis_errors::OrbisError,
};

/// Reference ellipsoid and gravity constants of the central body.
///
/// Units
/// -----
/// * `semi_major_axis`: km (equatorial radius).
/// * `flattening`: unitless, `(a − b) / a`.
/// * `mu`: km³/s².
/// * `rotation_rate`: rad/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthModel {
    pub semi_major_axis: Kilometer,
    pub flattening: f64,
    pub mu: f64,
    pub rotation_rate: f64,
}

impl EarthModel {
    /// World Geodetic System 1984 with the EGM96 gravitational parameter.
    pub const WGS84: EarthModel = EarthModel {
        semi_major_axis: WGS84_SEMI_MAJOR_AXIS,
        flattening: WGS84_FLATTENING,
        mu: EARTH_MU,
        rotation_rate: EARTH_ROTATION_RATE,
    };

    /// Build a custom model, rejecting non-physical values.
    pub fn new(
        semi_major_axis: Kilometer,
        flattening: f64,
        mu: f64,
        rotation_rate: f64,
    ) -> Result<Self, OrbisError> {
        if !(semi_major_axis > 0.0) {
            return Err(OrbisError::InvalidParameter(
                "semi_major_axis must be > 0".into(),
            ));
        }
        if !(0.0..1.0).contains(&flattening) {
            return Err(OrbisError::InvalidParameter(
                "flattening must lie in [0, 1)".into(),
            ));
        }
        if !(mu > 0.0) {
            return Err(OrbisError::InvalidParameter("mu must be > 0".into()));
        }
        if !rotation_rate.is_finite() {
            return Err(OrbisError::InvalidParameter(
                "rotation_rate must be finite".into(),
            ));
        }
        Ok(EarthModel {
            semi_major_axis,
            flattening,
            mu,
            rotation_rate,
        })
    }

    /// First eccentricity squared, `e² = f(2 − f)`.
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Polar radius `b = a(1 − f)` in km.
    pub fn semi_minor_axis(&self) -> Kilometer {
        self.semi_major_axis * (1.0 - self.flattening)
    }
}

impl Default for EarthModel {
    fn default() -> Self {
        EarthModel::WGS84
    }
}
