//! # Geodetic ⇄ ECEF
//!
//! Conversions between geodetic coordinates on an oblate spheroid and Earth-Centered
//! Earth-Fixed Cartesian coordinates.
//!
//! - [`geodetic_to_ecef`] is closed form, through the prime-vertical radius of curvature
//!   `N = a / sqrt(1 − e² sin²φ)`.
//! - [`ecef_to_geodetic`] is a Bowring-style fixed point on latitude,
//!   `tan φ = (z + e² N sin φ) / p`, run for a **fixed** number of iterations. The
//!   contraction factor is about `e²` so ten iterations are far below machine epsilon
//!   for any altitude a satellite can have.
//!
//! Lengths are in km, angles in degrees.

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Kilometer},
    earth_model::EarthModel,
    orbis_errors::OrbisError,
};

/// Geodetic position relative to the reference ellipsoid.
///
/// Invariants
/// ----------
/// * `latitude` ∈ [-90°, 90°]
/// * `longitude` ∈ (-180°, 180°]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticCoordinate {
    pub latitude: Degree,
    pub longitude: Degree,
    pub altitude: Kilometer,
}

impl GeodeticCoordinate {
    /// Build a coordinate, wrapping the longitude into (-180°, 180°].
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::InvalidLatitude`] if the latitude is outside [-90°, 90°] or not finite.
    /// * [`OrbisError::InvalidParameter`] if the longitude or altitude is not finite.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        altitude: Kilometer,
    ) -> Result<Self, OrbisError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(OrbisError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !altitude.is_finite() {
            return Err(OrbisError::InvalidParameter(
                "longitude and altitude must be finite".into(),
            ));
        }
        Ok(GeodeticCoordinate {
            latitude,
            longitude: wrap_longitude(longitude),
            altitude,
        })
    }
}

/// Normalize a longitude into (-180°, 180°].
pub fn wrap_longitude(longitude: Degree) -> Degree {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Convert geodetic coordinates to an ECEF position (km).
///
/// ```text
/// x = (N + h) cos φ cos λ
/// y = (N + h) cos φ sin λ
/// z = (N (1 − e²) + h) sin φ
/// ```
pub fn geodetic_to_ecef(coord: &GeodeticCoordinate, earth: &EarthModel) -> Vector3<f64> {
    let e2 = earth.eccentricity_squared();
    let (sin_lat, cos_lat) = coord.latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = coord.longitude.to_radians().sin_cos();

    let n = earth.semi_major_axis / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + coord.altitude) * cos_lat * cos_lon,
        (n + coord.altitude) * cos_lat * sin_lon,
        (n * (1.0 - e2) + coord.altitude) * sin_lat,
    )
}

/// Convert an ECEF position (km) to geodetic coordinates.
///
/// Arguments
/// ---------
/// * `position`: ECEF position in km.
/// * `earth`: reference ellipsoid.
/// * `iterations`: number of latitude refinements (see
///   [`GEODETIC_ITERATIONS`](crate::constants::GEODETIC_ITERATIONS)); no convergence test is made.
///
/// Remarks
/// -------
/// The altitude is computed as `h = p cos φ + z sin φ − a sqrt(1 − e² sin²φ)`, which stays
/// well-conditioned on the polar axis where `p / cos φ − N` would divide by zero.
pub fn ecef_to_geodetic(
    position: &Vector3<f64>,
    earth: &EarthModel,
    iterations: usize,
) -> GeodeticCoordinate {
    let a = earth.semi_major_axis;
    let e2 = earth.eccentricity_squared();

    let p = position.x.hypot(position.y);
    let z = position.z;
    let longitude = position.y.atan2(position.x);

    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..iterations {
        let sin_lat = lat.sin();
        let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        lat = (z + e2 * n * sin_lat).atan2(p);
    }

    let (sin_lat, cos_lat) = lat.sin_cos();
    let altitude = p * cos_lat + z * sin_lat - a * (1.0 - e2 * sin_lat * sin_lat).sqrt();

    GeodeticCoordinate {
        latitude: lat.to_degrees(),
        longitude: wrap_longitude(longitude.to_degrees()),
        altitude,
    }
}

/// Distance from the Earth's centre to the ellipsoid surface at a geodetic latitude.
///
/// ```text
/// R(φ) = sqrt( ((a² cos φ)² + (b² sin φ)²) / ((a cos φ)² + (b sin φ)²) )
/// ```
pub fn geocentric_radius(latitude: Degree, earth: &EarthModel) -> Kilometer {
    let a = earth.semi_major_axis;
    let b = earth.semi_minor_axis();
    let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();

    let num = (a * a * cos_lat).powi(2) + (b * b * sin_lat).powi(2);
    let den = (a * cos_lat).powi(2) + (b * sin_lat).powi(2);
    (num / den).sqrt()
}
