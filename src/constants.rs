//! # Constants and type definitions for orbis
//!
//! This module centralizes the **physical constants**, **conversion factors**, the
//! **default solver bounds** and the **type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Geodetic and gravitational constants (WGS84, μ⊕, Earth rotation rate)
//! - J2 secular drift coefficients (degrees per day, semi-major axis in km)
//! - Unit conversions (days ↔ seconds)
//! - Default iteration caps for the fixed-point solvers
//!
//! The iteration caps are only defaults: [`FrameSettings`](crate::ref_frame::FrameSettings) and
//! [`PropagationParams`](crate::propagation::PropagationParams) expose them as tunables.
//! Changing them changes the numeric output at the margins.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// WGS84 equatorial radius in kilometers
pub const WGS84_SEMI_MAJOR_AXIS: Kilometer = 6_378.137;

/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// Earth gravitational parameter μ in km³/s²
pub const EARTH_MU: f64 = 398_600.4418;

/// Earth sidereal rotation rate in rad/s
pub const EARTH_ROTATION_RATE: f64 = 7.292_115e-5;

/// Mean sidereal hours at the J2000 reference instant
pub const GMST_HOURS_AT_J2000: f64 = 18.697374558;

/// Sidereal hours elapsed per solar day
pub const GMST_HOURS_PER_DAY: f64 = 24.06570982441908;

/// J2 nodal regression coefficient, deg/day with `a` in km
pub const J2_RAAN_RATE_COEFF: f64 = -2.064734896e14;

/// J2 apsidal rotation coefficient, deg/day with `a` in km
pub const J2_PERIGEE_RATE_COEFF: f64 = 1.032367448e14;

// -------------------------------------------------------------------------------------------------
// Solver defaults
// -------------------------------------------------------------------------------------------------

/// Fixed number of latitude iterations in the ECEF → geodetic conversion
pub const GEODETIC_ITERATIONS: usize = 10;

/// Fixed number of Kepler iterations in the J2 secular propagator
pub const J2_ANOMALY_ITERATIONS: usize = 50;

/// Convergence threshold on |E(k+1) − E(k)| for the two-body Kepler solver (radians)
pub const KEPLER_TOLERANCE: f64 = 1e-10;

/// Upper bound on the two-body Kepler solver iterations
pub const KEPLER_MAX_ITERATIONS: usize = 200;

/// Below this value eccentricity counts as circular and sin(i) as equatorial
pub const ELEMENT_DEGENERACY_TOL: f64 = 1e-10;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
