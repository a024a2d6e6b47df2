//! # Orbital element representations
//!
//! Only the classical set is provided:
//!
//! - [`keplerian_element`](crate::orbit_type::keplerian_element) — `(a, e, i, Ω, ω, ν)` for
//!   bound geocentric orbits, with the conversions to and from an ECI
//!   [`StateVector`](crate::ref_frame::state_vector::StateVector).
//!
//! ## Typical workflow
//!
//! ```rust
//! use hifitime::Epoch;
//! use nalgebra::Vector3;
//! use orbis::earth_model::EarthModel;
//! use orbis::orbit_type::keplerian_element::KeplerianElements;
//! use orbis::ref_frame::state_vector::StateVector;
//!
//! let epoch = Epoch::from_gregorian_utc_hms(1999, 9, 9, 15, 30, 0);
//! let state = StateVector::eci(
//!     Vector3::new(8228.0, 389.0, 6888.0),
//!     Vector3::new(-0.7, 6.6, -0.6),
//!     epoch,
//! );
//!
//! let kep = KeplerianElements::from_state_vector(&state, &EarthModel::WGS84).unwrap();
//! assert!((kep.semi_major_axis - 13360.64).abs() < 0.01);
//! ```

/// Classical Keplerian elements structure and conversions.
pub mod keplerian_element;
