//! # Orbit propagation
//!
//! Pure functions mapping a [`KeplerianElements`](crate::orbit_type::keplerian_element::KeplerianElements)
//! set and a target epoch to a new element set:
//!
//! - [`two_body::propagate_two_body`] — unperturbed Keplerian motion, the mean anomaly advances
//!   linearly and Kepler's equation is solved to a tolerance.
//! - [`j2::propagate_j2`] — secular drift of the node and perigee from the Earth's oblateness,
//!   plus decay of `a` and `e` driven by the first derivative of the mean motion.
//!
//! Both are configured by [`PropagationParams`], built with the validating
//! [`PropagationParamsBuilder`]:
//!
//! ```rust
//! use orbis::propagation::PropagationParams;
//!
//! let params = PropagationParams::builder()
//!     .kepler_tolerance(1e-12)
//!     .kepler_max_iterations(500)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.j2_anomaly_iterations, 50);
//!
//! assert!(PropagationParams::builder().kepler_max_iterations(0).build().is_err());
//! ```

use std::cmp::Ordering::Greater;

use crate::{
    constants::{J2_ANOMALY_ITERATIONS, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE},
    earth_model::EarthModel,
    orbis_errors::OrbisError,
};

/// J2 secular propagation with mean-motion decay.
pub mod j2;

/// Unperturbed two-body propagation.
pub mod two_body;

/// Configuration of the propagators.
///
/// Fields
/// -----------------
/// * `earth`: central body; supplies μ.
/// * `kepler_tolerance`: stop criterion `|ΔE|` of the two-body Kepler solver (rad).
/// * `kepler_max_iterations`: iteration cap of the two-body Kepler solver.
/// * `j2_anomaly_iterations`: fixed number of Kepler iterations of the J2 propagator.
///
/// Changing the iteration counts changes the numeric output at the margins.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationParams {
    pub earth: EarthModel,
    pub kepler_tolerance: f64,
    pub kepler_max_iterations: usize,
    pub j2_anomaly_iterations: usize,
}

impl PropagationParams {
    /// Equivalent to [`PropagationParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PropagationParamsBuilder {
        PropagationParamsBuilder::new()
    }
}

impl Default for PropagationParams {
    fn default() -> Self {
        PropagationParams {
            earth: EarthModel::WGS84,
            kepler_tolerance: KEPLER_TOLERANCE,
            kepler_max_iterations: KEPLER_MAX_ITERATIONS,
            j2_anomaly_iterations: J2_ANOMALY_ITERATIONS,
        }
    }
}

/// Builder for [`PropagationParams`], with validation.
#[derive(Debug, Clone)]
pub struct PropagationParamsBuilder {
    params: PropagationParams,
}

impl Default for PropagationParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: PropagationParams::default(),
        }
    }

    pub fn earth(mut self, v: EarthModel) -> Self {
        self.params.earth = v;
        self
    }
    pub fn kepler_tolerance(mut self, v: f64) -> Self {
        self.params.kepler_tolerance = v;
        self
    }
    pub fn kepler_max_iterations(mut self, v: usize) -> Self {
        self.params.kepler_max_iterations = v;
        self
    }
    pub fn j2_anomaly_iterations(mut self, v: usize) -> Self {
        self.params.j2_anomaly_iterations = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `kepler_tolerance > 0.0`
    /// * `kepler_max_iterations ≥ 1`, `j2_anomaly_iterations ≥ 1`
    /// * `earth.semi_major_axis > 0.0`, `earth.mu > 0.0`
    pub fn build(self) -> Result<PropagationParams, OrbisError> {
        let p = &self.params;

        if !Self::gt0(p.kepler_tolerance) {
            return Err(OrbisError::InvalidParameter(
                "kepler_tolerance must be > 0".into(),
            ));
        }
        if p.kepler_max_iterations < 1 {
            return Err(OrbisError::InvalidParameter(
                "kepler_max_iterations must be >= 1".into(),
            ));
        }
        if p.j2_anomaly_iterations < 1 {
            return Err(OrbisError::InvalidParameter(
                "j2_anomaly_iterations must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.earth.semi_major_axis) || !Self::gt0(p.earth.mu) {
            return Err(OrbisError::InvalidParameter(
                "earth model must have positive radius and mu".into(),
            ));
        }

        Ok(self.params)
    }
}

#[cfg(test)]
mod propagation_params_test {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PropagationParams::new();
        assert_eq!(p.earth, EarthModel::WGS84);
        assert_eq!(p.kepler_tolerance, 1e-10);
        assert_eq!(p.kepler_max_iterations, 200);
        assert_eq!(p.j2_anomaly_iterations, 50);
        assert_eq!(PropagationParams::builder().build().unwrap(), p);
    }

    #[test]
    fn test_builder_validation() {
        assert_eq!(
            PropagationParams::builder().kepler_tolerance(0.0).build(),
            Err(OrbisError::InvalidParameter(
                "kepler_tolerance must be > 0".into()
            ))
        );
        assert!(PropagationParams::builder()
            .kepler_tolerance(f64::NAN)
            .build()
            .is_err());
        assert!(PropagationParams::builder()
            .j2_anomaly_iterations(0)
            .build()
            .is_err());

        let custom = EarthModel::new(6371.0, 0.0, 398600.0, 7.29e-5).unwrap();
        let p = PropagationParams::builder().earth(custom).build().unwrap();
        assert_eq!(p.earth.flattening, 0.0);
    }
}
