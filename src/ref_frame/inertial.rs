//! # ECEF ⇄ ECI
//!
//! The Earth-fixed and inertial frames share their Z axis; they differ by a rotation
//! about Z by the Greenwich Mean Sidereal Time angle θ(t) from [`crate::time::gmst`]:
//!
//! ```text
//! r_eci  = R_z(θ) · r_ecef
//! r_ecef = R_z(θ)ᵀ · r_eci
//! ```
//!
//! Full state vectors also carry the transport term of the rotating frame on the
//! velocity, `v_eci = R_z(θ) · (v_ecef + ω⊕ × r_ecef)`.

use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::{
    earth_model::EarthModel,
    orbis_errors::OrbisError,
    ref_frame::{
        state_vector::{CartesianFrame, StateVector},
        Frame,
    },
    time::gmst,
    vector_math::{rotation_matrix, Axis},
};

/// Rotation matrix taking ECEF vectors to ECI at `epoch`.
pub fn ecef_to_eci_matrix(epoch: &Epoch) -> Matrix3<f64> {
    rotation_matrix(Axis::Z, gmst(epoch))
}

pub fn ecef_to_eci(position: &Vector3<f64>, epoch: &Epoch) -> Vector3<f64> {
    ecef_to_eci_matrix(epoch) * position
}

pub fn eci_to_ecef(position: &Vector3<f64>, epoch: &Epoch) -> Vector3<f64> {
    ecef_to_eci_matrix(epoch).transpose() * position
}

/// Express an Earth-fixed state in the inertial frame, at the state's own epoch.
///
/// Errors
/// ------
/// * [`OrbisError::FrameMismatch`] if `state` is not tagged [`CartesianFrame::Ecef`].
pub fn ecef_state_to_eci(
    state: &StateVector,
    earth: &EarthModel,
) -> Result<StateVector, OrbisError> {
    if state.frame != CartesianFrame::Ecef {
        return Err(OrbisError::FrameMismatch {
            expected: Frame::Ecef,
            found: state.frame.into(),
        });
    }
    let rot = ecef_to_eci_matrix(&state.epoch);
    let omega = Vector3::new(0.0, 0.0, earth.rotation_rate);

    Ok(StateVector::eci(
        rot * state.position,
        rot * (state.velocity + omega.cross(&state.position)),
        state.epoch,
    ))
}

/// Express an inertial state in the Earth-fixed frame, at the state's own epoch.
///
/// Errors
/// ------
/// * [`OrbisError::FrameMismatch`] if `state` is not tagged [`CartesianFrame::Eci`].
pub fn eci_state_to_ecef(
    state: &StateVector,
    earth: &EarthModel,
) -> Result<StateVector, OrbisError> {
    if state.frame != CartesianFrame::Eci {
        return Err(OrbisError::FrameMismatch {
            expected: Frame::Eci,
            found: state.frame.into(),
        });
    }
    let rot_t = ecef_to_eci_matrix(&state.epoch).transpose();
    let omega = Vector3::new(0.0, 0.0, earth.rotation_rate);

    let position = rot_t * state.position;
    let velocity = rot_t * state.velocity - omega.cross(&position);
    Ok(StateVector::ecef(position, velocity, state.epoch))
}
