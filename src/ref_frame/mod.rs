//! # Reference frames and conversions
//!
//! Five representations of where a satellite is:
//!
//! | [`Frame`]    | payload                                   |
//! |--------------|-------------------------------------------|
//! | `Geodetic`   | [`GeodeticCoordinate`] (lat, lon, alt)    |
//! | `Ecef`       | Earth-fixed position (km)                 |
//! | `Eci`        | inertial position (km)                    |
//! | `Rv`         | [`StateVector`] (position + velocity)     |
//! | `Kepler`     | [`KeplerianElements`]                     |
//!
//! Conversions form a directed graph of single edges,
//!
//! ```text
//! Kepler ⇄ Rv → Eci ⇄ Ecef ⇄ Geodetic
//! ```
//!
//! and [`FrameConverter::convert`] composes them along the unique route between two
//! frames. `Rv → Eci` drops the velocity, so nothing leads back into `Rv` from the
//! position-only frames and such requests fail with [`OrbisError::NoConversionPath`].
//! An `Rv` state tagged Earth-fixed goes straight to `Ecef` (and on to `Geodetic`)
//! without passing through ECI, so no epoch is involved.
//!
//! Every single-edge method checks the tag of its input and fails with
//! [`OrbisError::FrameMismatch`] otherwise.
//!
//! ## Example
//!
//! ```rust
//! use hifitime::Epoch;
//! use orbis::ref_frame::{Frame, FrameConverter, FrameValue};
//! use orbis::ref_frame::geodetic::GeodeticCoordinate;
//!
//! let converter = FrameConverter::default();
//! let paris = FrameValue::Geodetic(GeodeticCoordinate::new(48.8566, 2.3522, 0.035).unwrap());
//! let epoch = Epoch::from_gregorian_utc_hms(2024, 6, 21, 12, 0, 0);
//!
//! let eci = converter.convert(&paris, Frame::Eci, Some(&epoch)).unwrap();
//! assert_eq!(eci.frame(), Frame::Eci);
//!
//! // the ECI ⇄ ECEF rotation needs a time
//! assert!(converter.convert(&paris, Frame::Eci, None).is_err());
//! ```

use hifitime::Epoch;
use log::debug;
use nalgebra::Vector3;

use crate::{
    constants::GEODETIC_ITERATIONS,
    earth_model::EarthModel,
    orbis_errors::OrbisError,
    orbit_type::keplerian_element::KeplerianElements,
    ref_frame::{
        geodetic::GeodeticCoordinate,
        state_vector::{CartesianFrame, StateVector},
    },
};

/// Geodetic ⇄ ECEF conversions on the reference ellipsoid.
pub mod geodetic;

/// ECEF ⇄ ECI rotation through Greenwich Mean Sidereal Time.
pub mod inertial;

/// Frame-tagged position/velocity states.
pub mod state_vector;

/// Closed set of supported representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Geodetic,
    Ecef,
    Eci,
    Rv,
    Kepler,
}

/// A value tagged with the frame it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameValue {
    Geodetic(GeodeticCoordinate),
    Ecef(Vector3<f64>),
    Eci(Vector3<f64>),
    Rv(StateVector),
    Kepler(KeplerianElements),
}

impl FrameValue {
    pub fn frame(&self) -> Frame {
        match self {
            FrameValue::Geodetic(_) => Frame::Geodetic,
            FrameValue::Ecef(_) => Frame::Ecef,
            FrameValue::Eci(_) => Frame::Eci,
            FrameValue::Rv(_) => Frame::Rv,
            FrameValue::Kepler(_) => Frame::Kepler,
        }
    }

    /// Epoch carried by the payload itself, if any.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            FrameValue::Rv(state) => Some(state.epoch),
            FrameValue::Kepler(kep) => Some(kep.reference_epoch),
            _ => None,
        }
    }
}

/// Configuration of a [`FrameConverter`].
///
/// `geodetic_iterations` is the fixed number of latitude refinements made by
/// ECEF → geodetic; it is not convergence-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    pub earth: EarthModel,
    pub geodetic_iterations: usize,
}

impl Default for FrameSettings {
    fn default() -> Self {
        FrameSettings {
            earth: EarthModel::WGS84,
            geodetic_iterations: GEODETIC_ITERATIONS,
        }
    }
}

/// Next frame on the route from `from` to `to`, `None` when `to` is unreachable
/// (or already reached).
fn next_hop(from: Frame, to: Frame) -> Option<Frame> {
    use Frame::*;
    match (from, to) {
        (f, t) if f == t => None,
        (Kepler, _) => Some(Rv),
        (Rv, Kepler) => Some(Kepler),
        (Rv, _) => Some(Eci),
        (Eci, Ecef | Geodetic) => Some(Ecef),
        (Eci, Eci | Rv | Kepler) => None,
        (Ecef, Geodetic) => Some(Geodetic),
        (Ecef, _) => Some(Eci),
        (Geodetic, _) => Some(Ecef),
    }
}

fn needs_epoch(from: Frame, to: Frame) -> bool {
    matches!(
        (from, to),
        (Frame::Eci, Frame::Ecef) | (Frame::Ecef, Frame::Eci)
    )
}

fn mismatch(expected: Frame, value: &FrameValue) -> OrbisError {
    OrbisError::FrameMismatch {
        expected,
        found: value.frame(),
    }
}

/// Frame conversion engine.
#[derive(Debug, Clone, Default)]
pub struct FrameConverter {
    settings: FrameSettings,
}

impl FrameConverter {
    pub fn new(settings: FrameSettings) -> Self {
        FrameConverter { settings }
    }

    /// Sequence of frames visited from `from` to `to`, both ends included.
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::NoConversionPath`] if `to` cannot be reached from `from`.
    pub fn route(from: Frame, to: Frame) -> Result<Vec<Frame>, OrbisError> {
        let mut path = vec![from];
        let mut current = from;
        while current != to {
            current = next_hop(current, to).ok_or(OrbisError::NoConversionPath { from, to })?;
            path.push(current);
        }
        Ok(path)
    }

    /// Convert `value` into the `target` frame, composing single-edge conversions.
    ///
    /// Arguments
    /// ---------
    /// * `value`: tagged input.
    /// * `target`: requested frame.
    /// * `epoch`: time of the ECI ⇄ ECEF rotation; when `None`, the epoch carried by the
    ///   payload (`Rv`, `Kepler`) is used.
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::NoConversionPath`] if the target is unreachable.
    /// * [`OrbisError::MissingEpoch`] if the route crosses ECI ⇄ ECEF and no epoch is available.
    /// * Any error of the single-edge conversions along the route.
    pub fn convert(
        &self,
        value: &FrameValue,
        target: Frame,
        epoch: Option<&Epoch>,
    ) -> Result<FrameValue, OrbisError> {
        let epoch = epoch.copied().or_else(|| value.epoch());

        // an Earth-fixed state reaches the Earth-fixed frames without a rotation
        let start = match value {
            FrameValue::Rv(state)
                if state.frame == CartesianFrame::Ecef
                    && matches!(target, Frame::Ecef | Frame::Geodetic) =>
            {
                self.rv_to_ecef(value)?
            }
            _ => *value,
        };
        let route = Self::route(start.frame(), target)?;

        let rotates = route.windows(2).any(|hop| needs_epoch(hop[0], hop[1]));
        if rotates && epoch.is_none() {
            return Err(OrbisError::MissingEpoch);
        }

        debug!("Frame conversion route: {route:?}");

        let mut current = start;
        for hop in route.windows(2) {
            current = self.step(&current, hop[1], epoch.as_ref())?;
        }
        Ok(current)
    }

    fn step(
        &self,
        value: &FrameValue,
        to: Frame,
        epoch: Option<&Epoch>,
    ) -> Result<FrameValue, OrbisError> {
        match (value.frame(), to) {
            (Frame::Geodetic, Frame::Ecef) => self.geodetic_to_ecef(value),
            (Frame::Ecef, Frame::Geodetic) => self.ecef_to_geodetic(value),
            (Frame::Ecef, Frame::Eci) => {
                self.ecef_to_eci(value, epoch.ok_or(OrbisError::MissingEpoch)?)
            }
            (Frame::Eci, Frame::Ecef) => {
                self.eci_to_ecef(value, epoch.ok_or(OrbisError::MissingEpoch)?)
            }
            (Frame::Rv, Frame::Eci) => self.rv_to_eci(value),
            (Frame::Rv, Frame::Kepler) => self.rv_to_kepler(value),
            (Frame::Kepler, Frame::Rv) => self.kepler_to_rv(value),
            (from, to) => Err(OrbisError::NoConversionPath { from, to }),
        }
    }

    pub fn geodetic_to_ecef(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Geodetic(coord) => Ok(FrameValue::Ecef(geodetic::geodetic_to_ecef(
                coord,
                &self.settings.earth,
            ))),
            other => Err(mismatch(Frame::Geodetic, other)),
        }
    }

    pub fn ecef_to_geodetic(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Ecef(r) => Ok(FrameValue::Geodetic(geodetic::ecef_to_geodetic(
                r,
                &self.settings.earth,
                self.settings.geodetic_iterations,
            ))),
            other => Err(mismatch(Frame::Ecef, other)),
        }
    }

    pub fn ecef_to_eci(&self, value: &FrameValue, epoch: &Epoch) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Ecef(r) => Ok(FrameValue::Eci(inertial::ecef_to_eci(r, epoch))),
            other => Err(mismatch(Frame::Ecef, other)),
        }
    }

    pub fn eci_to_ecef(&self, value: &FrameValue, epoch: &Epoch) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Eci(r) => Ok(FrameValue::Ecef(inertial::eci_to_ecef(r, epoch))),
            other => Err(mismatch(Frame::Eci, other)),
        }
    }

    /// Inertial position of a state; an Earth-fixed state is rotated at its own epoch.
    pub fn rv_to_eci(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Rv(state) => {
                let r = match state.frame {
                    CartesianFrame::Eci => state.position,
                    CartesianFrame::Ecef => inertial::ecef_to_eci(&state.position, &state.epoch),
                };
                Ok(FrameValue::Eci(r))
            }
            other => Err(mismatch(Frame::Rv, other)),
        }
    }

    /// Earth-fixed position of an Earth-fixed state.
    pub fn rv_to_ecef(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Rv(state) if state.frame == CartesianFrame::Ecef => {
                Ok(FrameValue::Ecef(state.position))
            }
            FrameValue::Rv(_) => Err(OrbisError::FrameMismatch {
                expected: Frame::Ecef,
                found: Frame::Eci,
            }),
            other => Err(mismatch(Frame::Rv, other)),
        }
    }

    /// Classical elements of a state; an Earth-fixed state is first moved to ECI.
    pub fn rv_to_kepler(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Rv(state) => {
                let inertial_state = match state.frame {
                    CartesianFrame::Eci => *state,
                    CartesianFrame::Ecef => {
                        inertial::ecef_state_to_eci(state, &self.settings.earth)?
                    }
                };
                Ok(FrameValue::Kepler(KeplerianElements::from_state_vector(
                    &inertial_state,
                    &self.settings.earth,
                )?))
            }
            other => Err(mismatch(Frame::Rv, other)),
        }
    }

    pub fn kepler_to_rv(&self, value: &FrameValue) -> Result<FrameValue, OrbisError> {
        match value {
            FrameValue::Kepler(kep) => {
                Ok(FrameValue::Rv(kep.to_state_vector(&self.settings.earth)?))
            }
            other => Err(mismatch(Frame::Kepler, other)),
        }
    }
}
