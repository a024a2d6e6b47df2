//! # Two-line element sets
//!
//! Parsing and validation of NORAD two-line element sets (TLE), and the boundary to an
//! external SGP4-class propagator.
//!
//! A TLE is accepted when
//!
//! - both lines are exactly 69 ASCII characters,
//! - they start with `1` and `2` respectively,
//! - both carry the same catalogue number,
//! - the last character of each line is its checksum: the sum of all digits of the first
//!   68 characters, with `-` counting as 1 and every other character as 0, modulo 10.
//!
//! [`TwoLineElement::mean_elements`] exposes the parsed mean elements as
//! [`KeplerianElements`] and [`TwoLineElement::mean_motion_dot`] the mean-motion
//! derivative, which together drive [`propagate_j2`]. The
//! [`GeodeticPropagator`] trait models a full SGP4 service; [`J2GeodeticPropagator`]
//! is the in-crate implementation built on the J2 secular model.

use hifitime::{Epoch, Unit};
use log::debug;

use crate::{
    constants::{DPI, SECONDS_PER_DAY},
    kepler::mean_to_true,
    orbis_errors::OrbisError,
    orbit_type::keplerian_element::{principal_degrees, KeplerianElements},
    propagation::{j2::propagate_j2, PropagationParams},
    ref_frame::{geodetic::GeodeticCoordinate, Frame, FrameConverter, FrameSettings, FrameValue},
};

const TLE_LINE_LENGTH: usize = 69;

/// Parsed two-line element set.
///
/// Angles are in degrees, the mean motion in rev/day and its first derivative
/// (stored halved, as printed in the TLE) in rev/day².
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLineElement {
    pub line1: String,
    pub line2: String,
    pub catalog_number: u32,
    pub classification: char,
    pub international_designator: String,
    pub epoch: Epoch,
    pub mean_motion_dot_half: f64,
    pub mean_motion_ddot_sixth: f64,
    pub bstar: f64,
    pub element_set_number: u32,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub eccentricity: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
    pub mean_motion: f64,
    pub revolution_number: u32,
}

fn format_error(msg: impl Into<String>) -> OrbisError {
    OrbisError::TleFormat(msg.into())
}

fn field<'a>(line: &'a str, start: usize, end: usize) -> &'a str {
    line[start..end].trim()
}

fn parse_f64(line: &str, start: usize, end: usize, name: &str) -> Result<f64, OrbisError> {
    let raw = field(line, start, end);
    raw.parse::<f64>()
        .map_err(|_| format_error(format!("cannot parse {name} from {raw:?}")))
}

fn parse_u32(line: &str, start: usize, end: usize, name: &str) -> Result<u32, OrbisError> {
    let raw = field(line, start, end);
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u32>()
        .map_err(|_| format_error(format!("cannot parse {name} from {raw:?}")))
}

/// Parse the TLE "implied decimal point, signed exponent" notation, e.g.
/// `-11606-4` → `-0.11606e-4`.
fn parse_implied_exponent(raw: &str, name: &str) -> Result<f64, OrbisError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let invalid = || format_error(format!("cannot parse {name} from {raw:?}"));
    let exp_pos = body.rfind(['+', '-']).filter(|&p| p > 0).ok_or_else(invalid)?;

    let mantissa: f64 = format!("0.{}", body[..exp_pos].trim())
        .parse()
        .map_err(|_| invalid())?;
    let exponent: i32 = body[exp_pos..].parse().map_err(|_| invalid())?;

    Ok(sign * mantissa * 10f64.powi(exponent))
}

/// Checksum of the first 68 characters: digits count at face value, `-` as 1.
pub fn tle_checksum(line: &str) -> u32 {
    line.bytes()
        .take(TLE_LINE_LENGTH - 1)
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

fn check_line(line: &str, number: u8) -> Result<(), OrbisError> {
    if !line.is_ascii() {
        return Err(format_error(format!("line {number} is not ASCII")));
    }
    if line.len() != TLE_LINE_LENGTH {
        return Err(format_error(format!(
            "line {number} has length {} (expected {TLE_LINE_LENGTH})",
            line.len()
        )));
    }
    if line.as_bytes()[0] != b'0' + number {
        return Err(format_error(format!(
            "line {number} does not start with its line number"
        )));
    }

    let last = line.as_bytes()[TLE_LINE_LENGTH - 1];
    if !last.is_ascii_digit() {
        return Err(format_error(format!(
            "line {number} does not end with a checksum digit"
        )));
    }
    let expected = (last - b'0') as u32;
    let computed = tle_checksum(line);
    if expected != computed {
        return Err(OrbisError::TleChecksum {
            line: number,
            expected,
            computed,
        });
    }
    Ok(())
}

impl TwoLineElement {
    /// Validate and parse a two-line element set.
    ///
    /// Trailing whitespace (line terminators) is ignored.
    ///
    /// Errors
    /// ------
    /// * [`OrbisError::TleFormat`] on a malformed line, a catalogue number mismatch or an
    ///   unparsable field.
    /// * [`OrbisError::TleChecksum`] if a checksum digit does not match.
    pub fn new(line1: &str, line2: &str) -> Result<Self, OrbisError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();
        check_line(line1, 1)?;
        check_line(line2, 2)?;

        let catalog_number = parse_u32(line1, 2, 7, "catalogue number")?;
        let catalog_number_2 = parse_u32(line2, 2, 7, "catalogue number")?;
        if catalog_number != catalog_number_2 {
            return Err(format_error(format!(
                "catalogue numbers differ between lines ({catalog_number} vs {catalog_number_2})"
            )));
        }

        let year_2digit = parse_u32(line1, 18, 20, "epoch year")?;
        let year = if year_2digit >= 57 {
            1900 + year_2digit
        } else {
            2000 + year_2digit
        };
        let day_of_year = parse_f64(line1, 20, 32, "epoch day")?;
        if !(1.0..367.0).contains(&day_of_year) {
            return Err(format_error(format!(
                "epoch day {day_of_year} is outside [1, 367)"
            )));
        }
        let epoch = Epoch::from_gregorian_utc_at_midnight(year as i32, 1, 1)
            + (day_of_year - 1.0) * Unit::Day;

        let eccentricity: f64 = format!("0.{}", field(line2, 26, 33))
            .parse()
            .map_err(|_| format_error("cannot parse eccentricity"))?;

        let tle = TwoLineElement {
            line1: line1.to_string(),
            line2: line2.to_string(),
            catalog_number,
            classification: line1.as_bytes()[7] as char,
            international_designator: field(line1, 9, 17).to_string(),
            epoch,
            mean_motion_dot_half: parse_f64(line1, 33, 43, "mean motion derivative")?,
            mean_motion_ddot_sixth: parse_implied_exponent(&line1[44..52], "second derivative")?,
            bstar: parse_implied_exponent(&line1[53..61], "bstar")?,
            element_set_number: parse_u32(line1, 64, 68, "element set number")?,
            inclination: parse_f64(line2, 8, 16, "inclination")?,
            ascending_node_longitude: parse_f64(line2, 17, 25, "ascending node")?,
            eccentricity,
            periapsis_argument: parse_f64(line2, 34, 42, "argument of perigee")?,
            mean_anomaly: parse_f64(line2, 43, 51, "mean anomaly")?,
            mean_motion: parse_f64(line2, 52, 63, "mean motion")?,
            revolution_number: parse_u32(line2, 63, 68, "revolution number")?,
        };

        if !(tle.mean_motion > 0.0) {
            return Err(format_error("mean motion must be > 0"));
        }
        debug!(
            "Parsed TLE for catalogue number {} at epoch {}",
            tle.catalog_number, tle.epoch
        );
        Ok(tle)
    }

    /// First derivative of the mean motion, `ṅ` in rev/day².
    pub fn mean_motion_dot(&self) -> f64 {
        2.0 * self.mean_motion_dot_half
    }

    /// Mean elements at the TLE epoch.
    ///
    /// The semi-major axis follows from the mean motion, `a = (μ / n²)^(1/3)`, and the true
    /// anomaly from the mean anomaly through Kepler's equation.
    pub fn mean_elements(
        &self,
        params: &PropagationParams,
    ) -> Result<KeplerianElements, OrbisError> {
        let n = self.mean_motion * DPI / SECONDS_PER_DAY;
        let semi_major_axis = (params.earth.mu / (n * n)).cbrt();

        let nu = mean_to_true(
            self.mean_anomaly.to_radians(),
            self.eccentricity,
            params.kepler_tolerance,
            params.kepler_max_iterations,
        )?;

        KeplerianElements::new(
            self.epoch,
            semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.ascending_node_longitude,
            self.periapsis_argument,
            principal_degrees(nu.to_degrees()),
        )
    }
}

/// External service returning the geodetic position of the object described by a TLE.
pub trait GeodeticPropagator {
    fn geodetic_position(
        &self,
        tle: &TwoLineElement,
        epoch: &Epoch,
    ) -> Result<GeodeticCoordinate, OrbisError>;
}

/// [`GeodeticPropagator`] backed by the J2 secular model of [`propagate_j2`].
///
/// Much coarser than SGP4 but self-contained: mean elements are propagated, turned into
/// an ECI state and projected on the reference ellipsoid at the target epoch.
#[derive(Debug, Clone, Default)]
pub struct J2GeodeticPropagator {
    params: PropagationParams,
    frames: FrameConverter,
}

impl J2GeodeticPropagator {
    pub fn new(params: PropagationParams) -> Self {
        let frames = FrameConverter::new(FrameSettings {
            earth: params.earth,
            ..FrameSettings::default()
        });
        J2GeodeticPropagator { params, frames }
    }
}

impl GeodeticPropagator for J2GeodeticPropagator {
    fn geodetic_position(
        &self,
        tle: &TwoLineElement,
        epoch: &Epoch,
    ) -> Result<GeodeticCoordinate, OrbisError> {
        let elements = tle.mean_elements(&self.params)?;
        let propagated = propagate_j2(&elements, tle.mean_motion_dot(), epoch, &self.params)?;

        match self
            .frames
            .convert(&FrameValue::Kepler(propagated), Frame::Geodetic, Some(epoch))?
        {
            FrameValue::Geodetic(coord) => Ok(coord),
            other => Err(OrbisError::FrameMismatch {
                expected: Frame::Geodetic,
                found: other.frame(),
            }),
        }
    }
}
