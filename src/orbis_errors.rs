use thiserror::Error;

use crate::ref_frame::Frame;

#[derive(Error, Debug, Clone)]
pub enum OrbisError {
    #[error("Frame mismatch: expected {expected:?}, found {found:?}")]
    FrameMismatch { expected: Frame, found: Frame },

    #[error("No conversion path from {from:?} to {to:?}")]
    NoConversionPath { from: Frame, to: Frame },

    #[error("An epoch is required to rotate between ECEF and ECI")]
    MissingEpoch,

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Matrix is not positive definite (pivot {pivot} = {value})")]
    NotPositiveDefinite { pivot: usize, value: f64 },

    #[error("Kepler solver did not converge after {iterations} iterations (last step {last_step:e})")]
    NonConvergence { iterations: usize, last_step: f64 },

    #[error("Eccentricity {0} is outside the elliptic range [0, 1)")]
    InvalidEccentricity(f64),

    #[error("Semi-major axis must be strictly positive, got {0} km")]
    InvalidSemiMajorAxis(f64),

    #[error("State vector describes an unbound orbit (specific energy {energy} km²/s²)")]
    UnboundOrbit { energy: f64 },

    #[error("Latitude {0}° is outside [-90°, 90°]")]
    InvalidLatitude(f64),

    #[error("Invalid collision query: {0}")]
    InvalidCollisionQuery(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed TLE: {0}")]
    TleFormat(String),

    #[error("TLE checksum mismatch on line {line}: expected {expected}, computed {computed}")]
    TleChecksum {
        line: u8,
        expected: u32,
        computed: u32,
    },
}

impl PartialEq for OrbisError {
    fn eq(&self, other: &Self) -> bool {
        use OrbisError::*;
        match (self, other) {
            (
                FrameMismatch {
                    expected: e1,
                    found: f1,
                },
                FrameMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (NoConversionPath { from: f1, to: t1 }, NoConversionPath { from: f2, to: t2 }) => {
                f1 == f2 && t1 == t2
            }
            (DegenerateVector(a), DegenerateVector(b)) => a == b,
            (InvalidLatitude(a), InvalidLatitude(b)) => a == b,
            (InvalidEccentricity(a), InvalidEccentricity(b)) => a == b,
            (InvalidSemiMajorAxis(a), InvalidSemiMajorAxis(b)) => a == b,
            (InvalidCollisionQuery(a), InvalidCollisionQuery(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,
            (TleFormat(a), TleFormat(b)) => a == b,
            (
                TleChecksum {
                    line: l1,
                    expected: e1,
                    computed: c1,
                },
                TleChecksum {
                    line: l2,
                    expected: e2,
                    computed: c2,
                },
            ) => l1 == l2 && e1 == e2 && c1 == c2,

            // Numeric diagnostics are not compared: same variant is enough
            (NotPositiveDefinite { pivot: p1, .. }, NotPositiveDefinite { pivot: p2, .. }) => {
                p1 == p2
            }
            (NonConvergence { .. }, NonConvergence { .. }) => true,
            (UnboundOrbit { .. }, UnboundOrbit { .. }) => true,

            (MissingEpoch, MissingEpoch) => true,

            _ => false,
        }
    }
}
