use hifitime::{Epoch, Unit};

use crate::constants::{Radian, DPI, GMST_HOURS_AT_J2000, GMST_HOURS_PER_DAY};

/// Reference instant of the sidereal time model, 2000-01-01 11:58:55 UTC.
pub fn j2000_utc() -> Epoch {
    Epoch::from_gregorian_utc_hms(2000, 1, 1, 11, 58, 55)
}

/// Elapsed days between the J2000 reference instant and `epoch` (negative before J2000).
pub fn days_since_j2000(epoch: &Epoch) -> f64 {
    (*epoch - j2000_utc()).to_unit(Unit::Day)
}

/// Greenwich Mean Sidereal Time in radians, in `[0, 2π)`.
///
/// Linear model in days since J2000:
///
/// ```text
/// h = (18.697374558 + 24.06570982441908 · d) mod 24
/// θ = 2π · h / 24
/// ```
///
/// This is the angle of the ECEF X axis measured from the ECI X axis about Z.
///
/// # Arguments
/// * `epoch` - instant at which the sidereal angle is evaluated
///
/// # See also
/// * [`crate::ref_frame::inertial::ecef_to_eci`] – consumer of this angle
pub fn gmst(epoch: &Epoch) -> Radian {
    let d = days_since_j2000(epoch);
    let hours = (GMST_HOURS_AT_J2000 + GMST_HOURS_PER_DAY * d).rem_euclid(24.0);
    DPI * hours / 24.0
}
