use hifitime::Epoch;
use nalgebra::Vector3;
use std::fmt;

use crate::ref_frame::Frame;

/// Cartesian frames a [`StateVector`] can be expressed in.
///
/// Geodetic and Keplerian representations are deliberately absent: they are not
/// position/velocity pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartesianFrame {
    Ecef,
    Eci,
}

impl From<CartesianFrame> for Frame {
    fn from(frame: CartesianFrame) -> Self {
        match frame {
            CartesianFrame::Ecef => Frame::Ecef,
            CartesianFrame::Eci => Frame::Eci,
        }
    }
}

/// Position (km) and velocity (km/s) of an object at an epoch, tagged with its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub frame: CartesianFrame,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub epoch: Epoch,
}

impl StateVector {
    pub fn new(
        frame: CartesianFrame,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        epoch: Epoch,
    ) -> Self {
        StateVector {
            frame,
            position,
            velocity,
            epoch,
        }
    }

    /// Shorthand for an inertial state.
    pub fn eci(position: Vector3<f64>, velocity: Vector3<f64>, epoch: Epoch) -> Self {
        StateVector::new(CartesianFrame::Eci, position, velocity, epoch)
    }

    /// Shorthand for an Earth-fixed state.
    pub fn ecef(position: Vector3<f64>, velocity: Vector3<f64>, epoch: Epoch) -> Self {
        StateVector::new(CartesianFrame::Ecef, position, velocity, epoch)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State vector ({:?}) @ {}", self.frame, self.epoch)?;
        writeln!(
            f,
            "  r = [{:.6}, {:.6}, {:.6}] km",
            self.position.x, self.position.y, self.position.z
        )?;
        write!(
            f,
            "  v = [{:.9}, {:.9}, {:.9}] km/s",
            self.velocity.x, self.velocity.y, self.velocity.z
        )
    }
}
