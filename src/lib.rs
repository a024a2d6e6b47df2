pub mod collision;
pub mod constants;
pub mod earth_model;
pub mod kepler;
pub mod orbis_errors;
pub mod orbit_type;
pub mod propagation;
pub mod ref_frame;
pub mod time;
pub mod tle;
pub mod vector_math;

pub use orbis_errors::OrbisError;
