//! Spectroscopic constants, unit conversions, and partition functions.

pub mod partition;
pub mod units;

pub use partition::PartitionFunction;
pub use units::{
    doppler_sigma_mhz, frequency_offset_to_velocity, gaussian_fwhm, gaussian_integral, KB_CM,
    REFERENCE_TEMPERATURE, SPEED_OF_LIGHT_M_S,
};
