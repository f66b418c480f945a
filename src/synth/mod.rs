//! Spectral synthesis: transitions + fit parameters → synthetic spectrum.

mod engine;

pub use engine::{default_params, synthesize, INTENSITY_CLAMP};
