//! The synthesis engine.
//!
//! A pure function from (transitions, partition reference, fit parameters,
//! target grid) to intensities on that grid, under the optically-thin LTE
//! model:
//!
//! 1. shift each transition by the frequency offset
//! 2. rescale its catalog intensity from the 300 K reference to the chosen
//!    excitation temperature (partition function ratio × Boltzmann factor on
//!    the lower-state energy)
//! 3. scale linearly by column density
//! 4. spread it as a Gaussian whose σ comes from the linewidth parameter
//! 5. sum all contributions at every grid point
//!
//! Identical inputs produce identical output; there is no internal state.

use crate::domain::{FitParams, LinewidthUnit, Transition};
use crate::error::CoreError;
use crate::physics::{doppler_sigma_mhz, PartitionFunction, KB_CM, REFERENCE_TEMPERATURE};

/// Ceiling applied to any non-finite or overflowing intensity. Extreme
/// temperature/energy combinations must not leak NaN/Inf into the overlay.
pub const INTENSITY_CLAMP: f64 = 1e30;

/// Beyond this many σ from a line center, a Gaussian contribution is below
/// f64 noise (e^-32 ≈ 1e-14 of peak) and the grid points are skipped.
const SIGMA_WINDOW: f64 = 8.0;

/// Seed parameters for a freshly ingested catalog.
pub fn default_params(_transitions: &[Transition]) -> FitParams {
    FitParams::default()
}

/// Evaluate the synthetic spectrum on `grid`.
///
/// `grid` must be sorted ascending (the observed-spectrum invariant); output
/// has exactly `grid.len()` samples. An empty transition list yields zeros.
/// Invalid parameters reject the whole call with
/// [`CoreError::InvalidParameter`]; nothing is partially computed.
pub fn synthesize(
    transitions: &[Transition],
    partition: &PartitionFunction,
    params: &FitParams,
    grid: &[f64],
) -> Result<Vec<f64>, CoreError> {
    params.validate()?;

    let mut out = vec![0.0_f64; grid.len()];
    if transitions.is_empty() || grid.is_empty() {
        return Ok(out);
    }

    // Temperature-dependent factors shared by every line of the molecule.
    let q_ratio = partition.ratio(REFERENCE_TEMPERATURE, params.temperature);
    let inv_t_diff = 1.0 / params.temperature - 1.0 / REFERENCE_TEMPERATURE;

    for t in transitions {
        let center = t.frequency_mhz + params.frequency_offset;

        let boltzmann = (-(t.lower_state_energy / KB_CM) * inv_t_diff).exp();
        let amplitude = clamp_intensity(
            10f64.powf(t.log_intensity) * q_ratio * boltzmann * params.column_density,
        );

        let sigma = match params.linewidth_unit {
            LinewidthUnit::KmPerS => doppler_sigma_mhz(params.linewidth, center),
            LinewidthUnit::Mhz => params.linewidth,
        };
        // A velocity width at a center shifted below zero has no meaningful
        // frequency-domain footprint on the grid.
        if !(sigma.is_finite() && sigma > 0.0) {
            continue;
        }

        // Only grid points within the ±SIGMA_WINDOW·σ support contribute
        // beyond floating-point noise; the grid is sorted, so the window is
        // two binary searches.
        let lo = grid.partition_point(|&x| x < center - SIGMA_WINDOW * sigma);
        let hi = grid.partition_point(|&x| x <= center + SIGMA_WINDOW * sigma);

        let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);
        for i in lo..hi {
            let d = grid[i] - center;
            out[i] += amplitude * (-d * d * inv_two_sigma_sq).exp();
        }
    }

    for v in &mut out {
        *v = clamp_intensity(*v);
    }
    Ok(out)
}

fn clamp_intensity(v: f64) -> f64 {
    if v.is_nan() {
        return INTENSITY_CLAMP;
    }
    v.clamp(-INTENSITY_CLAMP, INTENSITY_CLAMP)
}
