//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be:
//!
//! - used in-memory during synthesis
//! - handed to an external renderer as JSON
//! - constructed directly in tests without ceremony

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::physics::PartitionFunction;

/// Smallest accepted linewidth. A zero-width Gaussian is undefined, so values
/// at or below this are rejected before synthesis.
pub const MIN_LINEWIDTH: f64 = 1e-9;

/// One catalog transition (immutable once parsed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Rest-frame transition frequency in MHz, > 0.
    pub frequency_mhz: f64,
    /// Base-10 log of the intrinsic intensity at the catalog reference
    /// temperature (nm²·MHz at 300 K per the SPCAT convention).
    pub log_intensity: f64,
    /// Lower-state energy in cm⁻¹, ≥ 0.
    pub lower_state_energy: f64,
    /// Upper-state degeneracy, ≥ 1.
    pub degeneracy: u32,
}

/// All transitions of one molecule plus its partition function reference.
///
/// A catalog never mixes molecular species; the engine relies on that.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub molecule: String,
    pub transitions: Vec<Transition>,
    pub partition: PartitionFunction,
}

/// Observed spectrum: the evaluation grid every synthetic trace is sampled on.
///
/// `frequency` is sorted ascending with exact duplicates removed; both vectors
/// have the same length. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedSpectrum {
    pub label: String,
    pub frequency: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl ObservedSpectrum {
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// (min, max) of the frequency axis. The grid is sorted, so this is just
    /// the first and last sample.
    pub fn frequency_span(&self) -> Option<(f64, f64)> {
        match (self.frequency.first(), self.frequency.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn intensity_span(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in &self.intensity {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

/// Unit in which [`FitParams::linewidth`] is expressed.
///
/// Doppler widths are naturally velocities (the frequency width then scales
/// with each line's center frequency), but a fixed frequency width is handy
/// for narrow bands and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinewidthUnit {
    /// Velocity width in km/s; σ(ν) = w·ν/c.
    #[value(name = "kms")]
    KmPerS,
    /// Frequency width in MHz, identical for every line.
    #[value(name = "mhz")]
    Mhz,
}

impl std::fmt::Display for LinewidthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LinewidthUnit::KmPerS => "kms",
            LinewidthUnit::Mhz => "mhz",
        })
    }
}

/// Per-molecule physical fit parameters.
///
/// One instance per loaded catalog; mutated only by explicit user edits, and
/// every mutation triggers a full re-synthesis of that molecule's trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Column density in cm⁻² (linear multiplier on optically-thin flux).
    pub column_density: f64,
    /// Excitation temperature in K.
    pub temperature: f64,
    /// Gaussian σ of the Doppler profile, in `linewidth_unit`.
    pub linewidth: f64,
    pub linewidth_unit: LinewidthUnit,
    /// Constant shift in MHz applied to every transition frequency.
    pub frequency_offset: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            column_density: 1e15,
            temperature: 300.0,
            linewidth: 5.0,
            linewidth_unit: LinewidthUnit::KmPerS,
            frequency_offset: 0.0,
        }
    }
}

impl FitParams {
    /// Check every parameter against its valid range.
    ///
    /// Callers must reject or clamp before synthesis; the engine calls this on
    /// entry and refuses the whole call on the first violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.column_density.is_finite() && self.column_density > 0.0) {
            return Err(invalid("column_density", "must be finite and > 0", self.column_density));
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(invalid("temperature", "must be finite and > 0 (K)", self.temperature));
        }
        if !(self.linewidth.is_finite() && self.linewidth > MIN_LINEWIDTH) {
            return Err(invalid("linewidth", "must be finite and > 0", self.linewidth));
        }
        if !self.frequency_offset.is_finite() {
            return Err(invalid("frequency_offset", "must be finite (MHz)", self.frequency_offset));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, rule: &str, got: f64) -> CoreError {
    CoreError::InvalidParameter {
        name,
        message: format!("{rule}, got {got}"),
    }
}

/// A catalog paired with its current fit parameters, one entry per loaded
/// molecule, kept in load order.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub params: FitParams,
}

/// A full overlay run's configuration, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub spectrum_path: PathBuf,
    pub catalog_paths: Vec<PathBuf>,

    /// Initial parameter overrides applied to every catalog (the TUI can then
    /// diverge per molecule).
    pub column_density: Option<f64>,
    pub temperature: Option<f64>,
    pub linewidth: Option<f64>,
    pub linewidth_unit: LinewidthUnit,
    pub frequency_offset: Option<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// How many per-line warnings to show per file in the report.
    pub max_warnings: usize,

    pub export_json: Option<PathBuf>,
    /// Print the overlay as JSON on stdout instead of the human report.
    pub json_stdout: bool,
}

impl OverlayConfig {
    /// Seed parameters for one catalog: engine defaults plus CLI overrides.
    pub fn seed_params(&self, defaults: FitParams) -> FitParams {
        FitParams {
            column_density: self.column_density.unwrap_or(defaults.column_density),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            linewidth: self.linewidth.unwrap_or(defaults.linewidth),
            linewidth_unit: self.linewidth_unit,
            frequency_offset: self.frequency_offset.unwrap_or(defaults.frequency_offset),
        }
    }
}

/// Configuration for demo-spectrum generation (`spm sample`).
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start_mhz: f64,
    pub end_mhz: f64,
    pub points: usize,
    /// Standard deviation of the additive baseline noise.
    pub noise: f64,
    /// Number of synthetic emission features to inject.
    pub lines: usize,
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(FitParams::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let good = FitParams::default();

        let p = FitParams { column_density: 0.0, ..good };
        assert!(matches!(
            p.validate(),
            Err(CoreError::InvalidParameter { name: "column_density", .. })
        ));

        let p = FitParams { temperature: -1.0, ..good };
        assert!(p.validate().is_err());

        let p = FitParams { linewidth: 0.0, ..good };
        assert!(matches!(
            p.validate(),
            Err(CoreError::InvalidParameter { name: "linewidth", .. })
        ));

        let p = FitParams { frequency_offset: f64::NAN, ..good };
        assert!(p.validate().is_err());
    }

    #[test]
    fn frequency_span_uses_sorted_invariant() {
        let spec = ObservedSpectrum {
            label: "obs".to_string(),
            frequency: vec![1.0, 2.0, 3.0],
            intensity: vec![0.0, 0.5, 0.0],
        };
        assert_eq!(spec.frequency_span(), Some((1.0, 3.0)));
        assert_eq!(spec.intensity_span(), Some((0.0, 0.5)));
    }
}
