//! Overlay assembly: one observed trace plus one synthetic trace per loaded
//! molecule, aligned to the observed grid and kept in catalog load order so
//! the rendered stacking is stable.
//!
//! No computation happens here beyond delegating to the synthesis engine;
//! callers re-assemble after any transition or parameter change. Molecules
//! are independent, so their syntheses run in parallel; each invocation owns
//! its inputs and shares nothing mutable.

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::{LoadedCatalog, ObservedSpectrum};
use crate::synth;

/// One renderable trace, aligned to [`Overlay::frequency`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// A molecule whose trace could not be synthesized this round.
///
/// Its parameters were rejected; the other molecules' traces are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTrace {
    pub molecule: String,
    pub reason: String,
}

/// The full renderable series set for one recomputation cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    /// The shared frequency axis (the observed grid).
    pub frequency: Vec<f64>,
    pub observed: Series,
    /// One synthetic trace per molecule, in catalog load order.
    pub synthetic: Vec<Series>,
    pub skipped: Vec<SkippedTrace>,
}

/// Assemble the overlay for the current parameter state.
pub fn assemble(observed: &ObservedSpectrum, entries: &[LoadedCatalog]) -> Overlay {
    let results: Vec<Result<Series, SkippedTrace>> = entries
        .par_iter()
        .map(|entry| {
            synth::synthesize(
                &entry.catalog.transitions,
                &entry.catalog.partition,
                &entry.params,
                &observed.frequency,
            )
            .map(|values| Series {
                label: entry.catalog.molecule.clone(),
                values,
            })
            .map_err(|e| SkippedTrace {
                molecule: entry.catalog.molecule.clone(),
                reason: e.to_string(),
            })
        })
        .collect();

    let mut synthetic = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for r in results {
        match r {
            Ok(series) => synthetic.push(series),
            Err(skip) => skipped.push(skip),
        }
    }

    Overlay {
        frequency: observed.frequency.clone(),
        observed: Series {
            label: observed.label.clone(),
            values: observed.intensity.clone(),
        },
        synthetic,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, FitParams, Transition};
    use crate::physics::PartitionFunction;

    fn entry(molecule: &str, freq: f64, params: FitParams) -> LoadedCatalog {
        LoadedCatalog {
            catalog: Catalog {
                molecule: molecule.to_string(),
                transitions: vec![Transition {
                    frequency_mhz: freq,
                    log_intensity: 0.0,
                    lower_state_energy: 0.0,
                    degeneracy: 1,
                }],
                partition: PartitionFunction::rigid_rotor(),
            },
            params,
        }
    }

    fn observed() -> ObservedSpectrum {
        ObservedSpectrum {
            label: "obs.txt".to_string(),
            frequency: (0..200).map(|i| 99_990.0 + i as f64 * 0.1).collect(),
            intensity: vec![0.0; 200],
        }
    }

    #[test]
    fn load_order_is_preserved() {
        let obs = observed();
        let entries = vec![
            entry("CH3OH", 100_000.0, FitParams::default()),
            entry("H2O", 100_005.0, FitParams::default()),
            entry("HCN", 100_002.0, FitParams::default()),
        ];
        let overlay = assemble(&obs, &entries);
        let labels: Vec<&str> = overlay.synthetic.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["CH3OH", "H2O", "HCN"]);
        assert!(overlay.skipped.is_empty());
        assert!(overlay.synthetic.iter().all(|s| s.values.len() == obs.len()));
    }

    #[test]
    fn one_bad_molecule_does_not_take_down_the_rest() {
        let obs = observed();
        let bad = FitParams {
            linewidth: 0.0,
            ..FitParams::default()
        };
        let entries = vec![
            entry("CH3OH", 100_000.0, FitParams::default()),
            entry("H2O", 100_005.0, bad),
        ];
        let overlay = assemble(&obs, &entries);
        assert_eq!(overlay.synthetic.len(), 1);
        assert_eq!(overlay.synthetic[0].label, "CH3OH");
        assert_eq!(overlay.skipped.len(), 1);
        assert_eq!(overlay.skipped[0].molecule, "H2O");
        assert!(overlay.skipped[0].reason.contains("linewidth"));
    }

    #[test]
    fn observed_trace_carries_the_spectrum_label() {
        let obs = observed();
        let overlay = assemble(&obs, &[]);
        assert_eq!(overlay.observed.label, "obs.txt");
        assert_eq!(overlay.frequency, obs.frequency);
        assert!(overlay.synthetic.is_empty());
    }
}
