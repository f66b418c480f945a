//! Formatted terminal output for an overlay run.
//!
//! We keep formatting code in one place so:
//! - the physics/synthesis code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{CatalogReport, RunOutput};
use crate::domain::{FitParams, LinewidthUnit, ObservedSpectrum, OverlayConfig};
use crate::io::LineWarning;
use crate::physics::{frequency_offset_to_velocity, gaussian_fwhm};

/// Format the full run summary: spectrum stats, per-catalog ingestion
/// results, parameters, and any skipped traces.
pub fn format_run_summary(run: &RunOutput, config: &OverlayConfig) -> String {
    let mut out = String::new();

    out.push_str("=== spm - Molecular Line Overlay ===\n");
    out.push_str(&format_spectrum_stats(&run.session.observed));

    if !run.session.spectrum_dropped.is_empty() {
        out.push_str(&format!(
            "  dropped {} of {} lines:\n",
            run.session.spectrum_dropped.len(),
            run.session.spectrum_lines_read
        ));
        out.push_str(&format_warnings(&run.session.spectrum_dropped, config.max_warnings));
    }

    out.push_str("\nCatalogs:\n");
    for (report, entry) in run.session.reports.iter().zip(run.session.entries.iter()) {
        out.push_str(&format_catalog(report, &entry.params, &run.session.observed, config));
    }

    if !run.overlay.skipped.is_empty() {
        out.push_str("\nSkipped traces:\n");
        for skip in &run.overlay.skipped {
            out.push_str(&format!("- {}: {}\n", skip.molecule, skip.reason));
        }
    }

    out
}

fn format_spectrum_stats(observed: &ObservedSpectrum) -> String {
    let freq = observed
        .frequency_span()
        .map(|(lo, hi)| format!("[{lo:.3}, {hi:.3}] MHz"))
        .unwrap_or_else(|| "-".to_string());
    let flux = observed
        .intensity_span()
        .map(|(lo, hi)| format!("[{lo:.3}, {hi:.3}]"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Spectrum: {} | n={} | freq={freq} | flux={flux}\n",
        observed.label,
        observed.len()
    )
}

fn format_catalog(
    report: &CatalogReport,
    params: &FitParams,
    observed: &ObservedSpectrum,
    config: &OverlayConfig,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "* {}: {}/{} lines ({})\n",
        report.molecule,
        report.lines_used,
        report.lines_read,
        report.path.display()
    ));
    out.push_str(&format!("  {}\n", format_params(params, observed)));

    if !report.warnings.is_empty() {
        out.push_str(&format!("  {} rejected line(s):\n", report.warnings.len()));
        out.push_str(&format_warnings(&report.warnings, config.max_warnings));
    }

    out
}

fn format_params(params: &FitParams, observed: &ObservedSpectrum) -> String {
    let unit = match params.linewidth_unit {
        LinewidthUnit::KmPerS => "km/s",
        LinewidthUnit::Mhz => "MHz",
    };

    // Show the offset's velocity equivalent at the middle of the band, the
    // number an observer actually thinks in.
    let offset_note = observed
        .frequency_span()
        .map(|(lo, hi)| {
            let center = 0.5 * (lo + hi);
            let v = frequency_offset_to_velocity(center, params.frequency_offset);
            format!(" ({v:+.2} km/s)")
        })
        .unwrap_or_default();

    format!(
        "N={:.3e} cm^-2 | T={:.2} K | sigma={:.3} {unit} (FWHM {:.3} {unit}) | dnu={:+.3} MHz{offset_note}",
        params.column_density,
        params.temperature,
        params.linewidth,
        gaussian_fwhm(params.linewidth),
        params.frequency_offset,
    )
}

fn format_warnings(warnings: &[LineWarning], max: usize) -> String {
    let mut out = String::new();
    for w in warnings.iter().take(max) {
        out.push_str(&format!("    {w}\n"));
    }
    if warnings.len() > max {
        out.push_str(&format!("    ... and {} more\n", warnings.len() - max));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::LoadedSession;
    use crate::domain::{Catalog, LoadedCatalog};
    use crate::overlay;
    use crate::physics::PartitionFunction;
    use std::path::PathBuf;

    fn run_output() -> RunOutput {
        let observed = ObservedSpectrum {
            label: "obs".to_string(),
            frequency: vec![100_000.0, 100_001.0, 100_002.0],
            intensity: vec![0.1, 0.2, 0.3],
        };
        let entries = vec![LoadedCatalog {
            catalog: Catalog {
                molecule: "CH3OH".to_string(),
                transitions: Vec::new(),
                partition: PartitionFunction::rigid_rotor(),
            },
            params: FitParams::default(),
        }];
        let overlay = overlay::assemble(&observed, &entries);
        let session = LoadedSession {
            observed,
            spectrum_dropped: vec![LineWarning {
                line: 1,
                field: "frequency",
                message: "missing or non-numeric value".to_string(),
            }],
            spectrum_lines_read: 4,
            entries,
            reports: vec![CatalogReport {
                molecule: "CH3OH".to_string(),
                path: PathBuf::from("CH3OH.cat"),
                lines_read: 10,
                lines_used: 9,
                warnings: vec![LineWarning {
                    line: 3,
                    field: "degeneracy",
                    message: "must be ≥ 1, got 0".to_string(),
                }],
            }],
        };
        RunOutput { session, overlay }
    }

    fn config() -> OverlayConfig {
        OverlayConfig {
            spectrum_path: PathBuf::from("obs.txt"),
            catalog_paths: vec![PathBuf::from("CH3OH.cat")],
            column_density: None,
            temperature: None,
            linewidth: None,
            linewidth_unit: LinewidthUnit::KmPerS,
            frequency_offset: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            max_warnings: 5,
            export_json: None,
            json_stdout: false,
        }
    }

    #[test]
    fn summary_mentions_counts_and_warnings() {
        let text = format_run_summary(&run_output(), &config());
        assert!(text.contains("CH3OH: 9/10 lines"));
        assert!(text.contains("dropped 1 of 4 lines"));
        assert!(text.contains("line 3: degeneracy"));
        assert!(text.contains("T=300.00 K"));
    }

    #[test]
    fn warning_overflow_is_elided() {
        let warnings: Vec<LineWarning> = (1..=8)
            .map(|i| LineWarning {
                line: i,
                field: "frequency",
                message: "bad".to_string(),
            })
            .collect();
        let text = format_warnings(&warnings, 5);
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("... and 3 more"));
    }
}
