//! Shared load/recompute pipeline used by both the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load spectrum -> load catalogs -> seed parameters -> synthesize -> assemble
//!
//! The CLI and the TUI then focus on presentation (printing vs widgets). The
//! session owns all mutable state explicitly: parameters live in a keyed,
//! ordered collection passed into assembly, never in ambient globals.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{LoadedCatalog, ObservedSpectrum, OverlayConfig};
use crate::error::AppError;
use crate::io::{catalog, spectrum, LineWarning};
use crate::overlay::{self, Overlay};
use crate::synth;

/// Per-catalog ingestion bookkeeping for reporting.
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub molecule: String,
    pub path: PathBuf,
    pub lines_read: usize,
    pub lines_used: usize,
    pub warnings: Vec<LineWarning>,
}

/// Everything loaded for one sitting: the observed grid plus the ordered,
/// per-molecule parameter collection the user edits.
#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub observed: ObservedSpectrum,
    pub spectrum_dropped: Vec<LineWarning>,
    pub spectrum_lines_read: usize,
    /// One entry per catalog, in load order.
    pub entries: Vec<LoadedCatalog>,
    /// Parallel to `entries`.
    pub reports: Vec<CatalogReport>,
}

/// All computed outputs of a single overlay run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub session: LoadedSession,
    pub overlay: Overlay,
}

/// Read and parse all inputs, seeding each catalog's parameters from the
/// engine defaults plus CLI overrides.
pub fn load_session(config: &OverlayConfig) -> Result<LoadedSession, AppError> {
    let text = fs::read_to_string(&config.spectrum_path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open spectrum '{}': {e}", config.spectrum_path.display()),
        )
    })?;
    let parsed = spectrum::load_spectrum(&file_label(&config.spectrum_path), &text)?;

    let mut entries = Vec::with_capacity(config.catalog_paths.len());
    let mut reports = Vec::with_capacity(config.catalog_paths.len());

    for path in &config.catalog_paths {
        let text = fs::read_to_string(path).map_err(|e| {
            AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display()))
        })?;
        let molecule = file_label(path);
        let parsed_catalog = catalog::load_catalog(&molecule, &text)?;

        let params = config.seed_params(synth::default_params(&parsed_catalog.catalog.transitions));
        reports.push(CatalogReport {
            molecule,
            path: path.clone(),
            lines_read: parsed_catalog.lines_read,
            lines_used: parsed_catalog.lines_used,
            warnings: parsed_catalog.warnings,
        });
        entries.push(LoadedCatalog {
            catalog: parsed_catalog.catalog,
            params,
        });
    }

    Ok(LoadedSession {
        observed: parsed.spectrum,
        spectrum_dropped: parsed.dropped,
        spectrum_lines_read: parsed.lines_read,
        entries,
        reports,
    })
}

/// Execute the full pipeline: load everything, then assemble the overlay.
pub fn run_overlay(config: &OverlayConfig) -> Result<RunOutput, AppError> {
    let session = load_session(config)?;
    let overlay = reassemble(&session);
    Ok(RunOutput { session, overlay })
}

/// Recompute the full overlay for the session's current parameter state.
///
/// Called after every parameter edit; synthetic traces are always rebuilt
/// from scratch rather than patched.
pub fn reassemble(session: &LoadedSession) -> Overlay {
    overlay::assemble(&session.observed, &session.entries)
}

/// Molecule label from a file path: the stem, falling back to the whole path.
fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_label_strips_directory_and_extension() {
        assert_eq!(file_label(Path::new("/data/catalogs/CH3OH.cat")), "CH3OH");
        assert_eq!(file_label(Path::new("obs.txt")), "obs");
    }
}
