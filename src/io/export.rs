//! Renderer-facing exports.
//!
//! The overlay JSON is the hand-off format for an external plotting layer:
//! the full series set, in load order, aligned to the observed grid. Nothing
//! here is session state; every export is recomputed from scratch by the
//! caller first.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ObservedSpectrum;
use crate::error::AppError;
use crate::overlay::Overlay;

/// Write the assembled overlay as pretty-printed JSON.
pub fn write_overlay_json(path: &Path, overlay: &Overlay) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create overlay JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, overlay)
        .map_err(|e| AppError::new(2, format!("Failed to write overlay JSON: {e}")))?;
    Ok(())
}

/// Render the overlay as a JSON string (for stdout hand-off).
pub fn overlay_json_string(overlay: &Overlay) -> Result<String, AppError> {
    serde_json::to_string_pretty(overlay)
        .map_err(|e| AppError::new(2, format!("Failed to encode overlay JSON: {e}")))
}

/// Write a spectrum as tab-separated two-column text, the same shape the
/// spectrum loader consumes.
pub fn write_spectrum_tsv(path: &Path, spectrum: &ObservedSpectrum) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create spectrum file '{}': {e}", path.display()))
    })?;

    for (f, y) in spectrum.frequency.iter().zip(spectrum.intensity.iter()) {
        writeln!(file, "{f:.4}\t{y:.6}")
            .map_err(|e| AppError::new(2, format!("Failed to write spectrum row: {e}")))?;
    }

    Ok(())
}
