//! Transition catalog ingestion (SPCAT/JPL fixed-width format).
//!
//! Each line is one transition; fields live at fixed byte positions, not
//! behind delimiters, so alignment drift inside a field is tolerated by
//! trimming. Out-of-range values reject that line only; the rejection is
//! recorded and the rest of the catalog still loads.
//!
//! Layout (1-based columns, Fortran picture):
//!
//! ```text
//! FREQ  1–13   transition frequency, MHz
//! ERR  14–21   frequency uncertainty (unused here)
//! LGINT 22–29  log10 intensity at 300 K
//! DR   30–31   degrees of freedom (unused here)
//! ELO  32–41   lower-state energy, cm⁻¹
//! GUP  42–44   upper-state degeneracy
//! TAG  45–51   species tag (unused here)
//! rest         quantum number format + quantum numbers (unused here)
//! ```

use crate::domain::{Catalog, Transition};
use crate::error::CoreError;
use crate::io::LineWarning;
use crate::physics::PartitionFunction;

/// Ingestion output: the catalog plus everything that went wrong on the way.
#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    pub catalog: Catalog,
    pub warnings: Vec<LineWarning>,
    /// Non-blank lines seen.
    pub lines_read: usize,
    /// Lines that became transitions.
    pub lines_used: usize,
}

/// Parse catalog text into transitions for one molecule.
///
/// Empty input yields an empty catalog. The error case is reserved for input
/// that has content but not a single parseable line; it names the first
/// offending line and field.
pub fn load_catalog(molecule: &str, text: &str) -> Result<ParsedCatalog, CoreError> {
    let mut transitions = Vec::new();
    let mut warnings = Vec::new();
    let mut lines_read = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        lines_read += 1;

        match parse_line(line) {
            Ok(t) => transitions.push(t),
            Err((field, message)) => warnings.push(LineWarning {
                line: line_no,
                field,
                message,
            }),
        }
    }

    if lines_read > 0 && transitions.is_empty() {
        // Nothing usable; promote the first warning to a hard error.
        let first = &warnings[0];
        return Err(CoreError::MalformedCatalog {
            line: first.line,
            field: first.field,
            message: first.message.clone(),
        });
    }

    let lines_used = transitions.len();
    Ok(ParsedCatalog {
        catalog: Catalog {
            molecule: molecule.to_string(),
            transitions,
            // Catalog listings don't embed partition tables; callers with a
            // tabulated Q can swap this out on the returned catalog.
            partition: PartitionFunction::rigid_rotor(),
        },
        warnings,
        lines_read,
        lines_used,
    })
}

fn parse_line(line: &str) -> Result<Transition, (&'static str, String)> {
    let frequency_mhz = required_f64(line, 0, 13, "frequency")?;
    if frequency_mhz <= 0.0 {
        return Err(("frequency", format!("must be > 0 MHz, got {frequency_mhz}")));
    }

    let log_intensity = required_f64(line, 21, 29, "intensity")?;

    let lower_state_energy = required_f64(line, 31, 41, "energy")?;
    if lower_state_energy < 0.0 {
        return Err(("energy", format!("must be ≥ 0 cm⁻¹, got {lower_state_energy}")));
    }

    let degeneracy = required_field(line, 41, 44, "degeneracy")?
        .parse::<i64>()
        .map_err(|_| ("degeneracy", format!("not an integer: `{}`", field(line, 41, 44).unwrap_or(""))))?;
    if degeneracy < 1 {
        return Err(("degeneracy", format!("must be ≥ 1, got {degeneracy}")));
    }

    Ok(Transition {
        frequency_mhz,
        log_intensity,
        lower_state_energy,
        degeneracy: degeneracy as u32,
    })
}

/// Slice a fixed-position field, trimmed; `None` when the line is too short
/// or the field is blank.
fn field(line: &str, start: usize, end: usize) -> Option<&str> {
    if start >= line.len() {
        return None;
    }
    let end = end.min(line.len());
    // `get` also rejects slicing through a multi-byte character, which only
    // happens on garbage input; such a field reads as missing.
    line.get(start..end).map(str::trim).filter(|s| !s.is_empty())
}

fn required_field<'a>(
    line: &'a str,
    start: usize,
    end: usize,
    name: &'static str,
) -> Result<&'a str, (&'static str, String)> {
    field(line, start, end).ok_or_else(|| (name, "field is missing or blank".to_string()))
}

fn required_f64(
    line: &str,
    start: usize,
    end: usize,
    name: &'static str,
) -> Result<f64, (&'static str, String)> {
    let raw = required_field(line, start, end, name)?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| (name, format!("not a number: `{raw}`")))?;
    if !v.is_finite() {
        return Err((name, format!("not finite: `{raw}`")));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render one catalog line with the standard column layout.
    fn cat_line(freq: f64, lgint: f64, elo: f64, gup: i64) -> String {
        format!(
            "{freq:13.4}{err:8.4}{lgint:8.4}{dr:2}{elo:10.4}{gup:3}{tag:7}{qnfmt:4} 1 0 1 0",
            err = 0.001,
            dr = 3,
            tag = 18003,
            qnfmt = 1404,
        )
    }

    #[test]
    fn parses_well_formed_lines() {
        let text = format!(
            "{}\n{}\n",
            cat_line(22235.0798, -3.1465, 446.5107, 5),
            cat_line(183310.0870, -3.6463, 136.1639, 7),
        );
        let parsed = load_catalog("H2O", &text).unwrap();
        assert_eq!(parsed.lines_read, 2);
        assert_eq!(parsed.lines_used, 2);
        assert!(parsed.warnings.is_empty());

        let t = &parsed.catalog.transitions[0];
        assert!((t.frequency_mhz - 22235.0798).abs() < 1e-9);
        assert!((t.log_intensity - -3.1465).abs() < 1e-9);
        assert!((t.lower_state_energy - 446.5107).abs() < 1e-9);
        assert_eq!(t.degeneracy, 5);
        assert_eq!(parsed.catalog.molecule, "H2O");
    }

    #[test]
    fn negative_frequency_rejects_only_that_line() {
        let text = format!(
            "{}\n{}\n",
            cat_line(-100.0, -3.0, 0.0, 3),
            cat_line(9876.5432, -4.2, 12.0, 3),
        );
        let parsed = load_catalog("X", &text).unwrap();
        assert_eq!(parsed.catalog.transitions.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 1);
        assert_eq!(parsed.warnings[0].field, "frequency");
    }

    #[test]
    fn non_positive_degeneracy_is_rejected() {
        let text = cat_line(9876.5432, -4.2, 12.0, 0);
        let parsed_with_valid = format!("{}\n{}", text, cat_line(9876.5432, -4.2, 12.0, 3));
        let parsed = load_catalog("X", &parsed_with_valid).unwrap();
        assert_eq!(parsed.catalog.transitions.len(), 1);
        assert_eq!(parsed.warnings[0].field, "degeneracy");
    }

    #[test]
    fn alignment_drift_within_fields_is_tolerated() {
        // Same values, but every number pushed to the left edge of its field.
        let line = format!(
            "{:<13}{:<8}{:<8}{:<2}{:<10}{:<3}{:<7}{:<4}",
            "22235.0798", ".001", "-3.1465", "3", "446.5107", "5", "18003", "1404",
        );
        let parsed = load_catalog("H2O", &line).unwrap();
        assert_eq!(parsed.catalog.transitions.len(), 1);
        assert_eq!(parsed.catalog.transitions[0].degeneracy, 5);
    }

    #[test]
    fn empty_input_is_an_empty_catalog() {
        let parsed = load_catalog("X", "").unwrap();
        assert!(parsed.catalog.transitions.is_empty());
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.lines_read, 0);

        let parsed = load_catalog("X", "\n\n  \n").unwrap();
        assert!(parsed.catalog.transitions.is_empty());
    }

    #[test]
    fn unparseable_input_is_a_hard_error() {
        let err = load_catalog("X", "this is not a catalog\nneither is this\n").unwrap_err();
        match err {
            CoreError::MalformedCatalog { line, field, .. } => {
                assert_eq!(line, 1);
                assert_eq!(field, "frequency");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_line_warns_about_the_missing_field() {
        let text = format!("{}\n{}", "  22235.0798", cat_line(9876.5432, -4.2, 12.0, 3));
        let parsed = load_catalog("X", &text).unwrap();
        assert_eq!(parsed.catalog.transitions.len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].field, "intensity");
    }
}
