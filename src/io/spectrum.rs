//! Observed spectrum ingestion.
//!
//! Input is tab-delimited two-column numeric text: frequency in MHz,
//! intensity in flux-density units. The loader is deliberately forgiving at
//! line level (a header row or a corrupt line is dropped with a warning, not
//! fatal) and strict about the output invariant: the returned grid is sorted
//! ascending with exact duplicate frequencies removed (first occurrence in
//! file order wins).

use std::collections::HashSet;

use crate::domain::ObservedSpectrum;
use crate::error::CoreError;
use crate::io::LineWarning;

/// Loading output: the spectrum plus what was dropped on the way.
#[derive(Debug, Clone)]
pub struct ParsedSpectrum {
    pub spectrum: ObservedSpectrum,
    pub dropped: Vec<LineWarning>,
    pub lines_read: usize,
}

/// Parse spectrum text into a sorted evaluation grid.
///
/// Fails with [`CoreError::MalformedSpectrum`] only when no valid sample
/// remains.
pub fn load_spectrum(label: &str, text: &str) -> Result<ParsedSpectrum, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(text.as_bytes());

    let mut samples: Vec<(f64, f64)> = Vec::new();
    let mut dropped = Vec::new();
    let mut lines_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                lines_read += 1;
                dropped.push(LineWarning {
                    line,
                    field: "record",
                    message: format!("unreadable line: {e}"),
                });
                continue;
            }
        };
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        lines_read += 1;

        let Some(frequency) = record.get(0).and_then(parse_finite) else {
            dropped.push(LineWarning {
                line,
                field: "frequency",
                message: "missing or non-numeric value".to_string(),
            });
            continue;
        };
        let Some(intensity) = record.get(1).and_then(parse_finite) else {
            dropped.push(LineWarning {
                line,
                field: "intensity",
                message: "missing or non-numeric value".to_string(),
            });
            continue;
        };

        samples.push((frequency, intensity));
    }

    // First occurrence of a frequency wins; later exact duplicates are
    // discarded before sorting so file order decides the survivor.
    let mut seen: HashSet<u64> = HashSet::with_capacity(samples.len());
    samples.retain(|&(f, _)| seen.insert(f.to_bits()));

    samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    if samples.is_empty() {
        return Err(CoreError::MalformedSpectrum {
            message: format!("no valid (frequency, intensity) samples in {lines_read} lines"),
        });
    }

    let (frequency, intensity) = samples.into_iter().unzip();
    Ok(ParsedSpectrum {
        spectrum: ObservedSpectrum {
            label: label.to_string(),
            frequency,
            intensity,
        },
        dropped,
        lines_read,
    })
}

fn parse_finite(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_sorts_two_column_text() {
        let text = "100002.0\t0.5\n100000.0\t0.1\n100001.0\t0.3\n";
        let parsed = load_spectrum("obs", text).unwrap();
        assert_eq!(parsed.spectrum.frequency, vec![100000.0, 100001.0, 100002.0]);
        assert_eq!(parsed.spectrum.intensity, vec![0.1, 0.3, 0.5]);
        assert!(parsed.dropped.is_empty());
        assert_eq!(parsed.lines_read, 3);
    }

    #[test]
    fn header_row_is_dropped_not_fatal() {
        let text = "Frequency\tIntensity\n100000.0\t0.1\n";
        let parsed = load_spectrum("obs", text).unwrap();
        assert_eq!(parsed.spectrum.len(), 1);
        assert_eq!(parsed.dropped.len(), 1);
        assert_eq!(parsed.dropped[0].line, 1);
        assert_eq!(parsed.dropped[0].field, "frequency");
    }

    #[test]
    fn missing_second_column_drops_the_line() {
        let text = "100000.0\t0.1\n100001.0\n100002.0\tnot-a-number\n100003.0\t0.4\n";
        let parsed = load_spectrum("obs", text).unwrap();
        assert_eq!(parsed.spectrum.frequency, vec![100000.0, 100003.0]);
        assert_eq!(parsed.dropped.len(), 2);
        assert!(parsed.dropped.iter().all(|w| w.field == "intensity"));
    }

    #[test]
    fn duplicate_frequency_keeps_first_occurrence() {
        let text = "100000.0\t0.1\n100001.0\t0.2\n100000.0\t0.9\n";
        let parsed = load_spectrum("obs", text).unwrap();
        assert_eq!(parsed.spectrum.frequency, vec![100000.0, 100001.0]);
        // The survivor is the first value in file order, not the last.
        assert_eq!(parsed.spectrum.intensity[0], 0.1);
    }

    #[test]
    fn no_valid_samples_is_an_error() {
        let err = load_spectrum("obs", "a\tb\nc\td\n").unwrap_err();
        assert!(matches!(err, CoreError::MalformedSpectrum { .. }));

        let err = load_spectrum("obs", "").unwrap_err();
        assert!(matches!(err, CoreError::MalformedSpectrum { .. }));
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let text = "100000.0\t0.1\n\n100001.0\t0.2\n";
        let parsed = load_spectrum("obs", text).unwrap();
        assert_eq!(parsed.spectrum.len(), 2);
        assert!(parsed.dropped.is_empty());
    }
}
