//! Rotational partition functions.
//!
//! Catalog intensities are tabulated at a reference temperature; rescaling
//! them to the user's excitation temperature needs the ratio of partition
//! function values at the two temperatures. Two representations cover the
//! catalogs we consume:
//!
//! - a discrete table of (T, Q) entries (catalog-supplied), interpolated
//!   log-log, the convention for rotational partition functions, which are
//!   close to power laws in T
//! - the rigid-rotor power law Q(T) ∝ T^(3/2), used when no table is
//!   available; only ratios are ever consumed, so the proportionality
//!   constant cancels

use crate::error::CoreError;

/// One tabulated partition function point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionEntry {
    pub temperature: f64,
    pub value: f64,
}

/// Monotonic temperature → partition function mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionFunction {
    /// Discrete lookup table, sorted ascending in temperature.
    Table(Vec<PartitionEntry>),
    /// Analytic power law Q(T) ∝ T^exponent.
    PowerLaw { exponent: f64 },
}

impl PartitionFunction {
    /// Rigid-rotor approximation for an asymmetric top.
    pub fn rigid_rotor() -> Self {
        PartitionFunction::PowerLaw { exponent: 1.5 }
    }

    /// Build a table-backed partition function.
    ///
    /// Entries are sorted by temperature; at least two are required and every
    /// temperature and value must be finite and positive.
    pub fn from_table(mut entries: Vec<PartitionEntry>) -> Result<Self, CoreError> {
        if entries.len() < 2 {
            return Err(CoreError::InvalidParameter {
                name: "partition_table",
                message: format!("need at least 2 entries, got {}", entries.len()),
            });
        }
        for e in &entries {
            if !(e.temperature.is_finite() && e.temperature > 0.0)
                || !(e.value.is_finite() && e.value > 0.0)
            {
                return Err(CoreError::InvalidParameter {
                    name: "partition_table",
                    message: format!(
                        "entries must be finite and positive, got Q({}) = {}",
                        e.temperature, e.value
                    ),
                });
            }
        }
        entries.sort_by(|a, b| {
            a.temperature
                .partial_cmp(&b.temperature)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if entries
            .windows(2)
            .any(|w| w[0].temperature == w[1].temperature)
        {
            return Err(CoreError::InvalidParameter {
                name: "partition_table",
                message: "duplicate temperature entry".to_string(),
            });
        }
        Ok(PartitionFunction::Table(entries))
    }

    /// Partition function value at temperature `t` (must be > 0).
    ///
    /// For tables this interpolates ln Q linearly in ln T between the two
    /// bracketing entries, extrapolating with the edge-pair slope outside the
    /// tabulated range. For the power law the returned value is proportional
    /// only; use [`PartitionFunction::ratio`] for anything physical.
    pub fn value_at(&self, t: f64) -> f64 {
        match self {
            PartitionFunction::PowerLaw { exponent } => t.powf(*exponent),
            PartitionFunction::Table(entries) => {
                let ln_t = t.ln();
                // Pick the bracketing pair, clamping to the edge pairs so the
                // extrapolation slope matches the nearest segment.
                let hi = entries
                    .partition_point(|e| e.temperature < t)
                    .clamp(1, entries.len() - 1);
                let (a, b) = (&entries[hi - 1], &entries[hi]);
                let (lt0, lt1) = (a.temperature.ln(), b.temperature.ln());
                let (lq0, lq1) = (a.value.ln(), b.value.ln());
                let u = (ln_t - lt0) / (lt1 - lt0);
                (lq0 + u * (lq1 - lq0)).exp()
            }
        }
    }

    /// Ratio Q(t_ref) / Q(t), the factor that rescales a catalog intensity
    /// from the reference temperature to `t`.
    pub fn ratio(&self, t_ref: f64, t: f64) -> f64 {
        match self {
            // Closed form avoids the proportionality constant entirely.
            PartitionFunction::PowerLaw { exponent } => (t_ref / t).powf(*exponent),
            PartitionFunction::Table(_) => self.value_at(t_ref) / self.value_at(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpl_style_table() -> PartitionFunction {
        // Water-like values at the standard JPL tabulation temperatures.
        PartitionFunction::from_table(vec![
            PartitionEntry { temperature: 9.375, value: 1.8 },
            PartitionEntry { temperature: 18.75, value: 3.4 },
            PartitionEntry { temperature: 37.5, value: 7.5 },
            PartitionEntry { temperature: 75.0, value: 19.9 },
            PartitionEntry { temperature: 150.0, value: 62.0 },
            PartitionEntry { temperature: 225.0, value: 114.0 },
            PartitionEntry { temperature: 300.0, value: 178.1 },
        ])
        .unwrap()
    }

    #[test]
    fn table_interpolation_hits_knots_exactly() {
        let q = jpl_style_table();
        assert!((q.value_at(75.0) - 19.9).abs() < 1e-9);
        assert!((q.value_at(300.0) - 178.1).abs() < 1e-9);
    }

    #[test]
    fn table_interpolation_is_monotonic_between_knots() {
        let q = jpl_style_table();
        let mut prev = q.value_at(10.0);
        for i in 1..=100 {
            let t = 10.0 + (i as f64) * 2.8;
            let v = q.value_at(t);
            assert!(v > prev, "Q must increase with T (t={t})");
            prev = v;
        }
    }

    #[test]
    fn table_extrapolates_with_edge_slope() {
        let q = jpl_style_table();
        // Beyond the last knot the value keeps growing.
        assert!(q.value_at(400.0) > q.value_at(300.0));
        // Below the first knot it keeps shrinking but stays positive.
        let low = q.value_at(5.0);
        assert!(low > 0.0 && low < q.value_at(9.375));
    }

    #[test]
    fn rigid_rotor_ratio_is_power_law() {
        let q = PartitionFunction::rigid_rotor();
        // Q(300)/Q(75) = (300/75)^1.5 = 8.
        assert!((q.ratio(300.0, 75.0) - 8.0).abs() < 1e-12);
        // At the reference temperature the rescale factor is 1.
        assert_eq!(q.ratio(300.0, 300.0), 1.0);
    }

    #[test]
    fn from_table_rejects_bad_entries() {
        assert!(PartitionFunction::from_table(vec![PartitionEntry {
            temperature: 300.0,
            value: 100.0,
        }])
        .is_err());

        assert!(PartitionFunction::from_table(vec![
            PartitionEntry { temperature: 150.0, value: -1.0 },
            PartitionEntry { temperature: 300.0, value: 100.0 },
        ])
        .is_err());

        assert!(PartitionFunction::from_table(vec![
            PartitionEntry { temperature: 300.0, value: 99.0 },
            PartitionEntry { temperature: 300.0, value: 100.0 },
        ])
        .is_err());
    }
}
