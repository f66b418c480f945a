//! Unit conversions and small closed-form expressions used in line synthesis.
//!
//! Conventions: frequencies in MHz, velocities in km/s, state energies in
//! cm⁻¹, temperatures in K. These match the catalog format this tool consumes,
//! so conversions happen here and nowhere else.

/// Boltzmann constant in cm⁻¹ per Kelvin.
pub const KB_CM: f64 = 0.695_034_800_4;

/// Speed of light in m/s.
pub const SPEED_OF_LIGHT_M_S: f64 = 2.997_924_58e8;

/// Catalog reference temperature in K. Catalog intensities are tabulated at
/// this temperature and rescaled from it.
pub const REFERENCE_TEMPERATURE: f64 = 300.0;

/// Convert a Doppler width in km/s at a given center frequency into a
/// frequency width in MHz.
///
/// A velocity width maps to a frequency width proportionally to the center
/// frequency: `Δν = v·ν/c`.
pub fn doppler_sigma_mhz(sigma_kms: f64, frequency_mhz: f64) -> f64 {
    (sigma_kms * 1_000.0 * frequency_mhz) / SPEED_OF_LIGHT_M_S
}

/// Convert a frequency offset in MHz at a given center frequency into the
/// equivalent Doppler velocity in km/s.
pub fn frequency_offset_to_velocity(frequency_mhz: f64, offset_mhz: f64) -> f64 {
    if frequency_mhz == 0.0 {
        return 0.0;
    }
    ((SPEED_OF_LIGHT_M_S * offset_mhz) / frequency_mhz) / 1_000.0
}

/// Full width at half maximum of a Gaussian with standard deviation `sigma`.
pub fn gaussian_fwhm(sigma: f64) -> f64 {
    2.0 * (2.0 * std::f64::consts::LN_2).sqrt() * sigma
}

/// Analytic area under a Gaussian with the given peak height and `sigma`.
pub fn gaussian_integral(height: f64, sigma: f64) -> f64 {
    height * sigma * (2.0 * std::f64::consts::PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doppler_width_scales_with_frequency() {
        // 1 km/s at 299.792458 GHz is exactly 1 MHz.
        let sigma = doppler_sigma_mhz(1.0, 299_792.458);
        assert!((sigma - 1.0).abs() < 1e-12);

        // Half the frequency, half the width.
        let half = doppler_sigma_mhz(1.0, 149_896.229);
        assert!((half - 0.5).abs() < 1e-12);
    }

    #[test]
    fn offset_velocity_round_trip() {
        let f = 100_000.0;
        let v = 12.5;
        let offset = doppler_sigma_mhz(v, f);
        let back = frequency_offset_to_velocity(f, offset);
        assert!((back - v).abs() < 1e-9);
    }

    #[test]
    fn fwhm_of_unit_gaussian() {
        let fwhm = gaussian_fwhm(1.0);
        assert!((fwhm - 2.354_820_045).abs() < 1e-6);
    }
}
