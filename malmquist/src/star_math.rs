//! Photometric relations between distance and magnitude
//!
//! All distances are in parsecs and all magnitudes are V-band. The relations
//! here are closed-form; sampling is the only place randomness enters and it
//! always goes through a caller-supplied random source.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{MalmquistError, Result};

/// Absolute V magnitude of the Sun
pub const SOLAR_ABSOLUTE_MAGNITUDE: f64 = 24.0 / 5.0;

/// Distance modulus μ = m − M for a source at `distance_pc` parsecs.
///
/// μ = 5·log₁₀(d) − 5, so a star at 10 pc has identical apparent and
/// absolute magnitude.
pub fn distance_modulus(distance_pc: f64) -> f64 {
    5.0 * distance_pc.log10() - 5.0
}

/// Inverse of [`distance_modulus`]: distance in parsecs for a given μ
pub fn distance_from_modulus(modulus: f64) -> f64 {
    10f64.powf((modulus + 5.0) / 5.0)
}

/// Apparent magnitude of a star with absolute magnitude `absolute_mag` at `distance_pc`
pub fn apparent_magnitude(absolute_mag: f64, distance_pc: f64) -> f64 {
    absolute_mag + distance_modulus(distance_pc)
}

/// Distance inferred for a star when its absolute magnitude is assumed.
///
/// A star at `distance_pc` with true absolute magnitude `true_mag` is
/// observed at m = true_mag + μ(d). Solving for distance with `assumed_mag`
/// in place of the true value gives d·10^((true_mag − assumed_mag)/5).
pub fn photometric_distance(distance_pc: f64, true_mag: f64, assumed_mag: f64) -> f64 {
    distance_pc * 10f64.powf((true_mag - assumed_mag) / 5.0)
}

/// Absolute magnitude for a linear luminosity index.
///
/// Index 3.5 maps to the solar value and each unit step dims by 0.2 mag.
pub fn mag_v(index: f64) -> f64 {
    SOLAR_ABSOLUTE_MAGNITUDE + (index - 7.0 / 2.0) / 5.0
}

/// Draw one absolute magnitude from N(mean, sigma²).
///
/// # Errors
///
/// Returns [`MalmquistError::InvalidDistribution`] when `sigma` is negative
/// or either parameter is not finite.
pub fn gauss_mag<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> Result<f64> {
    let normal = magnitude_distribution(mean, sigma)?;
    Ok(normal.sample(rng))
}

/// Build the normal distribution used for absolute magnitudes
pub(crate) fn magnitude_distribution(mean: f64, sigma: f64) -> Result<Normal<f64>> {
    if !mean.is_finite() || !sigma.is_finite() {
        return Err(MalmquistError::InvalidDistribution {
            mean,
            sigma,
            reason: "parameters must be finite".to_string(),
        });
    }
    Normal::new(mean, sigma).map_err(|e| MalmquistError::InvalidDistribution {
        mean,
        sigma,
        reason: e.to_string(),
    })
}
