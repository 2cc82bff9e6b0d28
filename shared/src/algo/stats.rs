//! Statistical functions for population analysis and testing

use scilib::math::basic::erf;
use std::f64::consts::SQRT_2;
use thiserror::Error;

/// Errors raised by the sample statistics in this module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Cannot compute a statistic over an empty sample")]
    EmptySample,
    #[error("Values and weights must have the same length ({0} vs {1})")]
    MismatchedLengths(usize, usize),
    #[error("Sum of weights must be positive, got {0}")]
    NonPositiveWeight(f64),
    #[error("Sample has no spread")]
    ZeroSpread,
}

/// Arithmetic mean of a sample.
///
/// # Returns
///
/// * `Ok(mean)` - The mean value
/// * `Err(StatsError::EmptySample)` - If `values` is empty
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Weighted arithmetic mean `Σ wᵢxᵢ / Σ wᵢ`.
///
/// Used for population means where each value stands for a group of objects,
/// e.g. a shell distance weighted by the number of stars in that shell.
///
/// # Arguments
///
/// * `values` - Sample values
/// * `weights` - Non-negative weights, one per value
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64, StatsError> {
    if values.len() != weights.len() {
        return Err(StatsError::MismatchedLengths(values.len(), weights.len()));
    }
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(StatsError::NonPositiveWeight(total_weight));
    }

    let weighted_sum: f64 = values.iter().zip(weights).map(|(x, w)| x * w).sum();
    Ok(weighted_sum / total_weight)
}

/// Population standard deviation of a sample
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    let mu = mean(values)?;
    let variance = values.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(variance.sqrt())
}

/// Cumulative distribution function for standard normal distribution
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Significance levels with tabulated Kolmogorov-Smirnov coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significance {
    TenPercent,
    FivePercent,
    OnePercent,
}

impl Significance {
    pub fn alpha(self) -> f64 {
        match self {
            Significance::TenPercent => 0.10,
            Significance::FivePercent => 0.05,
            Significance::OnePercent => 0.01,
        }
    }

    /// Large-n coefficient c(α) in the critical value c(α)/√n
    fn coefficient(self) -> f64 {
        match self {
            Significance::TenPercent => 1.22,
            Significance::FivePercent => 1.36,
            Significance::OnePercent => 1.63,
        }
    }
}

/// Outcome of a Kolmogorov-Smirnov normality test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityTest {
    /// Largest gap between the empirical and normal CDFs
    pub statistic: f64,
    /// Rejection threshold for the sample size and significance
    pub critical_value: f64,
}

impl NormalityTest {
    /// The sample cannot be told apart from a normal distribution
    pub fn is_consistent(&self) -> bool {
        self.statistic <= self.critical_value
    }
}

/// Kolmogorov-Smirnov test of a sample against a normal distribution.
///
/// The sample is standardised with its own mean and deviation first, so this
/// checks shape only. The critical value uses the asymptotic c(α)/√n form.
///
/// # Errors
/// * `StatsError::EmptySample` - If `values` is empty
/// * `StatsError::ZeroSpread` - If every value is the same
pub fn ks_normality(
    values: &[f64],
    significance: Significance,
) -> Result<NormalityTest, StatsError> {
    let mu = mean(values)?;
    let sigma = std_dev(values)?;
    if sigma < 1e-10 {
        return Err(StatsError::ZeroSpread);
    }

    let mut standardized: Vec<f64> = values.iter().map(|x| (x - mu) / sigma).collect();
    standardized.sort_by(f64::total_cmp);

    let n = standardized.len() as f64;
    let statistic = standardized
        .iter()
        .enumerate()
        .map(|(i, &z)| {
            let cdf = normal_cdf(z);
            let below = cdf - i as f64 / n;
            let above = (i + 1) as f64 / n - cdf;
            below.max(above)
        })
        .fold(0.0, f64::max);

    Ok(NormalityTest {
        statistic,
        critical_value: significance.coefficient() / n.sqrt(),
    })
}
