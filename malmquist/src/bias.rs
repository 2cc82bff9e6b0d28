//! Population statistics of the full sky versus the observed sample
//!
//! Each function compares a quantity averaged over every simulated star with
//! the same quantity averaged over the magnitude-limited sample. The gap
//! between the two is the Malmquist bias.

use serde::{Deserialize, Serialize};
use shared::algo::{mean, weighted_mean};

use crate::error::{MalmquistError, Result};
use crate::sky::Sky;
use crate::star_math::photometric_distance;

/// Mean absolute magnitudes and their difference ΔM̄ = M̄_all − M̄_sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeBias {
    pub mean_all: f64,
    pub mean_sample: f64,
    pub delta: f64,
}

/// Star-weighted mean distances of the full population and the sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBias {
    pub mean_all_pc: f64,
    pub mean_sample_pc: f64,
}

/// Sample distance recovered from apparent magnitudes under an assumed luminosity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    /// True mean distance of the sample
    pub actual_sample_pc: f64,
    /// Mean inferred distance of the sample
    pub estimated_sample_pc: f64,
    /// actual − estimated
    pub delta_pc: f64,
}

impl DistanceEstimate {
    /// The inferred distance exceeds the true one
    pub fn is_overestimate(&self) -> bool {
        self.delta_pc < 0.0
    }
}

/// Mean metallicity of every star versus the observed stars of selected regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetallicityBias {
    pub mean_all: f64,
    pub mean_sample: f64,
    pub sample_regions: Vec<String>,
}

impl MetallicityBias {
    /// The observed sample is more metal rich than the population
    pub fn sample_is_richer(&self) -> bool {
        self.mean_all < self.mean_sample
    }
}

/// Compare the mean absolute magnitude of all stars with that of the sample
pub fn magnitude_bias(sky: &Sky) -> Result<MagnitudeBias> {
    let mean_all = mean(&sky.all_magnitudes())
        .map_err(MalmquistError::empty("mean magnitude of all stars"))?;
    let mean_sample = mean(&sky.sample_magnitudes())
        .map_err(MalmquistError::empty("mean magnitude of the observed sample"))?;

    Ok(MagnitudeBias {
        mean_all,
        mean_sample,
        delta: mean_all - mean_sample,
    })
}

/// Compare mean distances, each region weighted by its star count or visible count
pub fn distance_bias(sky: &Sky) -> Result<DistanceBias> {
    let distances: Vec<f64> = sky.regions().iter().map(|r| r.mean_distance_pc()).collect();
    let all_counts: Vec<f64> = sky
        .regions()
        .iter()
        .map(|r| r.star_count() as f64)
        .collect();
    let sample_counts: Vec<f64> = sky
        .regions()
        .iter()
        .map(|r| r.visible_count() as f64)
        .collect();

    let mean_all_pc = weighted_mean(&distances, &all_counts)
        .map_err(MalmquistError::empty("mean distance of all stars"))?;
    let mean_sample_pc = weighted_mean(&distances, &sample_counts)
        .map_err(MalmquistError::empty("mean distance of the observed sample"))?;

    Ok(DistanceBias {
        mean_all_pc,
        mean_sample_pc,
    })
}

/// Infer the sample's distance assuming every star has `assumed_magnitude`.
///
/// Each observed star at true distance d with absolute magnitude M is placed
/// at d·10^((M − assumed)/5), the distance its apparent magnitude implies.
/// Intrinsically bright stars dominate the sample, so with the population
/// mean as the assumption the sample comes out too close.
pub fn photometric_distance_estimate(
    sky: &Sky,
    assumed_magnitude: f64,
) -> Result<DistanceEstimate> {
    let inferred: Vec<f64> = sky
        .regions()
        .iter()
        .flat_map(|region| {
            let d = region.mean_distance_pc();
            region
                .sample()
                .into_iter()
                .map(move |m| photometric_distance(d, m, assumed_magnitude))
        })
        .collect();

    let estimated_sample_pc =
        mean(&inferred).map_err(MalmquistError::empty("photometric distance of the sample"))?;
    let actual_sample_pc = distance_bias(sky)?.mean_sample_pc;

    Ok(DistanceEstimate {
        actual_sample_pc,
        estimated_sample_pc,
        delta_pc: actual_sample_pc - estimated_sample_pc,
    })
}

/// Compare the mean metallicity of every star with the observed stars of `sample_regions`.
///
/// Stars without an assigned metallicity class are skipped.
pub fn metallicity_bias(sky: &Sky, sample_regions: &[String]) -> Result<MetallicityBias> {
    let all: Vec<f64> = sky.stars().filter_map(|s| s.metallicity()).collect();

    let mut sample = Vec::new();
    for name in sample_regions {
        let region = sky.region(name)?;
        sample.extend(region.visible_stars().filter_map(|s| s.metallicity()));
    }

    Ok(MetallicityBias {
        mean_all: mean(&all).map_err(MalmquistError::empty("mean metallicity of all stars"))?,
        mean_sample: mean(&sample)
            .map_err(MalmquistError::empty("mean metallicity of the observed sample"))?,
        sample_regions: sample_regions.to_vec(),
    })
}
