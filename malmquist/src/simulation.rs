//! The two-phase Malmquist bias experiment
//!
//! Phase one draws a solar-like population and measures the magnitude and
//! distance bias of the observed sample. Phase two assigns metallicity
//! classes, dims metal-poor stars, and measures the magnitude and
//! metallicity bias again.

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::algo::{ks_normality, Significance};
use shared::units::LengthExt;

use crate::bias::{
    distance_bias, magnitude_bias, metallicity_bias, photometric_distance_estimate,
    DistanceBias, DistanceEstimate, MagnitudeBias, MetallicityBias,
};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::region::{mean_distance, Region};
use crate::sky::Sky;

/// Per-region numbers shown in the tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub near_pc: f64,
    pub far_pc: f64,
    pub star_count: usize,
    pub visible_count: usize,
    pub mean_distance_pc: f64,
    pub mean_distance_ly: f64,
    pub distance_modulus: f64,
    pub absolute_limit: f64,
}

impl From<&Region> for RegionSummary {
    fn from(region: &Region) -> Self {
        Self {
            name: region.name().to_string(),
            near_pc: region.shell().near_pc(),
            far_pc: region.shell().far_pc(),
            star_count: region.star_count(),
            visible_count: region.visible_count(),
            mean_distance_pc: region.mean_distance_pc(),
            mean_distance_ly: mean_distance(region.shell()).as_light_years(),
            distance_modulus: region.distance_modulus(),
            absolute_limit: region.absolute_limit(),
        }
    }
}

/// Kolmogorov-Smirnov check that the drawn absolute magnitudes look Gaussian
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityCheck {
    pub significance: f64,
    pub ks_statistic: f64,
    pub critical_value: f64,
    pub consistent: bool,
}

/// Test the generated population against a normal distribution.
///
/// Returns `None` when the test cannot run, e.g. with zero magnitude scatter.
fn check_normality(sky: &Sky) -> Option<NormalityCheck> {
    let significance = Significance::OnePercent;
    match ks_normality(&sky.all_magnitudes(), significance) {
        Ok(test) => {
            if !test.is_consistent() {
                warn!(
                    "Generated magnitudes fail the KS normality test: D = {:.4} > {:.4}",
                    test.statistic, test.critical_value
                );
            }
            Some(NormalityCheck {
                significance: significance.alpha(),
                ks_statistic: test.statistic,
                critical_value: test.critical_value,
                consistent: test.is_consistent(),
            })
        }
        Err(e) => {
            debug!("Skipping normality check: {e}");
            None
        }
    }
}

/// Every number the report prints, in machine-readable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasSummary {
    /// Seed the random source was started from, when known
    pub seed: Option<u64>,
    pub regions: Vec<RegionSummary>,
    /// Normality of the generated magnitudes, if it could be tested
    pub magnitude_normality: Option<NormalityCheck>,
    pub magnitude: MagnitudeBias,
    pub distance: DistanceBias,
    pub distance_estimate: DistanceEstimate,
    pub dimmed_regions: Vec<RegionSummary>,
    pub dimmed_magnitude: MagnitudeBias,
    pub metallicity: MetallicityBias,
}

/// Both sky snapshots and the statistics derived from them
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub sky: Sky,
    pub dimmed_sky: Sky,
    pub summary: BiasSummary,
}

fn summarize_regions(sky: &Sky) -> Vec<RegionSummary> {
    sky.regions().iter().map(RegionSummary::from).collect()
}

/// Run both phases of the experiment.
///
/// # Arguments
/// * `config` - Simulation parameters
/// * `rng` - Random source for magnitudes and metallicity classes
/// * `seed` - Seed `rng` was created from, recorded in the summary
pub fn run_simulation<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
    seed: Option<u64>,
) -> Result<SimulationOutcome> {
    let sky = Sky::generate(config, rng)?;
    let magnitude = magnitude_bias(&sky)?;
    let distance = distance_bias(&sky)?;
    let distance_estimate = photometric_distance_estimate(&sky, magnitude.mean_all)?;
    info!(
        "Phase 1: {}/{} stars observed, dM = {:.4} mag, d_sample - d_hat = {:.4} pc",
        sky.visible_stars(),
        sky.total_stars(),
        magnitude.delta,
        distance_estimate.delta_pc
    );

    let dimmed_sky = sky.with_metallicity_dimming(rng);
    let dimmed_magnitude = magnitude_bias(&dimmed_sky)?;
    let metallicity = metallicity_bias(&dimmed_sky, &config.metallicity_regions)?;
    info!(
        "Phase 2: {}/{} stars observed, dM = {:.4} mag, Z_all = {:.4}, Z_sample = {:.4}",
        dimmed_sky.visible_stars(),
        dimmed_sky.total_stars(),
        dimmed_magnitude.delta,
        metallicity.mean_all,
        metallicity.mean_sample
    );

    let summary = BiasSummary {
        seed,
        regions: summarize_regions(&sky),
        magnitude_normality: check_normality(&sky),
        magnitude,
        distance,
        distance_estimate,
        dimmed_regions: summarize_regions(&dimmed_sky),
        dimmed_magnitude,
        metallicity,
    };

    Ok(SimulationOutcome {
        sky,
        dimmed_sky,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(seed: u64) -> SimulationOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        run_simulation(&SimulationConfig::default(), &mut rng, Some(seed)).unwrap()
    }

    #[test]
    fn test_summary_matches_skies() {
        let outcome = run(21);
        let summary = &outcome.summary;

        assert_eq!(summary.seed, Some(21));
        assert_eq!(summary.regions.len(), 3);
        assert_eq!(summary.regions[1].name, "B");
        assert_eq!(summary.regions[1].star_count, 50);
        assert_relative_eq!(summary.regions[1].mean_distance_pc, 100.0);
        assert_relative_eq!(summary.regions[1].mean_distance_ly, 326.156, epsilon = 0.01);
        assert_eq!(
            summary.regions.iter().map(|r| r.visible_count).sum::<usize>(),
            outcome.sky.visible_stars()
        );
        assert_eq!(
            summary
                .dimmed_regions
                .iter()
                .map(|r| r.visible_count)
                .sum::<usize>(),
            outcome.dimmed_sky.visible_stars()
        );
    }

    #[test]
    fn test_observed_sample_is_brighter() {
        // Cut sits near the population mean, so the bias is always positive
        for seed in 0..5 {
            let outcome = run(seed);
            assert!(outcome.summary.magnitude.delta > 0.0);
            assert!(outcome.summary.dimmed_magnitude.delta > 0.0);
            assert!(
                outcome.summary.distance.mean_sample_pc < outcome.summary.distance.mean_all_pc
            );
        }
    }

    #[test]
    fn test_dimming_only_changes_magnitudes() {
        let outcome = run(3);
        for (before, after) in outcome
            .summary
            .regions
            .iter()
            .zip(&outcome.summary.dimmed_regions)
        {
            assert_eq!(before.star_count, after.star_count);
            assert_relative_eq!(before.distance_modulus, after.distance_modulus);
        }
    }

    #[test]
    fn test_normality_check_runs_on_generated_magnitudes() {
        let normality = run(13).summary.magnitude_normality.unwrap();
        assert_relative_eq!(normality.significance, 0.01);
        assert!(normality.ks_statistic > 0.0);
        // c(0.01) / sqrt(154)
        assert_relative_eq!(normality.critical_value, 1.63 / 154f64.sqrt(), epsilon = 1e-12);
        assert_eq!(
            normality.consistent,
            normality.ks_statistic <= normality.critical_value
        );
    }

    #[test]
    fn test_normality_check_skipped_without_scatter() {
        let config = SimulationConfig {
            magnitude_sigma: 0.0,
            ..SimulationConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let outcome = run_simulation(&config, &mut rng, None).unwrap();
        assert!(outcome.summary.magnitude_normality.is_none());
    }

    #[test]
    fn test_summary_serializes() {
        let outcome = run(5);
        let json = serde_json::to_string(&outcome.summary).unwrap();
        let parsed: BiasSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.regions, outcome.summary.regions);
        assert_eq!(parsed.metallicity.sample_regions, vec!["B", "C"]);
    }
}
