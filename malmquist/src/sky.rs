//! The simulated sky: every region and its stars
//!
//! A `Sky` is an immutable snapshot. Later phases of the simulation (adding
//! metallicity dimming) produce a new snapshot rather than editing this one.

use log::{debug, warn};
use rand::Rng;

use crate::config::SimulationConfig;
use crate::error::{MalmquistError, Result};
use crate::region::{Region, Star};
use crate::star_math::magnitude_distribution;

/// Ordered collection of regions
#[derive(Debug, Clone, PartialEq)]
pub struct Sky {
    regions: Vec<Region>,
}

impl Sky {
    /// Build a sky from explicit regions, preserving their order
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Generate a sky from a configuration.
    ///
    /// Star counts come from the uniform-density assumption relative to the
    /// reference region, rounded half to even. Absolute magnitudes are drawn
    /// from N(mean, sigma²) using `rng`.
    pub fn generate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let distribution =
            magnitude_distribution(config.mean_absolute_magnitude, config.magnitude_sigma)?;

        let mut regions = Vec::with_capacity(config.regions.len());
        for region_config in &config.regions {
            regions.push(Region::populate(
                region_config.name.clone(),
                region_config.shell()?,
                config.star_count(region_config)?,
                config.limiting_magnitude,
                &distribution,
                rng,
            ));
        }

        let sky = Self { regions };
        sky.warn_empty_regions("generated");
        debug!(
            "Generated sky: {} stars, {} visible",
            sky.total_stars(),
            sky.visible_stars()
        );
        Ok(sky)
    }

    /// New snapshot with metallicity classes assigned and dimming applied to every star
    pub fn with_metallicity_dimming<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let regions = self
            .regions
            .iter()
            .map(|region| region.with_metallicity_dimming(rng))
            .collect();
        let sky = Self { regions };
        sky.warn_empty_regions("dimmed");
        sky
    }

    /// Names of regions where no star passes the detection cutoff
    pub fn empty_regions(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|r| r.visible_count() == 0)
            .map(Region::name)
            .collect()
    }

    fn warn_empty_regions(&self, snapshot: &str) {
        for name in self.empty_regions() {
            warn!(
                "Region {name} has no stars above the detection limit in the {snapshot} sky"
            );
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Result<&Region> {
        self.regions
            .iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| MalmquistError::UnknownRegion(name.to_string()))
    }

    /// Every star in region order
    pub fn stars(&self) -> impl Iterator<Item = &Star> + '_ {
        self.regions.iter().flat_map(|r| r.stars().iter())
    }

    /// Absolute magnitudes of every star
    pub fn all_magnitudes(&self) -> Vec<f64> {
        self.regions.iter().flat_map(|r| r.magnitudes()).collect()
    }

    /// Absolute magnitudes of the observed sample across all regions
    pub fn sample_magnitudes(&self) -> Vec<f64> {
        self.regions.iter().flat_map(|r| r.sample()).collect()
    }

    pub fn total_stars(&self) -> usize {
        self.regions.iter().map(Region::star_count).sum()
    }

    pub fn visible_stars(&self) -> usize {
        self.regions.iter().map(Region::visible_count).sum()
    }
}
